pub mod app;
pub mod handler;
pub mod keyboard;
pub mod menu;
pub mod payload;
pub mod responder;
