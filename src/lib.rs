pub mod bot;
pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod http;
pub mod util;

#[cfg(test)]
mod testing;
