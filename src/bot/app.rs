use std::time::Duration;

use color_eyre::eyre::WrapErr;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{handler::EventHandler, menu::Menu, responder::ChatSink};
use crate::{
    catalog::Catalog,
    config::Config,
    http::{
        spotify::SpotifyClient,
        telegram::{TelegramClient, model::Update},
    },
};

const RETRY_DELAY: Duration = Duration::from_secs(3);

pub struct App {
    telegram: TelegramClient,
    handler: EventHandler<SpotifyClient, TelegramClient>,
    offset: i64,
}

impl App {
    pub async fn new(config: Config) -> color_eyre::Result<Self> {
        let spotify = SpotifyClient::connect(config.spotify, config.bot.search_limit)
            .await
            .wrap_err("Could not get Spotify token")?;

        let telegram = TelegramClient::new(&config.telegram_token, config.bot.poll_timeout_secs)?;
        let me = telegram.get_me().await.wrap_err("Cannot create bot")?;
        info!(
            "Authorized on account {}",
            me.username.as_deref().unwrap_or(&me.first_name)
        );

        let menu = Menu::from_config(&config.bot);
        Ok(Self {
            handler: EventHandler::new(menu, spotify, telegram.clone()),
            telegram,
            offset: 0,
        })
    }

    /// Polls for updates and handles them one at a time, in order, until
    /// interrupted. An interrupt that arrives mid-batch stops the loop after
    /// the event in flight.
    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let (stop_tx, mut stop) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop_tx.send_replace(true);
            }
        });

        info!("Waiting for updates");

        while !*stop.borrow() {
            let polled = tokio::select! {
                _ = stopped(&mut stop) => break,
                polled = self.telegram.get_updates(self.offset) => polled,
            };

            let updates = match polled {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("Failed to get updates: {e}, retrying in {}s", RETRY_DELAY.as_secs());
                    tokio::select! {
                        _ = stopped(&mut stop) => break,
                        _ = tokio::time::sleep(RETRY_DELAY) => continue,
                    }
                }
            };

            self.offset = handle_batch(&self.handler, updates, self.offset, &stop).await;
        }

        info!("Shutting down");
        Ok(())
    }
}

/// Resolves once shutdown is requested. If the signal task is gone no
/// request can arrive, so this never resolves.
async fn stopped(stop: &mut watch::Receiver<bool>) {
    if stop.wait_for(|requested| *requested).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Handles one `getUpdates` batch in `update_id` order and returns the offset
/// for the next poll. Updates below `offset` were already consumed and are
/// skipped; updates that map to no event are still consumed. Stops early,
/// leaving the rest unconsumed, once `stop` is set.
pub async fn handle_batch<C: Catalog, S: ChatSink>(
    handler: &EventHandler<C, S>,
    mut updates: Vec<Update>,
    mut offset: i64,
    stop: &watch::Receiver<bool>,
) -> i64 {
    updates.sort_by_key(|update| update.update_id);

    for update in updates {
        if *stop.borrow() {
            break;
        }
        if update.update_id < offset {
            debug!(update_id = update.update_id, offset, "stale_update_skipped");
            continue;
        }

        offset = update.update_id + 1;
        if let Some(event) = update.into_event() {
            handler.handle_event(event).await;
        }
    }

    offset
}
