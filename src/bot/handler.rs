use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use super::{
    menu::{Decision, Menu},
    responder::{ChatSink, Responder},
};
use crate::{
    catalog::{Catalog, CatalogSearch},
    event::events::{ChatId, Event},
};

const SEARCH_ERROR_PREFIX: &str = "Ошибка при поиске: ";

/// Takes one inbound event all the way to its outbound messages.
pub struct EventHandler<C, S> {
    menu: Menu,
    search: CatalogSearch<C>,
    responder: Responder<S>,
}

impl<C: Catalog, S: ChatSink> EventHandler<C, S> {
    pub fn new(menu: Menu, catalog: C, sink: S) -> Self {
        Self {
            menu,
            search: CatalogSearch::new(catalog),
            responder: Responder::new(sink),
        }
    }

    pub fn catalog(&self) -> &C {
        self.search.catalog()
    }

    pub fn sink(&self) -> &S {
        self.responder.sink()
    }

    /// Handles an event with a freshly seeded random source.
    pub async fn handle_event(&self, event: Event) {
        let mut rng = StdRng::from_os_rng();
        self.handle_event_with(event, &mut rng).await;
    }

    pub async fn handle_event_with<R>(&self, event: Event, rng: &mut R)
    where
        R: Rng + Send + ?Sized,
    {
        let chat_id = event.chat_id();
        match self.menu.decide(&event) {
            Some(decision) => self.apply(chat_id, decision, rng).await,
            None => debug!(?event, "ignored_event"),
        }

        if let Event::Callback { id, .. } = &event {
            self.responder.acknowledge(id).await;
        }
    }

    async fn apply<R>(&self, chat_id: ChatId, decision: Decision, rng: &mut R)
    where
        R: Rng + Send + ?Sized,
    {
        match decision {
            Decision::Show(screen) => {
                let render = self.menu.render(&screen);
                self.responder.show(chat_id, &render).await;
            }
            Decision::Search(category, genre) => {
                let selection = self.menu.resolve(category, &genre, rng);
                info!(
                    chat_id,
                    genre = selection.genre.as_str(),
                    category = category.as_str(),
                    "search_requested"
                );

                match self.search.find(&selection, rng).await {
                    Ok(result) => self.responder.deliver(chat_id, &result).await,
                    Err(e) => {
                        warn!(chat_id, query = selection.query().as_str(), "Search failed: {e}");
                        self.responder
                            .notify(chat_id, &format!("{SEARCH_ERROR_PREFIX}{e}"))
                            .await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        catalog::Category,
        config::RandomGenrePolicy,
        testing::{FakeCatalog, RecordingSink, Sent, item},
    };

    fn handler(
        catalog: FakeCatalog,
        sink: RecordingSink,
    ) -> EventHandler<FakeCatalog, RecordingSink> {
        let menu = Menu::new(
            vec!["rock".into(), "pop".into(), "jazz".into()],
            RandomGenrePolicy::Resolve,
        );
        EventHandler::new(menu, catalog, sink)
    }

    fn callback(id: &str, data: &str) -> Event {
        Event::Callback {
            id: id.into(),
            chat_id: 42,
            data: data.into(),
        }
    }

    fn hit() -> FakeCatalog {
        let mut album = item("1weenld61qoidwYuZ1GESA", "Kind of Blue");
        album.artist = Some("Miles Davis".into());
        album.images = vec!["https://i.scdn.co/image/kob".into()];
        FakeCatalog::with_items(vec![album])
    }

    #[tokio::test]
    async fn every_genre_and_category_queries_once() {
        for genre in ["rock", "pop", "jazz"] {
            for category in Category::ALL {
                let handler = handler(hit(), RecordingSink::default());
                let mut rng = StdRng::seed_from_u64(11);

                handler
                    .handle_event_with(callback("a", &format!("genre:{genre}")), &mut rng)
                    .await;
                let choice = format!("choice:{category}:{genre}");
                handler
                    .handle_event_with(callback("b", &choice), &mut rng)
                    .await;

                assert_eq!(
                    handler.catalog().calls(),
                    vec![(format!("{genre} {category}"), category)]
                );
                assert_eq!(handler.sink().acks(), vec!["a".to_string(), "b".to_string()]);
            }
        }
    }

    #[tokio::test]
    async fn malformed_choice_sends_nothing() {
        let handler = handler(hit(), RecordingSink::default());
        handler.handle_event(callback("cb", "choice:onlyonepart")).await;

        assert!(handler.catalog().calls().is_empty());
        assert!(handler.sink().sent().is_empty());
        assert_eq!(handler.sink().acks(), vec!["cb".to_string()]);
    }

    #[tokio::test]
    async fn photo_failure_falls_back_and_acknowledges_once() {
        let handler = handler(hit(), RecordingSink::failing_photos());
        handler.handle_event(callback("cb", "choice:album:jazz")).await;

        let caption = concat!(
            "Miles Davis — Kind of Blue\n",
            "🟢 Spotify: https://open.spotify.com/album/1weenld61qoidwYuZ1GESA"
        );
        assert_eq!(
            handler.sink().sent(),
            vec![
                Sent::Photo {
                    chat_id: 42,
                    url: "https://i.scdn.co/image/kob".into(),
                    caption: caption.into(),
                },
                Sent::Text {
                    chat_id: 42,
                    text: caption.into(),
                    keyboard: None,
                },
            ]
        );
        assert_eq!(handler.sink().acks(), vec!["cb".to_string()]);
    }

    #[tokio::test]
    async fn catalog_error_is_reported_to_the_user() {
        let handler = handler(FakeCatalog::failing("upstream down"), RecordingSink::default());
        handler.handle_event(callback("cb", "choice:track:rock")).await;

        assert_eq!(
            handler.sink().sent(),
            vec![Sent::Text {
                chat_id: 42,
                text: "Ошибка при поиске: Catalog returned 503: upstream down".into(),
                keyboard: None,
            }]
        );
        assert_eq!(handler.sink().acks(), vec!["cb".to_string()]);
    }

    #[tokio::test]
    async fn nothing_found_is_sent_as_text() {
        let handler = handler(FakeCatalog::with_items(vec![]), RecordingSink::default());
        handler.handle_event(callback("cb", "choice:artist:jazz")).await;

        assert_eq!(
            handler.sink().sent(),
            vec![Sent::Text {
                chat_id: 42,
                text: "Исполнители не найдены".into(),
                keyboard: None,
            }]
        );
    }

    #[tokio::test]
    async fn random_genre_searches_a_configured_genre() {
        let handler = handler(hit(), RecordingSink::default());
        handler.handle_event(callback("cb", "choice:album:random")).await;

        let calls = handler.catalog().calls();
        assert_eq!(calls.len(), 1);
        assert!(
            ["rock album", "pop album", "jazz album"].contains(&calls[0].0.as_str()),
            "{calls:?}"
        );
    }

    #[tokio::test]
    async fn start_and_back_render_the_same_message() {
        let handler = handler(hit(), RecordingSink::default());
        handler
            .handle_event(Event::Command {
                chat_id: 42,
                name: "start".into(),
            })
            .await;
        handler.handle_event(callback("cb", "back:genres")).await;

        let sent = handler.sink().sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        // commands have nothing to acknowledge
        assert_eq!(handler.sink().acks(), vec!["cb".to_string()]);
    }

    #[tokio::test]
    async fn repeated_genre_presses_are_independent() {
        let handler = handler(hit(), RecordingSink::default());
        handler.handle_event(callback("1", "genre:jazz")).await;
        handler.handle_event(callback("2", "genre:jazz")).await;

        let sent = handler.sink().sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        assert!(handler.catalog().calls().is_empty());
    }
}
