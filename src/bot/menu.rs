use rand::{Rng, seq::IndexedRandom};

use super::{
    keyboard::{Button, Keyboard},
    payload::{GenreChoice, Payload, RANDOM_GENRE},
};
use crate::{
    catalog::{Category, Selection},
    config::{BotConfig, RandomGenrePolicy},
    event::events::Event,
};

pub const GENRE_PROMPT: &str = "Выбери жанр:";
const RANDOM_GENRE_LABEL: &str = "Случайный жанр";
const RANDOM_GENRE_CHOSEN: &str = "Ты выбрал случайный жанр! Что хочешь найти?";
const BACK_LABEL: &str = "Назад";
const START_COMMAND: &str = "start";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Genres,
    Categories(GenreChoice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render {
    pub text: String,
    pub keyboard: Keyboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Show(Screen),
    /// Look something up; the user stays on the category screen.
    Search(Category, GenreChoice),
}

/// Two-screen genre/category menu. Holds configuration only: every decision is
/// derived from the event at hand.
#[derive(Debug, Clone)]
pub struct Menu {
    genres: Vec<String>,
    random_genre: RandomGenrePolicy,
}

impl Menu {
    pub fn new(genres: Vec<String>, random_genre: RandomGenrePolicy) -> Self {
        Self {
            genres,
            random_genre,
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.genres.clone(), config.random_genre)
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn decide(&self, event: &Event) -> Option<Decision> {
        match event {
            Event::Command { name, .. } => {
                (name == START_COMMAND).then_some(Decision::Show(Screen::Genres))
            }
            Event::Callback { data, .. } => match Payload::parse(data)? {
                Payload::Genre(genre) => Some(Decision::Show(Screen::Categories(genre))),
                Payload::Choice(category, genre) => Some(Decision::Search(category, genre)),
                Payload::BackToGenres => Some(Decision::Show(Screen::Genres)),
            },
        }
    }

    pub fn render(&self, screen: &Screen) -> Render {
        match screen {
            Screen::Genres => {
                let buttons = self
                    .genres
                    .iter()
                    .map(|genre| {
                        Button::new(genre, &Payload::Genre(GenreChoice::Named(genre.clone())))
                    })
                    .chain([Button::new(
                        RANDOM_GENRE_LABEL,
                        &Payload::Genre(GenreChoice::Random),
                    )]);

                Render {
                    text: GENRE_PROMPT.to_string(),
                    keyboard: Keyboard::new().row(buttons),
                }
            }
            Screen::Categories(genre) => {
                let text = match genre {
                    GenreChoice::Random => RANDOM_GENRE_CHOSEN.to_string(),
                    GenreChoice::Named(name) => {
                        format!("Ты выбрал жанр: {name}. Что хочешь найти?")
                    }
                };
                let categories = Category::ALL.map(|category| {
                    Button::new(category.label(), &Payload::Choice(category, genre.clone()))
                });

                Render {
                    text,
                    keyboard: Keyboard::new()
                        .row(categories)
                        .row([Button::new(BACK_LABEL, &Payload::BackToGenres)]),
                }
            }
        }
    }

    /// Turns a button's genre into the concrete genre that gets searched.
    pub fn resolve<R>(&self, category: Category, genre: &GenreChoice, rng: &mut R) -> Selection
    where
        R: Rng + ?Sized,
    {
        let genre = match (genre, self.random_genre) {
            (GenreChoice::Named(name), _) => name.clone(),
            (GenreChoice::Random, RandomGenrePolicy::Resolve) => self
                .genres
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| RANDOM_GENRE.to_string()),
            (GenreChoice::Random, RandomGenrePolicy::Literal) => RANDOM_GENRE.to_string(),
        };

        Selection { genre, category }
    }
}
