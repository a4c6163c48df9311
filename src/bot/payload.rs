use std::fmt;

use crate::catalog::Category;

/// Genre token carried by the "random genre" button.
pub const RANDOM_GENRE: &str = "random";

const GENRE_PREFIX: &str = "genre:";
const CHOICE_PREFIX: &str = "choice:";
const BACK_TO_GENRES: &str = "back:genres";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreChoice {
    Named(String),
    Random,
}

impl GenreChoice {
    fn from_token(token: &str) -> Self {
        if token == RANDOM_GENRE {
            GenreChoice::Random
        } else {
            GenreChoice::Named(token.to_string())
        }
    }

    pub fn token(&self) -> &str {
        match self {
            GenreChoice::Named(genre) => genre,
            GenreChoice::Random => RANDOM_GENRE,
        }
    }
}

/// Callback data attached to an inline button. Everything the next screen
/// needs travels inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Genre(GenreChoice),
    Choice(Category, GenreChoice),
    BackToGenres,
}

impl Payload {
    /// Returns `None` for anything that is not a well-formed payload.
    pub fn parse(data: &str) -> Option<Self> {
        if data == BACK_TO_GENRES {
            return Some(Payload::BackToGenres);
        }

        if let Some(genre) = data.strip_prefix(GENRE_PREFIX) {
            if genre.is_empty() || genre.contains(':') {
                return None;
            }
            return Some(Payload::Genre(GenreChoice::from_token(genre)));
        }

        if let Some(rest) = data.strip_prefix(CHOICE_PREFIX) {
            let fields: Vec<&str> = rest.split(':').filter(|f| !f.is_empty()).collect();
            let [category, genre] = fields.as_slice() else {
                return None;
            };
            let category = category.parse().ok()?;
            return Some(Payload::Choice(category, GenreChoice::from_token(genre)));
        }

        None
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Genre(genre) => write!(f, "{GENRE_PREFIX}{}", genre.token()),
            Payload::Choice(category, genre) => {
                write!(f, "{CHOICE_PREFIX}{category}:{}", genre.token())
            }
            Payload::BackToGenres => f.write_str(BACK_TO_GENRES),
        }
    }
}
