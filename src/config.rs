use std::{collections::HashSet, fmt, str::FromStr};

use crate::{
    bot::payload::{GenreChoice, Payload, RANDOM_GENRE},
    catalog::Category,
    error::ConfigError,
};

/// Telegram rejects inline buttons whose callback data exceeds this many bytes.
pub const CALLBACK_DATA_LIMIT: usize = 64;

const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
const SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
const SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
const GENRES: &str = "GENREBOT_GENRES";
const RANDOM_GENRE_POLICY: &str = "GENREBOT_RANDOM_GENRE";
const POLL_TIMEOUT: &str = "GENREBOT_POLL_TIMEOUT";
const SEARCH_LIMIT: &str = "GENREBOT_SEARCH_LIMIT";

#[derive(Clone)]
pub struct Config {
    pub telegram_token: String,
    pub spotify: SpotifyCredentials,
    pub bot: BotConfig,
}

#[derive(Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub genres: Vec<String>,
    pub random_genre: RandomGenrePolicy,
    pub poll_timeout_secs: u64,
    pub search_limit: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            genres: vec!["rock".into(), "pop".into(), "jazz".into()],
            random_genre: RandomGenrePolicy::Resolve,
            poll_timeout_secs: 60,
            search_limit: 20,
        }
    }
}

/// What the "random genre" button searches for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RandomGenrePolicy {
    /// Pick one of the configured genres when the search runs.
    #[default]
    Resolve,
    /// Search for the literal `random` token.
    Literal,
}

impl FromStr for RandomGenrePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resolve" => Ok(Self::Resolve),
            "literal" => Ok(Self::Literal),
            other => Err(format!("expected `resolve` or `literal`, got `{other}`")),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let optional = |var: &'static str| lookup(var).filter(|value| !value.trim().is_empty());

        let telegram_token = required(TELEGRAM_BOT_TOKEN)?;
        let spotify = SpotifyCredentials {
            client_id: required(SPOTIFY_CLIENT_ID)?,
            client_secret: required(SPOTIFY_CLIENT_SECRET)?,
        };

        let mut bot = BotConfig::default();
        if let Some(raw) = optional(GENRES) {
            bot.genres = parse_genres(&raw)?;
        }
        if let Some(raw) = optional(RANDOM_GENRE_POLICY) {
            bot.random_genre = raw
                .parse()
                .map_err(|reason| ConfigError::Invalid { var: RANDOM_GENRE_POLICY, reason })?;
        }
        if let Some(raw) = optional(POLL_TIMEOUT) {
            let secs: u64 = parse_number(POLL_TIMEOUT, &raw)?;
            if !(1..=600).contains(&secs) {
                return Err(ConfigError::Invalid {
                    var: POLL_TIMEOUT,
                    reason: format!("{secs} is outside 1..=600"),
                });
            }
            bot.poll_timeout_secs = secs;
        }
        if let Some(raw) = optional(SEARCH_LIMIT) {
            let limit: u32 = parse_number(SEARCH_LIMIT, &raw)?;
            if !(1..=50).contains(&limit) {
                return Err(ConfigError::Invalid {
                    var: SEARCH_LIMIT,
                    reason: format!("{limit} is outside 1..=50"),
                });
            }
            bot.search_limit = limit;
        }

        Ok(Self {
            telegram_token,
            spotify,
            bot,
        })
    }
}

fn parse_number<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

fn parse_genres(raw: &str) -> Result<Vec<String>, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid { var: GENRES, reason };

    let mut seen = HashSet::new();
    let mut genres = Vec::new();
    for genre in raw.split(',').map(str::trim).filter(|g| !g.is_empty()) {
        if genre.contains(':') {
            return Err(invalid(format!("genre `{genre}` contains ':'")));
        }
        if genre == RANDOM_GENRE {
            return Err(invalid(format!("`{RANDOM_GENRE}` is reserved")));
        }
        let longest = Category::ALL
            .iter()
            .map(|&category| {
                Payload::Choice(category, GenreChoice::Named(genre.to_string()))
                    .to_string()
                    .len()
            })
            .max()
            .unwrap_or_default();
        if longest > CALLBACK_DATA_LIMIT {
            return Err(invalid(format!(
                "genre `{genre}` does not fit into {CALLBACK_DATA_LIMIT} bytes of callback data"
            )));
        }
        if !seen.insert(genre) {
            return Err(invalid(format!("genre `{genre}` is listed twice")));
        }
        genres.push(genre.to_string());
    }

    if genres.is_empty() {
        return Err(invalid("no genres configured".into()));
    }
    Ok(genres)
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_token", &"<redacted>")
            .field("spotify", &self.spotify)
            .field("bot", &self.bot)
            .finish()
    }
}

impl fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
