pub mod search;

use std::{fmt, str::FromStr};

use async_trait::async_trait;

use crate::error::CatalogError;

pub use search::CatalogSearch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Album,
    Track,
    Artist,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Album, Category::Track, Category::Artist];

    /// Token used in payloads, search queries and the catalog's type filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Album => "album",
            Category::Track => "track",
            Category::Artist => "artist",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Album => "Альбом",
            Category::Track => "Трек",
            Category::Artist => "Исполнитель",
        }
    }

    pub fn not_found(&self) -> &'static str {
        match self {
            Category::Album => "Альбомы не найдены",
            Category::Track => "Треки не найдены",
            Category::Artist => "Исполнители не найдены",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

/// A concrete genre and category to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub genre: String,
    pub category: Category,
}

impl Selection {
    pub fn query(&self) -> String {
        format!("{} {}", self.genre, self.category)
    }
}

/// A search hit, independent of the catalog it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Primary artist for albums and tracks.
    pub artist: Option<String>,
    /// Largest first. For tracks these are the parent album's images.
    pub images: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub cover_url: Option<String>,
    pub caption: String,
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(&self, query: &str, category: Category)
    -> Result<Vec<CatalogItem>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_tokens_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("playlist".parse::<Category>().is_err());
        assert!("Album".parse::<Category>().is_err());
    }

    #[test]
    fn query_joins_genre_and_category_noun() {
        let selection = Selection {
            genre: "jazz".into(),
            category: Category::Album,
        };
        assert_eq!(selection.query(), "jazz album");
    }
}
