use rand::{Rng, seq::IndexedRandom};
use tracing::debug;

use super::{Catalog, CatalogItem, Category, SearchResult, Selection};
use crate::error::CatalogError;

/// Runs one genre query against a catalog and turns a random hit into a
/// cover and caption.
pub struct CatalogSearch<C> {
    catalog: C,
}

impl<C: Catalog> CatalogSearch<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub async fn find<R>(
        &self,
        selection: &Selection,
        rng: &mut R,
    ) -> Result<SearchResult, CatalogError>
    where
        R: Rng + Send + ?Sized,
    {
        let query = selection.query();
        let items = self.catalog.search(&query, selection.category).await?;
        debug!(query = query.as_str(), found = items.len(), "catalog_search");

        Ok(match items.choose(rng) {
            Some(item) => describe(selection.category, item),
            None => SearchResult {
                cover_url: None,
                caption: selection.category.not_found().to_string(),
            },
        })
    }
}

pub fn describe(category: Category, item: &CatalogItem) -> SearchResult {
    let headline = match (category, &item.artist) {
        (Category::Album | Category::Track, Some(artist)) => format!("{artist} — {}", item.name),
        _ => item.name.clone(),
    };

    SearchResult {
        cover_url: item.images.first().cloned(),
        caption: format!("{headline}\n🟢 Spotify: {}", item.link),
    }
}
