use serde::Deserialize;

use crate::catalog::{CatalogItem, Category};

const WEB_BASE: &str = "https://open.spotify.com";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct AuthErrorBody {
    pub error: String,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SimplifiedArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    pub album: Album,
}

#[derive(Debug, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Spotify occasionally returns `null` in place of an item.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<Option<T>>,
}

impl<T> Page<T> {
    fn into_items(self) -> impl Iterator<Item = T> {
        self.items.into_iter().flatten()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub albums: Option<Page<Album>>,
    pub tracks: Option<Page<Track>>,
    pub artists: Option<Page<Artist>>,
}

impl SearchResponse {
    pub fn into_catalog_items(self, category: Category) -> Vec<CatalogItem> {
        match category {
            Category::Album => self
                .albums
                .map(|page| page.into_items().map(CatalogItem::from).collect())
                .unwrap_or_default(),
            Category::Track => self
                .tracks
                .map(|page| page.into_items().map(CatalogItem::from).collect())
                .unwrap_or_default(),
            Category::Artist => self
                .artists
                .map(|page| page.into_items().map(CatalogItem::from).collect())
                .unwrap_or_default(),
        }
    }
}

fn web_link(category: Category, id: &str) -> String {
    format!("{WEB_BASE}/{category}/{id}")
}

fn image_urls(images: Vec<Image>) -> Vec<String> {
    images.into_iter().map(|image| image.url).collect()
}

fn primary_artist(artists: Vec<SimplifiedArtist>) -> Option<String> {
    artists.into_iter().next().map(|artist| artist.name)
}

impl From<Album> for CatalogItem {
    fn from(album: Album) -> Self {
        Self {
            link: web_link(Category::Album, &album.id),
            id: album.id,
            name: album.name,
            artist: primary_artist(album.artists),
            images: image_urls(album.images),
        }
    }
}

impl From<Track> for CatalogItem {
    fn from(track: Track) -> Self {
        Self {
            link: web_link(Category::Track, &track.id),
            id: track.id,
            name: track.name,
            artist: primary_artist(track.artists),
            images: image_urls(track.album.images),
        }
    }
}

impl From<Artist> for CatalogItem {
    fn from(artist: Artist) -> Self {
        Self {
            link: web_link(Category::Artist, &artist.id),
            id: artist.id,
            name: artist.name,
            artist: None,
            images: image_urls(artist.images),
        }
    }
}
