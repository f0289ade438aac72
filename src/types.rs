use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Error envelope of the Web API, e.g.
/// `{"error": {"status": 401, "message": "The access token expired"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    pub timestamp: Option<u64>,
    pub item: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentlyPlayed {
    #[serde(default)]
    pub items: Vec<PlayHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
    pub played_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub href: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Album,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Normalized "now playing" record handed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_url: Option<String>,
    pub name: String,
    pub url: Option<String>,
    pub author: String,
    pub album: String,
    pub album_image_url: Option<String>,
    pub duration_ms: u64,
    pub listening: bool,
}

impl Song {
    /// Shapes an upstream track into a [`Song`].
    ///
    /// The link prefers the public web URL over the API `href`; the author is
    /// the first listed artist and the artwork the first album image.
    pub fn from_track(track: Track, user_url: Option<&str>, listening: bool) -> Self {
        let url = track.external_urls.spotify.or(track.href);
        let author = track
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default();
        let album_image_url = track.album.images.into_iter().next().map(|i| i.url);

        Song {
            user_url: user_url.map(str::to_string),
            name: track.name,
            url,
            author,
            album: track.album.name,
            album_image_url,
            duration_ms: track.duration_ms,
            listening,
        }
    }
}

#[derive(Tabled)]
pub struct SongTableRow {
    pub played_at: String,
    pub name: String,
    pub author: String,
    pub album: String,
}

impl From<PlayHistory> for SongTableRow {
    fn from(history: PlayHistory) -> Self {
        SongTableRow {
            played_at: history.played_at,
            name: history.track.name,
            author: history
                .track
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_default(),
            album: history.track.album.name,
        }
    }
}
