//! In-process stand-in for the accounts service and the Web API.
//!
//! Replies are scripted per path and served in order; every request is
//! recorded so tests can count calls and inspect headers.

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use nowplay::{config::Config, spotify::SpotifyClient};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const REFRESH_TOKEN: &str = "r3fr35h";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct FakeSpotify {
    replies: Arc<Mutex<HashMap<String, VecDeque<(StatusCode, String)>>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for `path`.
    pub fn reply(&self, path: &str, status: StatusCode, body: impl Into<String>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back((status, body.into()));
        self
    }

    pub fn token(&self, access_token: &str) -> &Self {
        self.reply(
            "/api/token",
            StatusCode::OK,
            format!(
                r#"{{"access_token":"{}","token_type":"Bearer","scope":"user-read-currently-playing","expires_in":3600}}"#,
                access_token
            ),
        )
    }

    pub fn expired(&self, path: &str) -> &Self {
        self.reply(
            path,
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"status":401,"message":"The access token expired"}}"#,
        )
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    /// Serves the fake on an ephemeral port and returns its base URL.
    pub async fn start(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    /// Starts the fake and builds a client pointed at it.
    pub async fn client(&self) -> SpotifyClient {
        let base = self.start().await;
        SpotifyClient::new(config(&base, &base)).unwrap()
    }
}

pub fn config(accounts: &str, api: &str) -> Config {
    Config::new(CLIENT_ID, CLIENT_SECRET, accounts, api, REFRESH_TOKEN)
}

async fn handle(
    State(fake): State<FakeSpotify>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    fake.requests.lock().unwrap().push(Recorded {
        method,
        path: path.clone(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let next = fake
        .replies
        .lock()
        .unwrap()
        .get_mut(&path)
        .and_then(VecDeque::pop_front);

    match next {
        Some((status, body)) => {
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("no scripted reply for {}", path),
        )
            .into_response(),
    }
}

pub fn track_json(id: &str, name: &str, artist: &str, album: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "name": "{name}",
            "href": "https://api.spotify.com/v1/tracks/{id}",
            "external_urls": {{ "spotify": "https://open.spotify.com/track/{id}" }},
            "artists": [{{ "id": "a-{id}", "name": "{artist}" }}, {{ "id": "b-{id}", "name": "Featuring" }}],
            "album": {{
                "id": "al-{id}",
                "name": "{album}",
                "images": [
                    {{ "url": "https://i.scdn.co/image/{id}-640", "width": 640, "height": 640 }},
                    {{ "url": "https://i.scdn.co/image/{id}-300", "width": 300, "height": 300 }}
                ]
            }},
            "duration_ms": 215000
        }}"#
    )
}

pub fn currently_playing_json(track: &str) -> String {
    format!(
        r#"{{ "is_playing": true, "progress_ms": 42000, "timestamp": 1700000000000, "item": {} }}"#,
        track
    )
}

pub fn history_json(entries: &[(&str, &str)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(id, played_at)| {
            format!(
                r#"{{ "track": {}, "played_at": "{}" }}"#,
                track_json(id, &format!("Song {}", id), "Artist", "Album"),
                played_at
            )
        })
        .collect();
    format!(r#"{{ "items": [{}] }}"#, items.join(","))
}
