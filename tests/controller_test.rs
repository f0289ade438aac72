mod common;

use axum::http::StatusCode;
use nowplay::{controller::PlayController, spotify::SpotifyClient};

use common::{FakeSpotify, currently_playing_json, history_json, track_json};

const CURRENT: &str = "/v1/me/player/currently-playing";
const RECENT: &str = "/v1/me/player/recently-played";

async fn client_with_user_url(fake: &FakeSpotify) -> SpotifyClient {
    let base = fake.start().await;
    let config = common::config(&base, &base).with_user_url("https://open.spotify.com/user/someone");
    SpotifyClient::new(config).unwrap()
}

#[tokio::test]
async fn test_last_play_prefers_currently_playing() {
    let fake = FakeSpotify::new();
    fake.token("abc").reply(
        CURRENT,
        StatusCode::OK,
        currently_playing_json(&track_json("t1", "Now", "Main Artist", "The Album")),
    );
    let spotify = client_with_user_url(&fake).await;

    let song = PlayController::new(&spotify).last_play().await.unwrap().unwrap();

    assert!(song.listening);
    assert_eq!(song.name, "Now");
    assert_eq!(song.author, "Main Artist");
    assert_eq!(song.album, "The Album");
    assert_eq!(song.url.as_deref(), Some("https://open.spotify.com/track/t1"));
    assert_eq!(song.album_image_url.as_deref(), Some("https://i.scdn.co/image/t1-640"));
    assert_eq!(song.duration_ms, 215000);
    assert_eq!(song.user_url.as_deref(), Some("https://open.spotify.com/user/someone"));

    // history is never requested when something is playing
    assert_eq!(fake.calls(RECENT), 0);
    assert_eq!(fake.calls("/api/token"), 1);
}

#[tokio::test]
async fn test_last_play_falls_back_to_latest_history_entry() {
    let fake = FakeSpotify::new();
    fake.token("abc")
        .reply(CURRENT, StatusCode::NO_CONTENT, "")
        .reply(
            RECENT,
            StatusCode::OK,
            history_json(&[
                ("old", "2024-03-01T10:00:00.000Z"),
                ("newest", "2024-03-01T12:30:00.000Z"),
                ("middle", "2024-03-01T11:00:00.000Z"),
            ]),
        )
        .reply(
            "/v1/tracks/newest",
            StatusCode::OK,
            track_json("newest", "Full Newest", "Full Artist", "Full Album"),
        );
    let spotify = fake.client().await;

    let song = PlayController::new(&spotify).last_play().await.unwrap().unwrap();

    assert!(!song.listening);
    assert_eq!(song.name, "Full Newest");
    assert_eq!(song.author, "Full Artist");
    assert_eq!(song.user_url, None);

    let paths: Vec<String> = fake.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/api/token", CURRENT, RECENT, "/v1/tracks/newest"]);
}

#[tokio::test]
async fn test_last_play_skips_current_without_item() {
    let fake = FakeSpotify::new();
    fake.token("abc")
        .reply(CURRENT, StatusCode::OK, r#"{"is_playing": false, "item": null}"#)
        .reply(RECENT, StatusCode::OK, history_json(&[("only", "2024-03-01T10:00:00Z")]))
        .reply("/v1/tracks/only", StatusCode::NO_CONTENT, "");
    let spotify = fake.client().await;

    let song = PlayController::new(&spotify).last_play().await.unwrap().unwrap();

    // track lookup came back empty: the embedded history track is used
    assert!(!song.listening);
    assert_eq!(song.name, "Song only");
}

#[tokio::test]
async fn test_last_play_nothing_found() {
    let fake = FakeSpotify::new();
    fake.token("abc")
        .reply(CURRENT, StatusCode::NO_CONTENT, "")
        .reply(RECENT, StatusCode::OK, r#"{"items": []}"#);
    let spotify = fake.client().await;

    let song = PlayController::new(&spotify).last_play().await.unwrap();
    assert_eq!(song, None);
}

#[tokio::test]
async fn test_currently_playing_refreshes_expired_token() {
    let fake = FakeSpotify::new();
    fake.token("first")
        .token("second")
        .expired(CURRENT)
        .reply(
            CURRENT,
            StatusCode::OK,
            currently_playing_json(&track_json("t1", "Now", "Artist", "Album")),
        );
    let spotify = fake.client().await;

    let song = PlayController::new(&spotify).currently_playing().await.unwrap();

    assert_eq!(song.map(|s| s.name), Some("Now".to_string()));
    assert_eq!(fake.calls("/api/token"), 2);
}

#[tokio::test]
async fn test_currently_playing_propagates_auth_error() {
    let fake = FakeSpotify::new();
    fake.reply("/api/token", StatusCode::UNAUTHORIZED, r#"{"error":"invalid_client"}"#);
    let spotify = fake.client().await;

    let err = PlayController::new(&spotify).currently_playing().await.unwrap_err();
    assert_eq!(err.to_string(), "access token error: invalid_client");
    assert_eq!(fake.calls(CURRENT), 0);
}

#[tokio::test]
async fn test_history_is_sorted_most_recent_first() {
    let fake = FakeSpotify::new();
    fake.token("abc").reply(
        RECENT,
        StatusCode::OK,
        history_json(&[
            ("b", "2024-03-01T11:00:00Z"),
            ("c", "2024-03-01T12:00:00Z"),
            ("a", "2024-03-01T10:00:00Z"),
        ]),
    );
    let spotify = fake.client().await;

    let history = PlayController::new(&spotify).history().await.unwrap();
    let ids: Vec<String> = history.into_iter().filter_map(|h| h.track.id).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
}
