use crate::{controller::PlayController, error, spotify::SpotifyClient};

use super::{print_song, spinner};

/// Shows the track playing right now, falling back to the last played one.
pub async fn now(spotify: &SpotifyClient, json: bool) {
    let pb = spinner("Fetching last play...");
    let result = PlayController::new(spotify).last_play().await;
    pb.finish_and_clear();

    match result {
        Ok(song) => print_song(song, json),
        Err(e) => error!("Cannot fetch last play. Err: {}", e),
    }
}

/// Shows the track playing right now, if any.
pub async fn current(spotify: &SpotifyClient, json: bool) {
    let pb = spinner("Fetching currently playing track...");
    let result = PlayController::new(spotify).currently_playing().await;
    pb.finish_and_clear();

    match result {
        Ok(song) => print_song(song, json),
        Err(e) => error!("Cannot fetch currently playing track. Err: {}", e),
    }
}
