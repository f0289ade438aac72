use tabled::Table;

use crate::{
    controller::PlayController, error, spotify::SpotifyClient, types::SongTableRow, warning,
};

use super::{print_song, spinner};

/// Shows the last played track, or with `all` the play history as a table.
pub async fn recent(spotify: &SpotifyClient, json: bool, all: bool) {
    let controller = PlayController::new(spotify);

    if !all {
        let pb = spinner("Fetching recently played track...");
        let result = controller.recently_played().await;
        pb.finish_and_clear();

        match result {
            Ok(song) => print_song(song, json),
            Err(e) => error!("Cannot fetch recently played track. Err: {}", e),
        }
        return;
    }

    let pb = spinner("Fetching play history...");
    let result = controller.history().await;
    pb.finish_and_clear();

    let history = match result {
        Ok(history) => history,
        Err(e) => error!("Cannot fetch play history. Err: {}", e),
    };

    if json {
        match serde_json::to_string_pretty(&history) {
            Ok(out) => println!("{}", out),
            Err(e) => warning!("Cannot serialize play history. Err: {}", e),
        }
        return;
    }

    if history.is_empty() {
        warning!("Play history is empty.");
        return;
    }

    let rows: Vec<SongTableRow> = history.into_iter().map(SongTableRow::from).collect();
    println!("{}", Table::new(rows));
}
