//! # CLI Module
//!
//! User-facing commands of nowplay. Each command builds on
//! [`crate::controller::PlayController`] and only deals with presentation:
//! spinners while waiting on the network, colored lines or JSON on stdout,
//! and fatal error reporting.
//!
//! ## Commands
//!
//! - [`now`] - Track playing right now, or else the last one played
//! - [`current`] - Track playing right now
//! - [`recent`] - Last played track, or the whole play history as a table
//! - [`token`] - Manual check of the refresh-token grant
//!
//! ## Usage Patterns
//!
//! ```bash
//! nowplay now                 # what is (or was) playing
//! nowplay current --json      # machine-readable, current track only
//! nowplay recent --all        # play history table
//! nowplay token               # verify credentials
//! ```

mod now;
mod recent;
mod token;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{info, types::Song, warning};

pub use now::current;
pub use now::now;
pub use recent::recent;
pub use token::token;

/// Starts a steady spinner with `message`.
fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Prints a song as colored lines, or as JSON with `json`.
fn print_song(song: Option<Song>, json: bool) {
    let Some(song) = song else {
        if json {
            println!("null");
        } else {
            warning!("Nothing is playing and nothing was played recently.");
        }
        return;
    };

    if json {
        match serde_json::to_string_pretty(&song) {
            Ok(out) => println!("{}", out),
            Err(e) => warning!("Cannot serialize song. Err: {}", e),
        }
        return;
    }

    let state = if song.listening { "Listening to" } else { "Last played" };
    info!("{}: {} - {}", state, song.author, song.name);
    info!("Album: {}", song.album);
    info!("Duration: {}", format_duration(song.duration_ms));
    if let Some(url) = &song.url {
        info!("Track: {}", url);
    }
    if let Some(url) = &song.album_image_url {
        info!("Artwork: {}", url);
    }
    if let Some(url) = &song.user_url {
        info!("Profile: {}", url);
    }
}

/// `m:ss` rendering of a duration in milliseconds.
pub fn format_duration(duration_ms: u64) -> String {
    let secs = duration_ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
