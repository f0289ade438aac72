use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{CurrentlyPlaying, PlayHistory, RecentlyPlayed, Track};

/// Tells whether a Web API answer carries usable data.
///
/// A 200 counts only with a truthy body (`null`, `false`, `0` and `""` do
/// not), and an array body needs more than one element. 204 and every other
/// status mean no data.
pub fn is_data_available(status: u16, data: &Value) -> bool {
    match status {
        200 => match data {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => items.len() > 1,
            Value::Object(_) => true,
        },
        _ => false,
    }
}

/// Which upstream answer a "last play" came from.
#[derive(Debug, Clone)]
pub enum LastPlay {
    Current(Track),
    Recent(PlayHistory),
}

/// Picks the most relevant track: the one playing now, otherwise the most
/// recent entry of the play history.
pub fn select_last_play(
    current: Option<CurrentlyPlaying>,
    recent: Option<RecentlyPlayed>,
) -> Option<LastPlay> {
    if let Some(track) = current.and_then(|c| c.item) {
        return Some(LastPlay::Current(track));
    }

    recent.and_then(last_recently_played).map(LastPlay::Recent)
}

/// Returns the entry with the latest `played_at`.
///
/// A single entry is returned as-is. Equal timestamps keep their upstream
/// order; unparseable timestamps sort last.
pub fn last_recently_played(recent: RecentlyPlayed) -> Option<PlayHistory> {
    let mut items = recent.items;
    if items.len() == 1 {
        return items.pop();
    }

    sort_by_played_at_desc(&mut items);
    items.into_iter().next()
}

/// Orders play history most recent first (stable).
pub fn sort_by_played_at_desc(items: &mut [PlayHistory]) {
    items.sort_by(|a, b| {
        match (parse_played_at(&a.played_at), parse_played_at(&b.played_at)) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

fn parse_played_at(played_at: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(played_at)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Hides all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let hidden = secret.chars().count().saturating_sub(4);
    format!("{}{}", "*".repeat(hidden), visible)
}
