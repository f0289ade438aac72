//! Presentation layer: turns Web API payloads into [`Song`] records.
//!
//! Every call acquires its own access token and passes the client's token
//! acquisition as the refresh callback, so an expired token is replaced at
//! most once per fetch.

use crate::{
    error::Error,
    spotify::{AccessToken, Endpoint, SpotifyClient},
    types::{CurrentlyPlaying, PlayHistory, RecentlyPlayed, Song, Track},
    utils::{self, LastPlay},
};

/// Fetches and shapes play state on behalf of one [`SpotifyClient`].
///
/// # Example
///
/// ```
/// let controller = PlayController::new(&spotify);
/// if let Some(song) = controller.last_play().await? {
///     println!("{} - {}", song.author, song.name);
/// }
/// ```
pub struct PlayController<'a> {
    spotify: &'a SpotifyClient,
}

impl<'a> PlayController<'a> {
    /// Borrows `spotify` for the lifetime of the controller.
    pub fn new(spotify: &'a SpotifyClient) -> Self {
        PlayController { spotify }
    }

    /// The track playing right now, with `listening = true`.
    pub async fn currently_playing(&self) -> Result<Option<Song>, Error> {
        let token = self.spotify.acquire_access_token().await?;
        let current = self.fetch_currently_playing(&token).await?;

        Ok(current
            .and_then(|c| c.item)
            .map(|track| self.song(track, true)))
    }

    /// The last track of the play history, with `listening = false`.
    pub async fn recently_played(&self) -> Result<Option<Song>, Error> {
        let token = self.spotify.acquire_access_token().await?;
        let Some(recent) = self.fetch_recently_played(&token).await? else {
            return Ok(None);
        };

        match utils::last_recently_played(recent) {
            Some(history) => self.history_song(&token, history).await.map(Some),
            None => Ok(None),
        }
    }

    /// The track playing right now, or else the last one played.
    ///
    /// The play history is only requested when nothing is playing.
    pub async fn last_play(&self) -> Result<Option<Song>, Error> {
        let token = self.spotify.acquire_access_token().await?;

        let current = self
            .fetch_currently_playing(&token)
            .await?
            .filter(|c| c.item.is_some());
        let recent = match current {
            Some(_) => None,
            None => self.fetch_recently_played(&token).await?,
        };

        match utils::select_last_play(current, recent) {
            Some(LastPlay::Current(track)) => Ok(Some(self.song(track, true))),
            Some(LastPlay::Recent(history)) => self.history_song(&token, history).await.map(Some),
            None => Ok(None),
        }
    }

    /// The whole play history, most recent first.
    pub async fn history(&self) -> Result<Vec<PlayHistory>, Error> {
        let token = self.spotify.acquire_access_token().await?;
        let mut items = self
            .fetch_recently_played(&token)
            .await?
            .map(|r| r.items)
            .unwrap_or_default();

        utils::sort_by_played_at_desc(&mut items);
        Ok(items)
    }

    async fn fetch_currently_playing(&self, token: &AccessToken) -> Result<Option<CurrentlyPlaying>, Error> {
        self.spotify
            .fetch_protected(
                &Endpoint::CurrentlyPlaying,
                Some(token.clone()),
                Some(self.spotify.refresh_callback()),
            )
            .await
            .into_result()
    }

    async fn fetch_recently_played(&self, token: &AccessToken) -> Result<Option<RecentlyPlayed>, Error> {
        self.spotify
            .fetch_protected(
                &Endpoint::RecentlyPlayed,
                Some(token.clone()),
                Some(self.spotify.refresh_callback()),
            )
            .await
            .into_result()
    }

    /// Resolves a history entry to its full track, keeping the embedded one
    /// when the track lookup yields nothing.
    async fn history_song(&self, token: &AccessToken, history: PlayHistory) -> Result<Song, Error> {
        let full = match &history.track.id {
            Some(id) => self
                .spotify
                .fetch_protected::<Track>(
                    &Endpoint::Track(id.clone()),
                    Some(token.clone()),
                    Some(self.spotify.refresh_callback()),
                )
                .await
                .into_result()?,
            None => None,
        };

        Ok(self.song(full.unwrap_or(history.track), false))
    }

    fn song(&self, track: Track, listening: bool) -> Song {
        Song::from_track(track, self.spotify.config().user_url(), listening)
    }
}
