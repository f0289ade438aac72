use crate::{error, info, spotify::SpotifyClient, success, utils};

/// Runs the refresh-token grant once and reports the result.
pub async fn token(spotify: &SpotifyClient) {
    let pb = super::spinner("Requesting access token...");
    let result = spotify.acquire_access_token().await;
    pb.finish_and_clear();

    match result {
        Ok(token) => {
            success!("Access token acquired.");
            info!("Type: {}", token.token_type());
            info!("Token: {}", utils::mask_secret(token.token()));
        }
        Err(e) => error!("Cannot acquire access token. Err: {}", e),
    }
}
