//! The backend seam every core component talks through.
//!
//! Authenticated calls take the bearer token explicitly; callers obtain it
//! from [`crate::session::Session::bearer`], which fails fast when signed out.

use async_trait::async_trait;

use crate::api::error::ApiError;
use crate::api::models::*;

#[async_trait(?Send)]
pub trait MusicBackend {
    /// Public catalog listing (`GET /viewTrack`).
    async fn catalog_tracks(&self, limit: u32) -> Result<Vec<Track>, ApiError>;

    /// Listening-history model (`GET /users/gru_recommendations/detailed`).
    async fn behavioral_recommendations(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError>;

    /// Content-similarity model (`GET /users/tf-idf_recommendations`).
    async fn content_recommendations(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError>;

    async fn user_playlists(&self, token: &str, user_id: UserId)
        -> Result<Vec<Playlist>, ApiError>;

    async fn create_playlist(
        &self,
        token: &str,
        owner_id: UserId,
        name: &str,
    ) -> Result<Playlist, ApiError>;

    async fn add_track_to_playlist(
        &self,
        token: &str,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<(), ApiError>;

    async fn add_favorite(&self, token: &str, track_id: TrackId) -> Result<(), ApiError>;

    async fn remove_favorite(&self, token: &str, track_id: TrackId) -> Result<(), ApiError>;

    /// Exchanges credentials for an access token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, ApiError>;

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError>;

    async fn register(&self, request: &RegistrationRequest) -> Result<UserProfile, ApiError>;
}
