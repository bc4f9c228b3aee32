//! HTTP implementation of [`MusicBackend`] against the Orchestra REST API.

use crate::api::backend::MusicBackend;
use crate::api::error::{http_error, ApiError};
use crate::api::models::*;
use crate::config::AppConfig;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

pub struct OrchestraClient {
    base_url: String,
}

impl OrchestraClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        HTTP_CLIENT.get(self.url(path))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        HTTP_CLIENT.post(self.url(path))
    }

    fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        HTTP_CLIENT.delete(self.url(path))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %body, "request rejected");
        Err(http_error(status.as_u16(), &body, fallback))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, fallback).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// Login, profile lookup and account creation.
include!("auth_and_profile.rs");
// Public catalog and the two personalized recommendation endpoints.
include!("catalog_and_recommendations.rs");
// Playlist reads/writes and track favorites.
include!("playlists_and_favorites.rs");

#[async_trait(?Send)]
impl MusicBackend for OrchestraClient {
    async fn catalog_tracks(&self, limit: u32) -> Result<Vec<Track>, ApiError> {
        self.get_catalog_tracks(limit).await
    }

    async fn behavioral_recommendations(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        self.get_recommendations(BEHAVIORAL_PATH, token, limit).await
    }

    async fn content_recommendations(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        self.get_recommendations(CONTENT_BASED_PATH, token, limit)
            .await
    }

    async fn user_playlists(
        &self,
        token: &str,
        user_id: UserId,
    ) -> Result<Vec<Playlist>, ApiError> {
        self.get_user_playlists(token, user_id).await
    }

    async fn create_playlist(
        &self,
        token: &str,
        owner_id: UserId,
        name: &str,
    ) -> Result<Playlist, ApiError> {
        self.post_playlist(token, owner_id, name).await
    }

    async fn add_track_to_playlist(
        &self,
        token: &str,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<(), ApiError> {
        self.post_playlist_track(token, playlist_id, track_id).await
    }

    async fn add_favorite(&self, token: &str, track_id: TrackId) -> Result<(), ApiError> {
        self.post_favorite(token, track_id).await
    }

    async fn remove_favorite(&self, token: &str, track_id: TrackId) -> Result<(), ApiError> {
        self.delete_favorite(token, track_id).await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<String, ApiError> {
        self.post_login(credentials).await
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.get_current_user(token).await
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<UserProfile, ApiError> {
        self.post_user(request).await
    }
}

include!("response_models.rs");
