//! In-memory backend and storage doubles for unit tests.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use tokio::sync::Notify;

use crate::api::{
    ApiError, LoginCredentials, MusicBackend, Playlist, PlaylistId, RegistrationRequest, Track,
    TrackId, UserId, UserProfile,
};
use crate::db::{CredentialStorage, StorageError, StoredCredentials};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Catalog { limit: u32 },
    Behavioral(String),
    ContentBased(String),
    UserPlaylists(UserId),
    CreatePlaylist(String),
    AddTrack {
        playlist_id: PlaylistId,
        track_id: TrackId,
    },
    AddFavorite(TrackId),
    RemoveFavorite(TrackId),
    Login(String),
    CurrentUser(String),
    Register(String),
}

/// Scripted backend. Each field holds the answer for its endpoint; gates hold
/// a call open until notified.
pub struct MockBackend {
    pub catalog: RefCell<Result<Vec<Track>, ApiError>>,
    pub behavioral: RefCell<Result<Vec<Track>, ApiError>>,
    pub content_based: RefCell<Result<Vec<Track>, ApiError>>,
    pub behavioral_gate: RefCell<Option<Rc<Notify>>>,
    pub playlists: RefCell<Result<Vec<Playlist>, ApiError>>,
    pub create_error: RefCell<Option<ApiError>>,
    pub create_gate: RefCell<Option<Rc<Notify>>>,
    pub next_playlist_id: Cell<PlaylistId>,
    pub failing_playlists: RefCell<HashSet<PlaylistId>>,
    pub add_gate: RefCell<Option<Rc<Notify>>>,
    pub favorite_error: RefCell<Option<ApiError>>,
    pub favorite_gate: RefCell<Option<Rc<Notify>>>,
    pub login_result: RefCell<Result<String, ApiError>>,
    pub profile: RefCell<Result<UserProfile, ApiError>>,
    calls: RefCell<Vec<Call>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            catalog: RefCell::new(Ok(Vec::new())),
            behavioral: RefCell::new(Ok(Vec::new())),
            content_based: RefCell::new(Ok(Vec::new())),
            behavioral_gate: RefCell::new(None),
            playlists: RefCell::new(Ok(Vec::new())),
            create_error: RefCell::new(None),
            create_gate: RefCell::new(None),
            next_playlist_id: Cell::new(100),
            failing_playlists: RefCell::new(HashSet::new()),
            add_gate: RefCell::new(None),
            favorite_error: RefCell::new(None),
            favorite_gate: RefCell::new(None),
            login_result: RefCell::new(Ok("token".to_string())),
            profile: RefCell::new(Ok(profile(1))),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl MockBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    async fn pass(gate: &RefCell<Option<Rc<Notify>>>) {
        let gate = gate.borrow().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    async fn favorite(&self, call: Call) -> Result<(), ApiError> {
        self.record(call);
        Self::pass(&self.favorite_gate).await;
        match self.favorite_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl MusicBackend for MockBackend {
    async fn catalog_tracks(&self, limit: u32) -> Result<Vec<Track>, ApiError> {
        self.record(Call::Catalog { limit });
        self.catalog.borrow().clone()
    }

    async fn behavioral_recommendations(
        &self,
        token: &str,
        _limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        self.record(Call::Behavioral(token.to_string()));
        Self::pass(&self.behavioral_gate).await;
        self.behavioral.borrow().clone()
    }

    async fn content_recommendations(
        &self,
        token: &str,
        _limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        self.record(Call::ContentBased(token.to_string()));
        self.content_based.borrow().clone()
    }

    async fn user_playlists(
        &self,
        _token: &str,
        user_id: UserId,
    ) -> Result<Vec<Playlist>, ApiError> {
        self.record(Call::UserPlaylists(user_id));
        self.playlists.borrow().clone()
    }

    async fn create_playlist(
        &self,
        _token: &str,
        owner_id: UserId,
        name: &str,
    ) -> Result<Playlist, ApiError> {
        self.record(Call::CreatePlaylist(name.to_string()));
        Self::pass(&self.create_gate).await;
        if let Some(err) = self.create_error.borrow().clone() {
            return Err(err);
        }
        let id = self.next_playlist_id.get();
        self.next_playlist_id.set(id + 1);
        Ok(Playlist {
            id,
            name: name.to_string(),
            owner_id,
            track_count: 0,
        })
    }

    async fn add_track_to_playlist(
        &self,
        _token: &str,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<(), ApiError> {
        self.record(Call::AddTrack {
            playlist_id,
            track_id,
        });
        Self::pass(&self.add_gate).await;
        if self.failing_playlists.borrow().contains(&playlist_id) {
            return Err(ApiError::Http {
                status: 500,
                message: format!("playlist {playlist_id} rejected the track"),
            });
        }
        Ok(())
    }

    async fn add_favorite(&self, _token: &str, track_id: TrackId) -> Result<(), ApiError> {
        self.favorite(Call::AddFavorite(track_id)).await
    }

    async fn remove_favorite(&self, _token: &str, track_id: TrackId) -> Result<(), ApiError> {
        self.favorite(Call::RemoveFavorite(track_id)).await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<String, ApiError> {
        self.record(Call::Login(credentials.username.clone()));
        self.login_result.borrow().clone()
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.record(Call::CurrentUser(token.to_string()));
        self.profile.borrow().clone()
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<UserProfile, ApiError> {
        self.record(Call::Register(request.user_login.clone()));
        self.profile.borrow().clone()
    }
}

/// Shared in-memory credentials; clones see the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<StoredCredentials>>,
}

impl MemoryStorage {
    pub fn with(stored: StoredCredentials) -> Self {
        Self {
            inner: Rc::new(RefCell::new(stored)),
        }
    }

    pub fn contents(&self) -> StoredCredentials {
        self.inner.borrow().clone()
    }
}

impl CredentialStorage for MemoryStorage {
    fn load(&self) -> Result<StoredCredentials, StorageError> {
        Ok(self.contents())
    }

    fn store_token(&self, token: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().token = Some(token.to_string());
        Ok(())
    }

    fn store_user_id(&self, user_id: UserId) -> Result<(), StorageError> {
        self.inner.borrow_mut().user_id = Some(user_id);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.inner.borrow_mut() = StoredCredentials::default();
        Ok(())
    }
}

pub fn track(id: TrackId) -> Track {
    Track {
        id,
        title: format!("Track {id}"),
        artist_name: "Artist".to_string(),
        cover_ref: String::new(),
    }
}

pub fn playlist(id: PlaylistId, name: &str) -> Playlist {
    Playlist {
        id,
        name: name.to_string(),
        owner_id: 5,
        track_count: 0,
    }
}

pub fn profile(user_id: UserId) -> UserProfile {
    UserProfile {
        user_id,
        user_login: Some(format!("user{user_id}")),
        email: format!("user{user_id}@orchestra.fm"),
        ..UserProfile::default()
    }
}

/// Lets every spawned local task run until it blocks.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
