//! Session lifecycle: startup validation, login, logout.
//!
//! The session is owned here and handed to the feed, the playlist picker and
//! the favorite toggles; nobody else reads credentials from storage.

use crate::api::{
    ApiError, LoginCredentials, MusicBackend, RegistrationRequest, UserId, UserProfile,
};
use crate::db::CredentialStorage;
use crate::state::StateHandle;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub connected: bool,
    pub user_id: Option<UserId>,
    pub profile: Option<UserProfile>,
    token: Option<String>,
}

impl Session {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: UserId, token: impl Into<String>) -> Self {
        Self {
            connected: true,
            user_id: Some(user_id),
            profile: None,
            token: Some(token.into()),
        }
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    #[cfg(test)]
    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    /// Token for an authenticated call, or `NotAuthenticated` without
    /// touching the network.
    pub fn bearer(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::NotAuthenticated)
    }

    /// Personalized sources are only queried with a live token.
    pub fn is_personalized(&self) -> bool {
        self.connected && self.token.is_some()
    }
}

pub struct SessionStore<S, H> {
    storage: S,
    session: H,
}

impl<S, H> SessionStore<S, H>
where
    S: CredentialStorage,
    H: StateHandle<Session>,
{
    pub fn new(storage: S, session: H) -> Self {
        Self { storage, session }
    }

    #[cfg(test)]
    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    /// Profile fetched from `GET /user` at login or restore.
    pub fn profile(&self) -> Option<UserProfile> {
        self.session.read_with(|session| session.profile.clone())
    }

    /// Restores the session from storage. Any failure, including having
    /// nothing stored, ends disconnected with storage cleared.
    pub async fn init<B>(&self, backend: &B) -> Session
    where
        B: MusicBackend + ?Sized,
    {
        let stored = match self.storage.load() {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!("cannot read stored credentials: {err}");
                return self.reset();
            }
        };

        let Some(token) = stored.token else {
            return self.reset();
        };

        match backend.current_user(&token).await {
            Ok(profile) => {
                if stored.user_id != Some(profile.user_id) {
                    self.persist_user_id(profile.user_id);
                }
                tracing::info!(user_id = profile.user_id, "session restored");
                self.replace(Session::authenticated(profile.user_id, token).with_profile(profile))
            }
            Err(err) => {
                tracing::warn!("stored session discarded: {err}");
                self.reset()
            }
        }
    }

    pub async fn login<B>(
        &self,
        backend: &B,
        credentials: &LoginCredentials,
    ) -> Result<Session, ApiError>
    where
        B: MusicBackend + ?Sized,
    {
        let token = backend.login(credentials).await?;
        if let Err(err) = self.storage.store_token(&token) {
            tracing::warn!("cannot persist token: {err}");
        }

        let profile = match backend.current_user(&token).await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!("login succeeded but profile lookup failed: {err}");
                self.reset();
                return Err(err);
            }
        };
        self.persist_user_id(profile.user_id);

        tracing::info!(user_id = profile.user_id, "signed in");
        Ok(self.replace(Session::authenticated(profile.user_id, token).with_profile(profile)))
    }

    pub fn logout(&self) {
        tracing::info!("signed out");
        self.reset();
    }

    /// Creates an account. Does not sign in.
    pub async fn register<B>(
        &self,
        backend: &B,
        request: &RegistrationRequest,
    ) -> Result<UserProfile, ApiError>
    where
        B: MusicBackend + ?Sized,
    {
        let profile = backend.register(request).await?;
        tracing::info!(user_id = profile.user_id, "account created");
        Ok(profile)
    }

    fn persist_user_id(&self, user_id: UserId) {
        if let Err(err) = self.storage.store_user_id(user_id) {
            tracing::warn!("cannot persist user id: {err}");
        }
    }

    fn reset(&self) -> Session {
        if let Err(err) = self.storage.clear() {
            tracing::warn!("cannot clear stored credentials: {err}");
        }
        self.replace(Session::disconnected())
    }

    fn replace(&self, next: Session) -> Session {
        self.session.update_with(|session| *session = next.clone());
        next
    }
}
