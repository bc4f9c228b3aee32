use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::error::ApiError;

pub type TrackId = i64;
pub type PlaylistId = i64;
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist_name: String,
    pub cover_ref: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub owner_id: UserId,
    pub track_count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(default, alias = "login")]
    pub user_login: Option<String>,
    #[serde(default)]
    pub pseudo: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        self.pseudo
            .as_deref()
            .or(self.user_login.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
            .to_string()
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .map(|stamp| stamp.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").ok())
}

// Wire records. The backend is loose about field names, so everything is
// optional here and normalized into the canonical records above.

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TrackRecord {
    #[serde(default, alias = "id")]
    pub track_id: Option<TrackId>,
    #[serde(default, alias = "title")]
    pub track_title: Option<String>,
    #[serde(default, alias = "artist")]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_image_file: Option<String>,
    #[serde(default)]
    pub track_image_file: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl TrackRecord {
    pub fn into_track(self) -> Option<Track> {
        let id = self.track_id?;
        let cover_ref = [self.album_image_file, self.track_image_file, self.image]
            .into_iter()
            .flatten()
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .unwrap_or_default();
        Some(Track {
            id,
            title: non_empty(self.track_title).unwrap_or_default(),
            artist_name: non_empty(self.artist_name).unwrap_or_default(),
            cover_ref,
        })
    }
}

/// Track lists come back either bare or wrapped in an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TrackListPayload {
    List(Vec<TrackRecord>),
    Wrapped(TrackListEnvelope),
}

#[derive(Debug, Deserialize, Default)]
pub struct TrackListEnvelope {
    #[serde(default, alias = "tracks", alias = "items")]
    pub recommendations: Vec<TrackRecord>,
}

impl TrackListPayload {
    pub fn into_tracks(self) -> Vec<Track> {
        let records = match self {
            Self::List(records) => records,
            Self::Wrapped(envelope) => envelope.recommendations,
        };
        records
            .into_iter()
            .filter_map(TrackRecord::into_track)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistRecord {
    #[serde(alias = "id")]
    pub playlist_id: PlaylistId,
    #[serde(default)]
    pub playlist_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub tracks: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub track_count: Option<u32>,
}

impl PlaylistRecord {
    pub fn into_playlist(self, fallback_owner: UserId) -> Playlist {
        let track_count = self
            .tracks
            .as_ref()
            .map(|tracks| tracks.len() as u32)
            .or(self.track_count)
            .unwrap_or(0);
        Playlist {
            id: self.playlist_id,
            name: non_empty(self.playlist_name)
                .or_else(|| non_empty(self.title))
                .unwrap_or_default(),
            owner_id: self.user_id.unwrap_or(fallback_owner),
            track_count,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: &str, password: &str) -> Result<Self, ApiError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Please enter your login and password.".to_string(),
            ));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

pub const MIN_PASSWORD_LEN: usize = 8;

/// Account creation payload, validated before it is ever sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationRequest {
    pub pseudo: String,
    pub user_login: String,
    pub email: String,
    #[serde(rename = "user_mdp")]
    pub password: String,
}

impl RegistrationRequest {
    pub fn new(pseudo: &str, login: &str, email: &str, password: &str) -> Result<Self, ApiError> {
        let pseudo = pseudo.trim();
        let login = login.trim();
        let email = email.trim();

        if pseudo.is_empty() {
            return Err(ApiError::Validation("A display name is required.".into()));
        }
        if login.is_empty() || login.chars().any(char::is_whitespace) {
            return Err(ApiError::Validation(
                "The login must be a single word.".into(),
            ));
        }
        if !is_plausible_email(email) {
            return Err(ApiError::Validation("Please enter a valid email.".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "The password needs at least {MIN_PASSWORD_LEN} characters."
            )));
        }

        Ok(Self {
            pseudo: pseudo.to_string(),
            user_login: login.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.chars().any(char::is_whitespace)
}
