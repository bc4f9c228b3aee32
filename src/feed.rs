//! Home feed aggregation.
//!
//! Three sources are fetched independently: the public catalog, and two
//! personalized recommendation sets that are only queried for a signed-in
//! session. Each source owns its own slice of [`HomeFeed`], so the tasks never
//! need to coordinate and the view can render whichever finished first.

use crate::api::{ApiError, MusicBackend, Track};
use crate::config::AppConfig;
use crate::session::Session;
use crate::state::StateHandle;
use futures_util::future::LocalBoxFuture;
use std::cell::Cell;
use std::rc::Rc;

const CATALOG_ERROR_FALLBACK: &str = "Unable to load the catalog right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    General,
    Behavioral,
    ContentBased,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [Self::General, Self::Behavioral, Self::ContentBased];

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Behavioral => "behavioral",
            Self::ContentBased => "content-based",
        }
    }

    pub fn is_personalized(self) -> bool {
        !matches!(self, Self::General)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSet {
    pub kind: SourceKind,
    pub items: Vec<Track>,
    pub loading: bool,
    pub error: Option<String>,
}

impl RecommendationSet {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }

    fn clear(&mut self) {
        self.items.clear();
        self.loading = false;
        self.error = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeFeed {
    pub general: RecommendationSet,
    pub behavioral: RecommendationSet,
    pub content_based: RecommendationSet,
    generation: u64,
}

impl Default for HomeFeed {
    fn default() -> Self {
        Self {
            general: RecommendationSet::new(SourceKind::General),
            behavioral: RecommendationSet::new(SourceKind::Behavioral),
            content_based: RecommendationSet::new(SourceKind::ContentBased),
            generation: 0,
        }
    }
}

impl HomeFeed {
    pub fn section(&self, kind: SourceKind) -> &RecommendationSet {
        match kind {
            SourceKind::General => &self.general,
            SourceKind::Behavioral => &self.behavioral,
            SourceKind::ContentBased => &self.content_based,
        }
    }

    fn section_mut(&mut self, kind: SourceKind) -> &mut RecommendationSet {
        match kind {
            SourceKind::General => &mut self.general,
            SourceKind::Behavioral => &mut self.behavioral,
            SourceKind::ContentBased => &mut self.content_based,
        }
    }
}

/// A detached fetch. The caller spawns each one on its own.
pub type FetchTask = LocalBoxFuture<'static, ()>;

pub struct ContentAggregator<B: ?Sized, H> {
    backend: Rc<B>,
    feed: H,
    catalog_limit: u32,
    recommendation_limit: u32,
    last_connected: Cell<Option<bool>>,
}

impl<B, H> ContentAggregator<B, H>
where
    B: MusicBackend + ?Sized + 'static,
    H: StateHandle<HomeFeed>,
{
    pub fn new(backend: Rc<B>, feed: H, config: &AppConfig) -> Self {
        Self {
            backend,
            feed,
            catalog_limit: config.catalog_limit,
            recommendation_limit: config.recommendation_limit,
            last_connected: Cell::new(None),
        }
    }

    #[cfg(test)]
    pub fn feed(&self) -> HomeFeed {
        self.feed.snapshot()
    }

    /// Activates on the first call and then only when `connected` flips.
    /// Token rotation alone does not refetch.
    pub fn on_session(&self, session: &Session) -> Vec<FetchTask> {
        if self.last_connected.get() == Some(session.connected) {
            return Vec::new();
        }
        self.last_connected.set(Some(session.connected));
        self.activate(session)
    }

    /// Marks the sources that will be fetched as loading, clears the
    /// personalized ones when they are gated off, and returns the fetches.
    pub fn activate(&self, session: &Session) -> Vec<FetchTask> {
        let token = session
            .is_personalized()
            .then(|| session.bearer().ok().map(str::to_string))
            .flatten();

        let generation = self.feed.update_with(|feed| {
            feed.generation = feed.generation.wrapping_add(1);
            for kind in SourceKind::ALL {
                let section = feed.section_mut(kind);
                if kind.is_personalized() && token.is_none() {
                    section.clear();
                } else {
                    section.loading = true;
                    section.error = None;
                }
            }
            feed.generation
        });

        tracing::debug!(
            generation,
            personalized = token.is_some(),
            "refreshing home feed"
        );

        let mut tasks = vec![self.fetch_task(SourceKind::General, None, generation)];
        if let Some(token) = token {
            tasks.push(self.fetch_task(SourceKind::Behavioral, Some(token.clone()), generation));
            tasks.push(self.fetch_task(SourceKind::ContentBased, Some(token), generation));
        }
        tasks
    }

    fn fetch_task(&self, kind: SourceKind, token: Option<String>, generation: u64) -> FetchTask {
        let backend = Rc::clone(&self.backend);
        let feed = self.feed.clone();
        let limit = match kind {
            SourceKind::General => self.catalog_limit,
            _ => self.recommendation_limit,
        };

        Box::pin(async move {
            let result = fetch_source(&*backend, kind, token.as_deref(), limit).await;
            feed.update_with(|feed| {
                if feed.generation != generation {
                    tracing::debug!(source = kind.label(), "dropping stale response");
                    return;
                }
                apply_result(feed.section_mut(kind), result);
            });
        })
    }
}

async fn fetch_source<B>(
    backend: &B,
    kind: SourceKind,
    token: Option<&str>,
    limit: u32,
) -> Result<Vec<Track>, ApiError>
where
    B: MusicBackend + ?Sized,
{
    match kind {
        SourceKind::General => backend.catalog_tracks(limit).await,
        SourceKind::Behavioral => {
            let token = token.ok_or(ApiError::NotAuthenticated)?;
            backend.behavioral_recommendations(token, limit).await
        }
        SourceKind::ContentBased => {
            let token = token.ok_or(ApiError::NotAuthenticated)?;
            backend.content_recommendations(token, limit).await
        }
    }
}

// The catalog is expected to work, so its failure is shown. Missing
// personalization just leaves the section empty.
fn apply_result(section: &mut RecommendationSet, result: Result<Vec<Track>, ApiError>) {
    section.loading = false;
    match result {
        Ok(items) => {
            section.items = items;
            section.error = None;
        }
        Err(err) if section.kind.is_personalized() => {
            tracing::warn!(source = section.kind.label(), "recommendations unavailable: {err}");
            section.items.clear();
            section.error = None;
        }
        Err(err) => {
            tracing::warn!("catalog fetch failed: {err}");
            section.error = Some(err.user_message(CATALOG_ERROR_FALLBACK));
        }
    }
}
