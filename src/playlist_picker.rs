//! "Add to playlist" workflow: load the user's playlists, filter and select
//! them, create new ones inline, then attach a track to every selected
//! playlist at once.

use crate::api::{ApiError, MusicBackend, Playlist, PlaylistId, TrackId};
use crate::session::Session;
use crate::state::StateHandle;
use futures_util::future::join_all;
use std::collections::BTreeSet;
use std::rc::Rc;

const CREATE_FALLBACK: &str = "Could not create the playlist.";
const SAVE_FALLBACK: &str = "Something went wrong while adding the track.";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PickerMode {
    #[default]
    Closed,
    /// `track_id` is `None` when the picker is only used to manage playlists.
    Open { track_id: Option<TrackId> },
}

/// Transient input; reset when the picker closes or a save succeeds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaylistSelection {
    pub query: String,
    pub selected_ids: BTreeSet<PlaylistId>,
    /// `Some` while the inline creation form is shown.
    pub creation_draft: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickerState {
    pub mode: PickerMode,
    pub playlists: Vec<Playlist>,
    pub selection: PlaylistSelection,
    pub loading: bool,
    pub creating: bool,
    pub saving: bool,
    /// Blocking failure message for the last create or save.
    pub notice: Option<String>,
    open_generation: u64,
}

impl PickerState {
    pub fn is_open(&self) -> bool {
        matches!(self.mode, PickerMode::Open { .. })
    }

    pub fn target_track(&self) -> Option<TrackId> {
        match self.mode {
            PickerMode::Open { track_id } => track_id,
            PickerMode::Closed => None,
        }
    }

    pub fn is_selected(&self, id: PlaylistId) -> bool {
        self.selection.selected_ids.contains(&id)
    }

    pub fn visible_playlists(&self) -> Vec<&Playlist> {
        filter_playlists(&self.playlists, &self.selection.query)
    }

    pub fn can_save(&self) -> bool {
        self.target_track().is_some() && !self.selection.selected_ids.is_empty() && !self.saving
    }

    /// Drops everything tied to the current opening, including the busy flags
    /// of calls whose completion will now be ignored.
    fn begin_generation(&mut self) {
        self.open_generation = self.open_generation.wrapping_add(1);
        self.selection = PlaylistSelection::default();
        self.loading = false;
        self.creating = false;
        self.saving = false;
        self.notice = None;
    }
}

/// Case-insensitive substring match on the playlist name. Purely local.
pub fn filter_playlists<'a>(playlists: &'a [Playlist], query: &str) -> Vec<&'a Playlist> {
    let needle = query.trim().to_lowercase();
    playlists
        .iter()
        .filter(|playlist| needle.is_empty() || playlist.name.to_lowercase().contains(&needle))
        .collect()
}

pub struct PlaylistPicker<B: ?Sized, H> {
    backend: Rc<B>,
    state: H,
}

impl<B: ?Sized, H: Clone> Clone for PlaylistPicker<B, H> {
    fn clone(&self) -> Self {
        Self {
            backend: Rc::clone(&self.backend),
            state: self.state.clone(),
        }
    }
}

impl<B, H> PlaylistPicker<B, H>
where
    B: MusicBackend + ?Sized,
    H: StateHandle<PickerState>,
{
    pub fn new(backend: Rc<B>, state: H) -> Self {
        Self { backend, state }
    }

    #[cfg(test)]
    pub fn state(&self) -> PickerState {
        self.state.snapshot()
    }

    /// Opens for `track_id` and, when the user is known, replaces the local
    /// playlist list with a fresh fetch. Calls still running from an earlier
    /// opening no longer affect the picker.
    pub async fn open(&self, track_id: Option<TrackId>, session: &Session) {
        let generation = self.state.update_with(|state| {
            state.begin_generation();
            state.mode = PickerMode::Open { track_id };
            state.loading = session.user_id.is_some();
            state.open_generation
        });

        let Some(user_id) = session.user_id else {
            return;
        };

        let result = match session.bearer() {
            Ok(token) => self.backend.user_playlists(token, user_id).await,
            Err(err) => Err(err),
        };

        self.state.update_with(|state| {
            if state.open_generation != generation {
                return;
            }
            state.loading = false;
            match result {
                Ok(playlists) => {
                    tracing::debug!(count = playlists.len(), "playlists loaded");
                    state.playlists = playlists;
                    let known: BTreeSet<PlaylistId> =
                        state.playlists.iter().map(|p| p.id).collect();
                    state.selection.selected_ids.retain(|id| known.contains(id));
                }
                Err(err) => {
                    tracing::warn!(user_id, "cannot load playlists: {err}");
                    state.playlists.clear();
                    state.selection.selected_ids.clear();
                }
            }
        });
    }

    pub fn set_query(&self, query: &str) {
        self.state
            .update_with(|state| state.selection.query = query.to_string());
    }

    /// Flips selection of a loaded playlist. Unknown ids are ignored.
    pub fn toggle(&self, id: PlaylistId) -> bool {
        self.state.update_with(|state| {
            if !state.playlists.iter().any(|playlist| playlist.id == id) {
                return false;
            }
            let selected = &mut state.selection.selected_ids;
            if !selected.remove(&id) {
                selected.insert(id);
            }
            selected.contains(&id)
        })
    }

    pub fn begin_create(&self) {
        self.state.update_with(|state| {
            if state.selection.creation_draft.is_none() {
                state.selection.creation_draft = Some(String::new());
            }
        });
    }

    pub fn set_draft(&self, text: &str) {
        self.state
            .update_with(|state| state.selection.creation_draft = Some(text.to_string()));
    }

    pub fn cancel_create(&self) {
        self.state
            .update_with(|state| state.selection.creation_draft = None);
    }

    /// Creates a playlist from the draft, appends it locally and selects it.
    /// On failure the form stays open with its text for another try.
    pub async fn submit_create(&self, session: &Session) -> Result<Playlist, ApiError> {
        let (draft, generation, busy) = self.state.read_with(|state| {
            (
                state.selection.creation_draft.clone(),
                state.open_generation,
                state.creating,
            )
        });
        if busy {
            return Err(ApiError::Validation(
                "A playlist is already being created.".into(),
            ));
        }

        let name = draft.as_deref().map(str::trim).unwrap_or_default().to_string();
        let prepared = if name.is_empty() {
            Err(ApiError::Validation("Please enter a playlist name.".into()))
        } else {
            session
                .user_id
                .ok_or(ApiError::NotAuthenticated)
                .and_then(|user_id| session.bearer().map(|token| (user_id, token)))
        };
        let (user_id, token) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                self.report(&err, CREATE_FALLBACK);
                return Err(err);
            }
        };

        self.state.update_with(|state| {
            state.creating = true;
            state.notice = None;
        });
        let result = self.backend.create_playlist(token, user_id, &name).await;

        self.state.update_with(|state| {
            let current = state.open_generation == generation;
            if current {
                state.creating = false;
            }
            match &result {
                Ok(playlist) => {
                    tracing::info!(playlist_id = playlist.id, "playlist created");
                    state.playlists.push(playlist.clone());
                    if current && state.is_open() {
                        state.selection.selected_ids.insert(playlist.id);
                        state.selection.creation_draft = None;
                    }
                }
                Err(err) => {
                    tracing::warn!("playlist creation failed: {err}");
                    if current {
                        state.notice = Some(err.user_message(CREATE_FALLBACK));
                    }
                }
            }
        });
        result
    }

    /// Attaches the target track to every selected playlist concurrently and
    /// waits for all of them. Any failure fails the whole save; calls that
    /// succeeded are not reverted, and the selection is kept for a retry.
    pub async fn save(&self, session: &Session) -> Result<usize, ApiError> {
        let (track_id, targets, busy, generation) = self.state.read_with(|state| {
            (
                state.target_track(),
                state.selection.selected_ids.iter().copied().collect::<Vec<_>>(),
                state.saving,
                state.open_generation,
            )
        });
        let Some(track_id) = track_id.filter(|_| !targets.is_empty()) else {
            return Err(ApiError::Validation(
                "Select at least one playlist.".into(),
            ));
        };
        if busy {
            return Err(ApiError::Validation("Already saving.".into()));
        }
        let token = match session.bearer() {
            Ok(token) => token,
            Err(err) => {
                self.report(&err, SAVE_FALLBACK);
                return Err(err);
            }
        };

        self.state.update_with(|state| {
            state.saving = true;
            state.notice = None;
        });

        let backend = &self.backend;
        let results = join_all(targets.iter().map(|&playlist_id| async move {
            backend
                .add_track_to_playlist(token, playlist_id, track_id)
                .await
        }))
        .await;

        let mut failures = results.into_iter().filter_map(Result::err);
        let Some(first_failure) = failures.next() else {
            tracing::info!(track_id, playlists = targets.len(), "track added");
            self.state.update_with(|state| {
                if state.open_generation == generation {
                    state.saving = false;
                    state.mode = PickerMode::Closed;
                    state.selection = PlaylistSelection::default();
                }
            });
            return Ok(targets.len());
        };

        tracing::warn!(
            track_id,
            failed = 1 + failures.count(),
            attempted = targets.len(),
            "adding track to playlists failed: {first_failure}"
        );
        self.state.update_with(|state| {
            if state.open_generation == generation {
                state.saving = false;
                state.notice = Some(first_failure.user_message(SAVE_FALLBACK));
            }
        });
        Err(first_failure)
    }

    /// Cancels without side effects. Playlists created meanwhile stay listed.
    pub fn close(&self) {
        self.state.update_with(|state| {
            state.begin_generation();
            state.mode = PickerMode::Closed;
        });
    }

    pub fn dismiss_notice(&self) {
        self.state.update_with(|state| state.notice = None);
    }

    fn report(&self, err: &ApiError, fallback: &str) {
        self.state
            .update_with(|state| state.notice = Some(err.user_message(fallback)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::local_state;
    use crate::test_support::{playlist, settle, Call, MockBackend};
    use futures_util::FutureExt;
    use std::cell::RefCell;
    use tokio::sync::Notify;
    use tokio::task::{spawn_local, LocalSet};

    type Picker = PlaylistPicker<MockBackend, Rc<RefCell<PickerState>>>;

    fn picker_with(playlists: Vec<Playlist>) -> (Picker, Rc<MockBackend>) {
        let backend = Rc::new(MockBackend::default());
        backend.playlists.replace(Ok(playlists));
        let picker = PlaylistPicker::new(Rc::clone(&backend), local_state(PickerState::default()));
        (picker, backend)
    }

    fn session() -> Session {
        Session::authenticated(5, "tok")
    }

    fn ids(set: &BTreeSet<PlaylistId>) -> Vec<PlaylistId> {
        set.iter().copied().collect()
    }

    fn added(backend: &MockBackend) -> Vec<Call> {
        backend
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::AddTrack { .. }))
            .collect()
    }

    #[tokio::test]
    async fn opening_loads_the_users_playlists_wholesale() {
        let (picker, backend) = picker_with(vec![playlist(1, "A"), playlist(2, "B")]);
        picker.state.update_with(|s| s.playlists = vec![playlist(99, "stale")]);

        picker.open(Some(42), &session()).await;

        let state = picker.state();
        assert!(state.is_open());
        assert!(!state.loading);
        assert_eq!(state.target_track(), Some(42));
        assert_eq!(
            state.playlists.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(backend.calls(), vec![Call::UserPlaylists(5)]);
    }

    #[tokio::test]
    async fn opening_without_user_skips_the_fetch() {
        let (picker, backend) = picker_with(vec![playlist(1, "A")]);

        picker.open(None, &Session::disconnected()).await;

        assert!(picker.state().is_open());
        assert!(!picker.state().loading);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn opening_without_token_fails_fast() {
        let (picker, backend) = picker_with(vec![playlist(1, "A")]);

        picker.open(Some(42), &session().without_token()).await;

        assert!(backend.calls().is_empty());
        assert!(picker.state().playlists.is_empty());
        assert!(!picker.state().loading);
    }

    #[tokio::test]
    async fn filter_is_case_insensitive_and_local() {
        let (picker, backend) = picker_with(vec![
            playlist(1, "Road Trip"),
            playlist(2, "Chill"),
            playlist(3, "ROCK classics"),
        ]);
        picker.open(Some(42), &session()).await;

        picker.set_query("ro");
        let visible: Vec<_> = picker.state().visible_playlists().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1, 3]);

        picker.set_query("");
        assert_eq!(picker.state().visible_playlists().len(), 3);
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_selection() {
        let (picker, _) = picker_with(vec![playlist(1, "A"), playlist(2, "B")]);
        picker.open(Some(42), &session()).await;
        picker.toggle(2);
        let before = picker.state().selection.selected_ids;

        assert!(picker.toggle(1));
        assert!(!picker.toggle(1));

        assert_eq!(picker.state().selection.selected_ids, before);
        assert_eq!(ids(&before), vec![2]);
    }

    #[tokio::test]
    async fn selection_only_references_loaded_playlists() {
        let (picker, _) = picker_with(vec![playlist(1, "A")]);
        picker.open(Some(42), &session()).await;

        assert!(!picker.toggle(7));
        assert!(picker.state().selection.selected_ids.is_empty());
    }

    #[tokio::test]
    async fn saving_one_selection_posts_once_and_closes() {
        let (picker, backend) = picker_with(vec![playlist(1, "A")]);
        picker.open(Some(42), &session()).await;
        picker.toggle(1);

        let saved = picker.save(&session()).await;

        assert_eq!(saved, Ok(1));
        let adds: Vec<_> = backend
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::AddTrack { .. }))
            .collect();
        assert_eq!(
            adds,
            vec![Call::AddTrack {
                playlist_id: 1,
                track_id: 42
            }]
        );
        let state = picker.state();
        assert_eq!(state.mode, PickerMode::Closed);
        assert!(state.selection.selected_ids.is_empty());
        assert_eq!(state.notice, None);
    }

    #[tokio::test]
    async fn creating_appends_and_selects_without_refetching() {
        let (picker, backend) = picker_with(vec![playlist(1, "A")]);
        backend.next_playlist_id.set(30);
        picker.open(Some(42), &session()).await;

        picker.begin_create();
        picker.set_draft("New");
        let created = picker.submit_create(&session()).await.unwrap();

        assert_eq!(created.id, 30);
        assert_eq!(created.name, "New");
        let state = picker.state();
        assert_eq!(state.playlists.last(), Some(&created));
        assert_eq!(ids(&state.selection.selected_ids), vec![30]);
        assert_eq!(state.selection.creation_draft, None);
        assert_eq!(
            backend.calls(),
            vec![Call::UserPlaylists(5), Call::CreatePlaylist("New".into())]
        );
    }

    #[tokio::test]
    async fn failed_creation_keeps_the_form_open() {
        let (picker, backend) = picker_with(vec![]);
        backend.create_error.replace(Some(ApiError::Http {
            status: 400,
            message: "Name already taken".into(),
        }));
        picker.open(Some(42), &session()).await;
        picker.begin_create();
        picker.set_draft("Dup");

        assert!(picker.submit_create(&session()).await.is_err());

        let state = picker.state();
        assert_eq!(state.selection.creation_draft.as_deref(), Some("Dup"));
        assert_eq!(state.notice.as_deref(), Some("Name already taken"));
        assert!(state.playlists.is_empty());
        assert!(!state.creating);
    }

    #[tokio::test]
    async fn blank_playlist_name_is_rejected_locally() {
        let (picker, backend) = picker_with(vec![]);
        picker.open(Some(42), &session()).await;
        picker.begin_create();
        picker.set_draft("   ");

        let err = picker.submit_create(&session()).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(backend.calls(), vec![Call::UserPlaylists(5)]);
        assert!(picker.state().selection.creation_draft.is_some());
    }

    // A partial failure fails the whole save. The two playlists that did
    // receive the track keep it, and the picker stays open with everything
    // still selected so the user can retry.
    #[tokio::test]
    async fn partial_save_failure_is_reported_as_total_failure() {
        let (picker, backend) =
            picker_with(vec![playlist(1, "A"), playlist(2, "B"), playlist(3, "C")]);
        backend.failing_playlists.borrow_mut().insert(2);
        picker.open(Some(42), &session()).await;
        for id in [1, 2, 3] {
            picker.toggle(id);
        }

        let result = picker.save(&session()).await;

        assert!(result.is_err());
        let state = picker.state();
        assert!(state.is_open());
        assert_eq!(ids(&state.selection.selected_ids), vec![1, 2, 3]);
        assert!(state.notice.is_some());
        assert!(!state.saving);
        let adds = backend
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::AddTrack { .. }))
            .count();
        assert_eq!(adds, 3);
    }

    #[tokio::test]
    async fn save_requires_a_track_and_a_selection() {
        let (picker, backend) = picker_with(vec![playlist(1, "A")]);
        picker.open(None, &session()).await;
        picker.toggle(1);
        assert!(!picker.state().can_save());
        assert!(picker.save(&session()).await.is_err());

        picker.open(Some(42), &session()).await;
        assert!(picker.save(&session()).await.is_err());
        assert!(!backend
            .calls()
            .iter()
            .any(|c| matches!(c, Call::AddTrack { .. })));
    }

    #[tokio::test]
    async fn save_without_token_makes_no_calls() {
        let (picker, backend) = picker_with(vec![playlist(1, "A")]);
        picker.open(Some(42), &session()).await;
        picker.toggle(1);

        let err = picker.save(&session().without_token()).await.unwrap_err();

        assert_eq!(err, ApiError::NotAuthenticated);
        assert_eq!(backend.calls(), vec![Call::UserPlaylists(5)]);
        assert!(picker.state().is_open());
    }

    #[tokio::test]
    async fn closing_discards_input_but_keeps_created_playlists() {
        let (picker, backend) = picker_with(vec![playlist(1, "A")]);
        backend.next_playlist_id.set(8);
        picker.open(Some(42), &session()).await;
        picker.begin_create();
        picker.set_draft("Fresh");
        picker.submit_create(&session()).await.unwrap();
        picker.set_query("fr");

        picker.close();

        let state = picker.state();
        assert_eq!(state.mode, PickerMode::Closed);
        assert_eq!(state.selection, PlaylistSelection::default());
        assert!(state.playlists.iter().any(|p| p.id == 8));
    }

    #[tokio::test]
    async fn save_launches_every_assignment_before_any_completes() {
        let (picker, backend) =
            picker_with(vec![playlist(1, "A"), playlist(2, "B"), playlist(3, "C")]);
        let gate = Rc::new(Notify::new());
        backend.add_gate.replace(Some(Rc::clone(&gate)));
        let picker = Rc::new(picker);
        picker.open(Some(42), &session()).await;
        for id in [1, 2, 3] {
            picker.toggle(id);
        }

        LocalSet::new()
            .run_until(async {
                let pending = {
                    let picker = Rc::clone(&picker);
                    spawn_local(async move { picker.save(&session()).await })
                };
                settle().await;

                // Every call is in flight while none has been answered.
                assert_eq!(
                    added(&backend),
                    [1, 2, 3]
                        .map(|playlist_id| Call::AddTrack {
                            playlist_id,
                            track_id: 42
                        })
                        .to_vec()
                );
                assert!(picker.state().saving);

                gate.notify_waiters();
                assert_eq!(pending.await.unwrap(), Ok(3));
            })
            .await;

        assert_eq!(picker.state().mode, PickerMode::Closed);
    }

    #[tokio::test]
    async fn abandoned_save_does_not_block_the_next_opening() {
        let (picker, backend) = picker_with(vec![playlist(1, "A")]);
        backend.add_gate.replace(Some(Rc::new(Notify::new())));
        picker.open(Some(42), &session()).await;
        picker.toggle(1);

        // The task driving the save is dropped while the call is held.
        assert!(picker.save(&session()).now_or_never().is_none());
        assert!(picker.state().saving);

        picker.close();
        assert!(!picker.state().saving);
        picker.open(Some(7), &session()).await;
        picker.toggle(1);
        assert!(picker.state().can_save());

        backend.add_gate.replace(None);
        assert_eq!(picker.save(&session()).await, Ok(1));
        assert_eq!(picker.state().mode, PickerMode::Closed);
        assert_eq!(
            added(&backend).last(),
            Some(&Call::AddTrack {
                playlist_id: 1,
                track_id: 7
            })
        );
    }

    #[tokio::test]
    async fn abandoned_create_does_not_block_the_next_opening() {
        let (picker, backend) = picker_with(vec![]);
        backend.create_gate.replace(Some(Rc::new(Notify::new())));
        picker.open(Some(42), &session()).await;
        picker.begin_create();
        picker.set_draft("Held");

        assert!(picker.submit_create(&session()).now_or_never().is_none());
        assert!(picker.state().creating);

        picker.close();
        assert!(!picker.state().creating);
        picker.open(Some(42), &session()).await;
        backend.create_gate.replace(None);
        picker.begin_create();
        picker.set_draft("Next");

        let created = picker.submit_create(&session()).await.unwrap();
        assert_eq!(created.name, "Next");
        assert_eq!(ids(&picker.state().selection.selected_ids), vec![created.id]);
    }

    #[tokio::test]
    async fn late_save_leaves_a_reopened_picker_alone() {
        let (picker, backend) = picker_with(vec![playlist(1, "A"), playlist(2, "B")]);
        let gate = Rc::new(Notify::new());
        backend.add_gate.replace(Some(Rc::clone(&gate)));
        let picker = Rc::new(picker);
        picker.open(Some(42), &session()).await;
        picker.toggle(1);

        LocalSet::new()
            .run_until(async {
                let pending = {
                    let picker = Rc::clone(&picker);
                    spawn_local(async move { picker.save(&session()).await })
                };
                settle().await;

                picker.close();
                picker.open(Some(7), &session()).await;
                picker.toggle(2);

                gate.notify_one();
                assert_eq!(pending.await.unwrap(), Ok(1));
            })
            .await;

        let state = picker.state();
        assert_eq!(state.mode, PickerMode::Open { track_id: Some(7) });
        assert_eq!(ids(&state.selection.selected_ids), vec![2]);
        assert!(!state.saving);
        assert_eq!(state.notice, None);
    }
}
