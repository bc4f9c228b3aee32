use crate::api::{MusicBackend, TrackId};
use crate::session::Session;
use crate::state::StateHandle;
use std::rc::Rc;

/// Heart state of one rendered track card. Starts inactive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavoriteState {
    pub track_id: TrackId,
    pub active: bool,
    pub pending: bool,
}

impl FavoriteState {
    pub fn new(track_id: TrackId) -> Self {
        Self {
            track_id,
            active: false,
            pending: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToggleOutcome {
    /// The server confirmed; holds the new `active` value.
    Changed(bool),
    /// Nothing was sent: signed out, or a call is already in flight.
    Skipped,
    /// The call failed and the state was left as it was.
    Failed,
}

pub struct FavoriteToggle<B: ?Sized, H> {
    backend: Rc<B>,
    state: H,
}

impl<B, H> FavoriteToggle<B, H>
where
    B: MusicBackend + ?Sized,
    H: StateHandle<FavoriteState>,
{
    pub fn new(backend: Rc<B>, state: H) -> Self {
        Self { backend, state }
    }

    #[cfg(test)]
    pub fn state(&self) -> FavoriteState {
        self.state.snapshot()
    }

    /// Adds or removes the favorite. `active` only flips once the server has
    /// confirmed; failures are logged and otherwise ignored.
    pub async fn toggle(&self, session: &Session) -> ToggleOutcome {
        if !session.connected {
            return ToggleOutcome::Skipped;
        }
        let Ok(token) = session.bearer() else {
            return ToggleOutcome::Skipped;
        };

        let claimed = self.state.update_with(|state| {
            if state.pending {
                None
            } else {
                state.pending = true;
                Some((state.track_id, state.active))
            }
        });
        let Some((track_id, was_active)) = claimed else {
            return ToggleOutcome::Skipped;
        };

        let result = if was_active {
            self.backend.remove_favorite(token, track_id).await
        } else {
            self.backend.add_favorite(token, track_id).await
        };

        self.state.update_with(|state| {
            state.pending = false;
            match result {
                Ok(()) => {
                    state.active = !was_active;
                    tracing::debug!(track_id, active = state.active, "favorite updated");
                    ToggleOutcome::Changed(state.active)
                }
                Err(err) => {
                    tracing::warn!(track_id, "favorite toggle failed: {err}");
                    ToggleOutcome::Failed
                }
            }
        })
    }
}
