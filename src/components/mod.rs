//! The components module contains the Dioxus shell around the core services.

mod app;
mod icons;
mod playlist_modal;
mod track_card;
pub mod views;

pub use app::*;
pub use icons::*;
pub use playlist_modal::*;
pub use track_card::*;
// Views are accessed via views::ViewName
