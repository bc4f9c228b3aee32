//! Backend access: canonical records, the error taxonomy and the REST client.

pub mod backend;
pub mod error;
pub mod models;
mod orchestra;

pub use backend::MusicBackend;
pub use error::ApiError;
pub use models::*;
pub use orchestra::OrchestraClient;
