pub mod api_client;
pub mod engine;
pub mod loader;
pub mod normalizer;
pub mod preflight;
pub mod reporter;
pub mod submitter;

pub use crate::domain::model::Record;
pub use crate::domain::ports::{ApiTransport, Storage};
pub use crate::utils::error::Result;
