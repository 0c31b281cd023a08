pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod models;
pub mod results;
pub mod session;

pub use api::{HttpPredictionApi, PredictionApi};
pub use controller::{FormSubmissionController, LocationBar, Navigator, RESULTS_PAGE};
pub use error::SubmitError;
pub use form::FormData;
pub use models::{FeaturesInput, PredictionResult};
pub use session::{FileStore, MemoryStore, SessionStore};
