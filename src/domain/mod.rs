pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{ConvertedAudio, FormState, SubmitPhase, DEFAULT_FILENAME};
