//! Reading Coach Core
//!
//! The structured AI response pipeline behind the reading coach: credential
//! resolution, prompt construction, the Gemini schema contract, response
//! validation and the capability façade that ties them together.

pub mod audio;
pub mod coach;
pub mod config;
pub mod credential;
pub mod model_client;
pub mod prompt;
pub mod reading;
pub mod schema;
pub mod validate;

pub use audio::AudioPayload;
pub use coach::ReadingCoach;
pub use config::CoachConfig;
pub use credential::Credential;
pub use reading::{ReadingError, ReadingErrorKind, ReadingResult, ScoreSet};
