pub mod authorization;
pub mod finder;
pub mod transcription;

pub use authorization::{AuthError, AuthorizationService};
pub use finder::{Finder, FinderError, TranscriptClient, TranscriptFinder};
pub use transcription::{TranscriptionError, TranscriptionService};
