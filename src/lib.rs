// Library surface for the binary, headless runs and integration tests.
// Keep this free of terminal rendering so everything here can run without a TTY.
pub mod analysis;
pub mod coach;
pub mod config;
pub mod error;
pub mod feedback;
pub mod report;
pub mod runtime;
pub mod schema;
pub mod score;
pub mod session;
pub mod signal;
pub mod util;

pub use error::SessionError;
pub use session::{PitchSession, PitchState};
