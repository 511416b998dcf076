//! Event recording.
//!
//! A channel can log every event it delivers (input) and every event
//! posted through it (output) as JSON Lines. Logs are written under a
//! temporary name and only take their final name on a clean close, so
//! an aborted run leaves nothing behind.
//!
//! ```text
//!   init ──► <name>.tmp ──close──► <name>
//!                │
//!                └──abort──► (unlinked)
//! ```

mod error;
mod record;
mod recorder;
mod stream;

pub use error::RecordingError;
pub use record::{read_records, Record};
pub use recorder::Recorder;
pub use stream::{temp_path, RecordStream};
