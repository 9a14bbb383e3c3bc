//! Domain core for the lectern read-aloud relay.
//!
//! Pure logic only: reference parsing, admission control, wire events,
//! settings, and the port traits the adapter crates implement. Nothing in
//! this crate touches a socket, a clock source it didn't receive as an
//! argument, or an audio device.

pub mod admission;
pub mod events;
pub mod ports;
pub mod reference;
pub mod request;
pub mod settings;

// Re-export commonly used types for convenience
pub use admission::{AdmissionConfig, AdmissionController, Rejection};
pub use events::ReadEvent;
pub use ports::{
    ChatEvent, ChatSource, ClipPlayer, LookupError, PassageDoc, PassageLookup, PassageSegment,
    PresentError, SpeechSynth,
};
pub use request::ReadRequest;
pub use settings::{ReaderSettings, RelaySettings};
