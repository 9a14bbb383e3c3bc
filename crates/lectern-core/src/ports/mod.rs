//! Port traits — the seams between domain logic and infrastructure.
//!
//! Adapters implement these: the relay provides a [`ChatSource`], the
//! reader provides a [`PassageLookup`], a [`ClipPlayer`], and (optionally)
//! a [`SpeechSynth`]. Keeping the traits here means the domain crates
//! never depend on a transport, an HTTP client, or an audio backend.

mod chat;
mod lookup;
mod present;

pub use chat::{ChatEvent, ChatSource};
pub use lookup::{LookupError, PassageDoc, PassageLookup, PassageSegment};
pub use present::{ClipPlayer, PresentError, SpeechSynth};
