//! Consumer side of the lectern relay: queue, resolver, presentation.
//!
//! A [`ReaderSession`] subscribes to the relay's broadcast stream and
//! presents requests one at a time — visual state first, then supplied
//! audio or synthesized speech, gated behind a one-time unlock gesture.

pub mod audio;
pub mod engine;
pub mod gate;
pub mod resolver;
pub mod session;
pub mod transport;

pub use audio::RodioClipPlayer;
pub use engine::{PresentationEngine, ReaderEvent};
pub use gate::UnlockGate;
pub use resolver::{ContentResolver, HttpPassageLookup};
pub use session::ReaderSession;
pub use transport::SseSubscriber;
