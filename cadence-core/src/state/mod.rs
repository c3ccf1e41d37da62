//! Measurement menu state machine
//!
//! Explicit, finite, and deterministic: the streamed channel depends only
//! on the current mode and the events fed in.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{Channel, IndicatorPattern, Mode};
