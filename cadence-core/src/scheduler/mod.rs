//! Measurement scheduler
//!
//! Decides, once per superloop iteration, which sensor channel is due and
//! how user events move the menu.

pub mod sequencer;

pub use sequencer::{Sequencer, Step};
