//! Platform abstraction layer
//!
//! Browser key events arrive asynchronously from the frame loop. They are
//! latched here and drained once per frame into a `TickInput`.

pub mod input;

pub use input::{InputLatch, Key};
