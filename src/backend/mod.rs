//! Backend: C runner emission.
//!
//! - `c_emitter` - indentation-aware C source buffer
//! - `runner` - composes the runner translation unit

pub mod c_emitter;
pub mod runner;

pub use c_emitter::CEmitter;
pub use runner::{RunnerEmitter, emit};
