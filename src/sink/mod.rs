//! Writing parts into the shared output.
//!
//! - `target` - [`OutputTarget`], a destination accepting writes at absolute offsets
//! - `writer` - [`write_range`], the loop that drains one part into the target

pub mod target;
pub mod writer;

pub use target::OutputTarget;
pub use writer::{write_range, DEFAULT_BUFFER_SIZE};
