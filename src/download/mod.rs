//! Download module: what to fetch and what came out of it.
//!
//! - `download` - [`Download`], a URL and the file name it is saved under
//! - `summary` - [`Summary`], the outcome of a finished download

pub mod download;
pub mod summary;

pub use download::Download;
pub use summary::Summary;
