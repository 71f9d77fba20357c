// waypath_core/src/lib.rs

// This file defines the public modules of the library.
pub mod config;
pub mod document;
pub mod error;
pub mod planning;
pub mod playback;
pub mod prelude;
pub mod spline;
pub mod types;
pub mod utils;
