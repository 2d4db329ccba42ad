//! HTTP request handlers.

pub mod clip;
pub mod health;

pub use clip::*;
pub use health::*;
