//! Configuration module for the dashboard.

// Can all be private now because we have a public re-export.
mod backend;
mod debug;
mod persistence;

// Can't be private because we don't re-export it
pub mod chart;

// Re-export commonly used items
pub use backend::{BACKEND, BackendEndpoints};
pub use debug::DF;
pub use persistence::PERSISTENCE;
