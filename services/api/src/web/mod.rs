pub mod extract;
pub mod health;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the router builder so the binary and the tests share one
// definition of the HTTP surface.
pub use router::build_router;
pub use state::AppState;
