//! Interactive query session over a built retrieval index.

pub mod session;
pub mod state;

pub use session::{Input, QuerySession, Report, SessionPhase, EXIT_TOKEN};
pub use state::AppState;

#[cfg(test)]
mod tests;
