//! Core data models for the match tracker.

mod deck_template;
mod ids;
mod matches;
mod season;
mod stats;

pub use deck_template::*;
pub use ids::*;
pub use matches::*;
pub use season::*;
pub use stats::*;
