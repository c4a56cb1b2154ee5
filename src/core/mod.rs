pub mod echo;
pub mod engine;
pub mod session;
pub mod store;
pub mod view;

pub use engine::{EngineEvent, EngineOptions, MergeOutcome, ReconciliationEngine};
