#![forbid(unsafe_code)]

pub mod engine;
pub mod ethics;
pub mod metrics;
pub mod outcome;
pub mod risk;
pub mod scoring;
pub mod selection;
pub mod store;

pub use engine::DecisionEngine;
