#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod errors;
pub mod option;
pub mod outcome;
pub mod schema;
pub mod traits;
pub mod types;
