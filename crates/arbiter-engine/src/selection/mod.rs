pub mod selector;
pub mod validator;

pub use selector::select_best;
pub use validator::{validate, CRITICAL_RISK_ERROR};
