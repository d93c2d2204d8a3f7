//! Beta signup records and the rules a submission must satisfy to become one.

pub mod errors;
pub mod signup;

pub use errors::ModelError;
pub use signup::{normalize_email, validate_email, SignupInput, SignupRecord};
