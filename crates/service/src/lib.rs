//! Service layer for beta signups.
//! - `signup`: submit/count operations shared by every transport adapter.
//! - `storage`: the load/save interface and its file and memory backends.
//! - `payload`: decoding of JSON and form bodies into one field mapping.

pub mod errors;
pub mod payload;
pub mod runtime;
pub mod signup;
pub mod storage;
