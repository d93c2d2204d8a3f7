//! Transport adapters over the signup service: an axum HTTP server and a
//! stateless function handler.

pub mod errors;
pub mod extract;
pub mod function;
pub mod observability;
pub mod routes;
pub mod startup;

pub use startup::run;
