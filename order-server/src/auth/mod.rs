//! Authentication
//!
//! Deliberately thin: a verified bearer token yields `{ principal, name,
//! role }` and nothing else. Token issuing exists for tests and dev
//! tooling; there is no login flow here. Permission decisions belong to
//! the order service.

mod extractor;
mod jwt;

pub use jwt::{Claims, CurrentUser, JwtError, JwtService};
