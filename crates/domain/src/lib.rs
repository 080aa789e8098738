//! Claim and payload model for JSON Web Tokens.
//!
//! This crate is the pure core of the token lifecycle engine: typed
//! claims, the validated payload that forms a token body, and the
//! structural/temporal rules enforced over it. It performs no I/O and
//! never reads the clock; the current time is always passed in.

pub mod claims;
pub mod error;
pub mod payload;
pub mod validator;

pub use claims::{Claim, ClaimFactory};
pub use payload::Payload;
pub use validator::PayloadValidator;
