//! Token lifecycle orchestration.
//!
//! Builds validated payloads, signs them through the codec port,
//! checks presented tokens against the blacklist, and drives the
//! refresh and invalidate flows. Signing, storage, clock and issuer
//! resolution are behind outbound ports implemented elsewhere.

pub mod blacklist;
pub mod config;
pub mod error;
pub mod factory;
pub mod manager;
pub mod ports;

pub use blacklist::Blacklist;
pub use config::Config;
pub use factory::{CustomClaims, PayloadFactory};
pub use manager::{Token, TokenManager};
