//! Concrete implementations of the application's outbound ports.

pub mod outbound;
