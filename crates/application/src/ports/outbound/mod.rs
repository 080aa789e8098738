//! These traits define what the application needs from the outside world.

pub mod clock;
pub mod codec;
pub mod issuer;
pub mod storage;

pub use clock::*;
pub use codec::*;
pub use issuer::*;
pub use storage::*;
