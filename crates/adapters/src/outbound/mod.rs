pub mod clock;
pub mod issuer;
pub mod jwt;
pub mod memory;

pub use clock::{FixedClock, SystemClock};
pub use issuer::StaticIssuer;
pub use jwt::JwtCodec;
pub use memory::InMemoryStorage;
