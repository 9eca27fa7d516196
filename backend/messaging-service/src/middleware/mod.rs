pub mod error_handling;
pub mod logging;
pub mod session;

pub use session::{JwtSessionVerifier, SessionVerifier, TrustClaimedIdentity};
