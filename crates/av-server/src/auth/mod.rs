//! PIN authentication and session management
//!
//! A client proves knowledge of the shared PIN once and receives an opaque
//! session token (carried in a cookie). Tokens expire after a sliding window
//! of inactivity.

mod pin;
mod session;

pub use pin::{constant_time_eq, PinVerifier};
pub use session::{generate_token, SessionStore, TOKEN_BYTES};
