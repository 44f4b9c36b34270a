// Library crate for the session cookie service
// This file exposes the public API for integration tests

pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use session::{
    CookieAttacher, Environment, SessionConfig, TokenError, TokenIssuer, TokenUser,
    TokenValidator,
};
pub use shared::{AppError, AppState};
