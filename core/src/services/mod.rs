//! Business services containing domain logic and use cases.

pub mod session;
pub mod token;

// Re-export commonly used types
pub use session::SessionService;
pub use token::TokenCodec;
