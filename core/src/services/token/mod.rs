//! Token codec module for signed, expiring tokens
//!
//! One generic codec covers both token kinds; the session service holds
//! two instances configured with independent secrets and lifetimes.

mod codec;

pub use codec::TokenCodec;
