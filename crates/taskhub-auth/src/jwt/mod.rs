//! JWT issuance and verification.

pub mod claims;
pub mod codec;

pub use claims::Claims;
pub use codec::{IssuedToken, TokenCodec};
