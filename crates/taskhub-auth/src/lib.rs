//! # taskhub-auth
//!
//! Credential handling for TaskHub.
//!
//! ## Modules
//!
//! - `jwt`: HS256 token issuance and verification
//! - `guard`: the gate every protected request passes: signature, expiry,
//!   account status, and the revocation counter
//! - `password`: Argon2id hashing and password policy

pub mod guard;
pub mod jwt;
pub mod password;

pub use guard::{AuthenticatedIdentity, TokenValidator, bearer_token};
pub use jwt::{Claims, IssuedToken, TokenCodec};
pub use password::{PasswordHasher, PasswordValidator};
