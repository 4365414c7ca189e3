//! Request authentication gate.

pub mod validator;

pub use validator::{AuthenticatedIdentity, TokenValidator, bearer_token};
