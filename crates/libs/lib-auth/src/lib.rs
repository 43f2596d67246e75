//! # Authentication Library
//!
//! Credential issuance, validation, and rotation for the Vitalis platform:
//! password hashing, the signed-token codec, the auth engine (login,
//! refresh, identification), and secret-key role elevation.
//!
//! Built once as a library; each service instance imports it with its own
//! signing-key configuration.

pub mod engine;
pub mod error;
pub mod pwd;
pub mod secret;
pub mod token;

// Re-export commonly used types
pub use engine::{AuthConfig, AuthEngine, Tokens};
pub use error::{AuthError, Result};
pub use pwd::{hash_password, verify_password};
pub use secret::SecretKeyService;
pub use token::{IdentityClaims, SecretKeyClaims, TokenError};
