//! Authentication utilities library
//!
//! Provides the credential primitives shared by the platform services:
//! - Password hashing (Argon2id)
//! - Signed access token issuance and verification (JWT, HS256)
//! - The role vocabulary carried inside token claims
//!
//! The service crates own registration/login policy; this crate only knows
//! how to hash, sign, and verify.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("not_my_password", &digest));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{Role, TokenService};
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", 24);
//! let token = tokens.issue("user123", "ana@example.com", Role::Learner).unwrap();
//! let claims = tokens.verify(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! assert_eq!(claims.role, Role::Learner);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::AccessClaims;
pub use token::Role;
pub use token::RoleParseError;
pub use token::TokenError;
pub use token::TokenService;
