pub mod claims;
pub mod errors;
pub mod service;

pub use claims::AccessClaims;
pub use claims::Role;
pub use claims::RoleParseError;
pub use errors::TokenError;
pub use service::TokenService;
