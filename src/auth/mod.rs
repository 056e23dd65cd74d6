pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtKeys, TokenError};
pub use middleware::{require_auth, AuthUser};
pub use password::{HashingError, PasswordHasher};
