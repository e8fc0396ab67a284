//! Authentication: JWT session tokens, cookies, middleware, and extractors.

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod session;

pub use extractor::AuthUser;
pub use jwt::Claims;
