pub mod auth_service;
pub use auth_service::{AuthError, AuthService, AuthSession, Registration};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod blog_service;
pub use blog_service::{BlogDraft, BlogError, BlogService};

pub mod blog_service_impl;
pub use blog_service_impl::SeaOrmBlogService;

pub mod token;
pub use token::{TokenClaims, TokenError, TokenService, TokenSubject};
