pub mod config;
pub mod extractors;
pub mod jwt;
pub mod middleware;
pub mod principal;

pub use config::JwtConfig;
pub use middleware::AuthLayer;
pub use principal::Principal;
