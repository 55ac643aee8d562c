//! Piezas compartidas del front end de recetas: el guard de rutas protegidas
//! y su adaptador como middleware de actix-web.

pub mod auth;
pub mod error;
pub mod guard;
pub mod middleware;
pub mod store;

pub use auth::{Claims, ClaimsDecoder, SecretDecoder, UnverifiedDecoder};
pub use error::{DecodeError, GuardError};
pub use guard::{decide, evaluate, Decision, RouteGuard, CREDENTIAL_KEY, LOGIN_PATH};
pub use middleware::GuardMiddleware;
pub use store::CredentialStore;
