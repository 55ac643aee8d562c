use recipe_common::{RouteGuard, SecretDecoder, UnverifiedDecoder, CREDENTIAL_KEY};
use std::env;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid port number, got `{0}`")]
    InvalidPort(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Configuración del servicio, leída de variables de entorno (o de `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub credential_cookie: String,
    pub jwt_secret: Option<String>,
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Una variable vacía cuenta como no definida.
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(port) => port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?,
            None => 8080,
        };

        // Aquí no se usa `var`: un nombre de cookie vacío es un error de
        // configuración, no un "usar el valor por defecto".
        let credential_cookie = match lookup("CREDENTIAL_COOKIE") {
            Some(name) if name.trim().is_empty() => return Err(ConfigError::Empty("CREDENTIAL_COOKIE")),
            Some(name) => name.trim().to_owned(),
            None => CREDENTIAL_KEY.to_owned(),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            credential_cookie,
            jwt_secret: var("JWT_SECRET"),
            allowed_origin: var("ALLOWED_ORIGIN"),
        })
    }

    /// Construye el guard: con `JWT_SECRET` se verifica la firma, sin él solo
    /// se lee el payload.
    pub fn route_guard(&self) -> RouteGuard {
        match &self.jwt_secret {
            Some(secret) => {
                info!("Verifying credential signatures with JWT_SECRET");
                RouteGuard::new(&self.credential_cookie, SecretDecoder::new(secret.as_bytes()))
            }
            None => {
                warn!("JWT_SECRET not set, credential signatures are not verified");
                RouteGuard::new(&self.credential_cookie, UnverifiedDecoder::default())
            }
        }
    }
}
