//! Guard de navegación: decide si se puede entrar a una ruta protegida o si
//! hay que mandar al visitante a `/login`.
//!
//! La decisión es una función pura de la hora actual y del valor almacenado.
//! Ausente, malformado o expirado terminan en la misma redirección.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::auth::{Claims, ClaimsDecoder, UnverifiedDecoder};
use crate::error::GuardError;
use crate::store::CredentialStore;

/// Destino fijo de todas las redirecciones.
pub const LOGIN_PATH: &str = "/login";

/// Nombre con el que el login guarda el token.
pub const CREDENTIAL_KEY: &str = "recipe_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    RedirectTo(&'static str),
}

/// Clasifica el valor almacenado en uno de los resultados posibles.
pub fn evaluate<D>(
    now: DateTime<Utc>,
    stored: Option<&str>,
    decoder: &D,
) -> Result<Claims, GuardError>
where
    D: ClaimsDecoder + ?Sized,
{
    let raw = match stored {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(GuardError::MissingCredential),
    };

    let claims = decoder.decode(raw)?;
    if claims.expires_after(now) {
        Ok(claims)
    } else {
        Err(GuardError::ExpiredCredential)
    }
}

pub fn decide<D>(now: DateTime<Utc>, stored: Option<&str>, decoder: &D) -> Decision
where
    D: ClaimsDecoder + ?Sized,
{
    match evaluate(now, stored, decoder) {
        Ok(_) => Decision::Proceed,
        Err(e) => {
            debug!("credential rejected: {e}");
            Decision::RedirectTo(LOGIN_PATH)
        }
    }
}

/// Guard configurado con la clave de almacenamiento y el decodificador.
/// No tiene estado mutable, así que se comparte entre workers con `Arc`.
pub struct RouteGuard {
    key: String,
    decoder: Box<dyn ClaimsDecoder>,
}

impl RouteGuard {
    pub fn new(key: impl Into<String>, decoder: impl ClaimsDecoder + 'static) -> Self {
        Self {
            key: key.into(),
            decoder: Box::new(decoder),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn check<S>(&self, now: DateTime<Utc>, store: &S) -> Decision
    where
        S: CredentialStore + ?Sized,
    {
        let stored = store.get(&self.key);
        decide(now, stored.as_deref(), &*self.decoder)
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(CREDENTIAL_KEY, UnverifiedDecoder::default())
    }
}
