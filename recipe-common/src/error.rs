use thiserror::Error;

/// El valor almacenado no se pudo convertir en un conjunto de claims.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("credential has no payload segment")]
    MissingPayload,

    #[error("payload segment has an invalid base64url length ({0})")]
    PayloadLength(usize),

    #[error("payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not a valid claim set: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not verify credential: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Motivos por los que el guard rechaza una navegación.
///
/// Todos terminan en la misma redirección a `/login`; la variante solo sirve
/// para los logs y los tests.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("no credential stored")]
    MissingCredential,

    #[error("malformed credential: {0}")]
    MalformedCredential(#[from] DecodeError),

    #[error("credential expired or has no expiry")]
    ExpiredCredential,
}
