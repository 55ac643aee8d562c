use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::DecodeError;

/// Estructura para las 'claims' del JWT guardado en el navegador.
/// Solo `exp` tiene tipo; el resto (`sub`, roles, lo que mande el CMS) se
/// conserva tal cual, sea del tipo que sea.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Expiración en segundos desde epoch. Puede traer decimales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// `true` solo si `exp` existe y es estrictamente posterior a `now`.
    pub fn expires_after(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp_millis() as f64 / 1000.0;
        matches!(self.exp, Some(exp) if exp > now)
    }
}

/// Capacidad de decodificar el token almacenado.
///
/// Nunca debe entrar en pánico: cualquier entrada inválida es un `DecodeError`.
pub trait ClaimsDecoder: Send + Sync {
    fn decode(&self, raw: &str) -> Result<Claims, DecodeError>;
}

/// Desactiva las validaciones propias de `jsonwebtoken`: la expiración la
/// comprueba el guard con comparación estricta y sin margen.
fn claims_only(validation: &mut Validation) {
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
}

/// Decodifica base64url, con o sin padding.
fn base64_decode_url(input: &str) -> Result<Vec<u8>, DecodeError> {
    let standard_b64 = input.trim_end_matches('=').replace('-', "+").replace('_', "/");

    let padding = match standard_b64.len() % 4 {
        0 => "",
        2 => "==",
        3 => "=",
        _ => return Err(DecodeError::PayloadLength(input.len())),
    };

    let padded = format!("{}{}", standard_b64, padding);
    Ok(general_purpose::STANDARD.decode(padded)?)
}

/// Lee el payload (segundo segmento) sin mirar la cabecera ni la firma, igual
/// que el decodificador del navegador: acepta `alg: none`, cabeceras sin
/// `alg` y tokens de dos segmentos. La firma la comprueba quien emite y
/// consume el token.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnverifiedDecoder;

impl ClaimsDecoder for UnverifiedDecoder {
    fn decode(&self, raw: &str) -> Result<Claims, DecodeError> {
        let payload = raw.split('.').nth(1).ok_or(DecodeError::MissingPayload)?;
        let payload_bytes = base64_decode_url(payload)?;
        Ok(serde_json::from_slice(&payload_bytes)?)
    }
}

/// Verifica la firma HS256 con el secreto compartido (`JWT_SECRET`).
pub struct SecretDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl SecretDecoder {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        claims_only(&mut validation);
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl ClaimsDecoder for SecretDecoder {
    fn decode(&self, raw: &str) -> Result<Claims, DecodeError> {
        let token_data = decode::<Claims>(raw, &self.key, &self.validation)?;
        Ok(token_data.claims)
    }
}
