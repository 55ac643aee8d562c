use actix_web::HttpRequest;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Almacenamiento del lado del cliente donde el login deja la credencial.
///
/// Es de solo lectura: el guard nunca escribe ni borra.
pub trait CredentialStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl<H: BuildHasher> CredentialStore for HashMap<String, String, H> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<F> CredentialStore for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// En una petición HTTP la credencial viaja en la cookie del mismo nombre.
impl CredentialStore for HttpRequest {
    fn get(&self, key: &str) -> Option<String> {
        self.cookie(key).map(|cookie| cookie.value().to_owned())
    }
}
