use actix_cors::Cors;
use actix_web::{
    http::header::ContentType, middleware::Logger, web, App, HttpResponse, HttpServer, Responder,
};
use recipe_common::{GuardMiddleware, RouteGuard, LOGIN_PATH};
use serde::Serialize;
use std::{io, sync::Arc};
use tracing::info;

mod config;

use config::Config;

// --- Modelos de Datos ---

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

// --- Manejadores de Endpoints (Handlers) ---

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus { status: "ok" })
}

/// El contenido real lo renderiza el front end a partir del CMS; aquí solo
/// se sirve el esqueleto de cada vista.
fn page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><main>{body}</main></body></html>"
    ))
}

async fn home() -> impl Responder {
    page("Recipes", "<h1>Recipes</h1>")
}

async fn login() -> impl Responder {
    page("Log in", "<h1>Log in</h1>")
}

/// Vista protegida. Si se llega aquí el guard ya aceptó la credencial.
async fn account() -> impl Responder {
    page("My account", "<h1>My account</h1>")
}

async fn my_recipes() -> impl Responder {
    page("My recipes", "<h1>My recipes</h1>")
}

// --- Configuración de la Aplicación ---

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = match allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allow_any_method().allow_any_header()
}

/// Rutas públicas más el scope `/account`, protegido por el guard.
fn routes(cfg: &mut web::ServiceConfig, guard: Arc<RouteGuard>) {
    cfg.route("/health", web::get().to(health))
        .route("/", web::get().to(home))
        .route(LOGIN_PATH, web::get().to(login))
        .service(
            web::scope("/account")
                .wrap(GuardMiddleware::new(guard))
                .route("", web::get().to(account))
                .route("/recipes", web::get().to(my_recipes)),
        );
}

// --- Función Principal ---

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Primero el .env, para que RUST_LOG también pueda venir de ahí.
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config =
        Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let guard = Arc::new(config.route_guard());

    info!(
        "🚀 Servidor web de recetas iniciado en http://{}:{}",
        config.host, config.port
    );

    let allowed_origin = config.allowed_origin.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(Logger::default())
            .configure(|cfg| routes(cfg, Arc::clone(&guard)))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{cookie::Cookie, http::header, http::StatusCode, test};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token(exp: i64) -> String {
        encode(
            &Header::default(),
            &json!({ "sub": "chef", "exp": exp }),
            &EncodingKey::from_secret(b"cms"),
        )
        .unwrap()
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new().configure(|cfg| routes(cfg, Arc::new(RouteGuard::default()))),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn public_pages_are_reachable_without_credential() {
        let app = app!();

        for uri in ["/", "/login"] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = app!();

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[actix_web::test]
    async fn protected_pages_redirect_to_login() {
        let app = app!();
        let expired = token(Utc::now().timestamp() - 10);

        for uri in ["/account", "/account/recipes"] {
            let anonymous = test::TestRequest::get().uri(uri).to_request();
            let res = test::call_service(&app, anonymous).await;
            assert_eq!(res.status(), StatusCode::FOUND, "{uri}");
            assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");

            let stale = test::TestRequest::get()
                .uri(uri)
                .cookie(Cookie::new("recipe_token", expired.clone()))
                .to_request();
            let res = test::call_service(&app, stale).await;
            assert_eq!(res.status(), StatusCode::FOUND, "{uri}");
        }
    }

    #[actix_web::test]
    async fn protected_pages_render_with_live_credential() {
        let app = app!();
        let live = token(Utc::now().timestamp() + 3600);

        for uri in ["/account", "/account/recipes"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .cookie(Cookie::new("recipe_token", live.clone()))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
    }
}
