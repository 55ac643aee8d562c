use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use chrono::Utc;
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::guard::{Decision, RouteGuard};

/// Middleware que protege un `scope` con el `RouteGuard`.
///
/// La decisión se toma antes de llamar al servicio interno, así que una
/// redirección nunca llega a ejecutar el handler protegido.
pub struct GuardMiddleware {
    guard: Arc<RouteGuard>,
}

impl GuardMiddleware {
    pub fn new(guard: Arc<RouteGuard>) -> Self {
        Self { guard }
    }
}

impl<S, B> Transform<S, ServiceRequest> for GuardMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = GuardMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GuardMiddlewareService {
            service,
            guard: Arc::clone(&self.guard),
        }))
    }
}

pub struct GuardMiddlewareService<S> {
    service: S,
    guard: Arc<RouteGuard>,
}

impl<S, B> Service<ServiceRequest> for GuardMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.guard.check(Utc::now(), req.request()) {
            Decision::Proceed => {
                debug!("navigation to {} allowed", req.path());
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Decision::RedirectTo(location) => {
                warn!("navigation to {} redirected to {location}", req.path());
                let res = req
                    .into_response(
                        HttpResponse::Found()
                            .insert_header((header::LOCATION, location))
                            .finish(),
                    )
                    .map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
