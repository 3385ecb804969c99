//! Route admission middleware

use crate::authz::{Admission, AdmissionRequest};
use crate::server::AppState;
use crate::server::middleware::helpers::extract_session_token;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Redirects requests that route admission turns away
pub struct AdmissionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AdmissionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AdmissionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdmissionMiddlewareService { service }))
    }
}

/// Service implementation for admission middleware
pub struct AdmissionMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdmissionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let admission = req.app_data::<web::Data<AppState>>().map(|state| {
            let token = extract_session_token(req.headers(), &state.config.auth().session_cookie);
            state
                .admission
                .admit(&AdmissionRequest::new(req.path(), token.as_deref()))
        });

        match admission {
            Some(Admission::RedirectTo(location)) => {
                debug!(path = %req.path(), %location, "Request redirected by route admission");
                let response = HttpResponse::Found()
                    .insert_header((LOCATION, location))
                    .finish()
                    .map_into_right_body();
                Box::pin(async move { Ok(req.into_response(response)) })
            }
            Some(Admission::Continue) | None => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
        }
    }
}
