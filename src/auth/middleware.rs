use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::sync::Arc;

use crate::auth::extractors::AuthenticatedSubject;
use crate::auth::token::TokenCodec;
use crate::error::AppError;

/// Gate in front of every protected route.
///
/// Reads the token from the `Authorization` header as-is, verifies it and
/// stores the resulting [`AuthenticatedSubject`] in the request extensions.
/// Any failure answers the request with a generic 401 before the handler runs.
pub struct IdentityMiddleware {
    codec: Arc<TokenCodec>,
}

impl IdentityMiddleware {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = IdentityMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service,
            codec: Arc::clone(&self.codec),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: S,
    codec: Arc<TokenCodec>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());

        let Some(token) = token else {
            log::debug!("{} {}: missing token", req.method(), req.path());
            return Box::pin(ready(Ok(reject(req))));
        };

        match self.codec.verify(token) {
            Ok(subject_id) => {
                req.extensions_mut()
                    .insert(AuthenticatedSubject::new(subject_id));
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(e) => {
                log::debug!("{} {}: token rejected: {}", req.method(), req.path(), e);
                Box::pin(ready(Ok(reject(req))))
            }
        }
    }
}

fn reject<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    req.into_response(AppError::Authentication.error_response())
        .map_into_right_body()
}
