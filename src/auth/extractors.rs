use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The authenticated caller of a protected request.
///
/// `IdentityMiddleware` inserts it into the request extensions after a token
/// verifies; handlers receive it as a typed argument. It lives exactly as
/// long as the request and cannot be built from client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedSubject(i64);

impl AuthenticatedSubject {
    pub(crate) fn new(subject_id: i64) -> Self {
        Self(subject_id)
    }

    pub fn id(&self) -> i64 {
        self.0
    }
}

impl FromRequest for AuthenticatedSubject {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedSubject>().copied() {
            Some(subject) => ready(Ok(subject)),
            None => {
                // Only reachable on a route mounted without IdentityMiddleware.
                log::error!(
                    "no authenticated subject on {}; is IdentityMiddleware mounted?",
                    req.path()
                );
                ready(Err(AppError::Authentication.into()))
            }
        }
    }
}
