//! Caller identity extractors.
//!
//! Identity arrives as plain request headers with no proof of possession -
//! the frontend asserts who it is. The extractors keep that weakness in one
//! place: handlers and the service below them only ever see an opaque,
//! already-extracted username.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use std::future::{Ready, ready};

use croft_shared::ErrorResponse;

/// Header carrying the caller's username.
pub static USER_NAME_HEADER: &str = "X-User-Name";

/// Header carrying the caller's avatar reference.
pub static USER_IMAGE_HEADER: &str = "X-User-Image";

/// Caller identity extractor.
///
/// Use this in handlers that require an identity:
/// ```ignore
/// async fn update_post(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub avatar: Option<String>,
}

/// Error type for a missing or unreadable identity header.
#[derive(Debug)]
pub struct IdentityError;

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing {} header", USER_NAME_HEADER)
    }
}

impl actix_web::ResponseError for IdentityError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = ErrorResponse::unauthorized(format!(
            "Please provide a non-empty {} header.",
            USER_NAME_HEADER
        ));
        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

impl FromRequest for Identity {
    type Error = IdentityError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(username) = header_value(req, USER_NAME_HEADER) else {
            return ready(Err(IdentityError));
        };

        ready(Ok(Identity {
            username,
            avatar: header_value(req, USER_IMAGE_HEADER),
        }))
    }
}

/// Optional identity extractor - yields `None` instead of failing when the
/// header is absent.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => ready(Ok(OptionalIdentity(Some(identity)))),
            Err(_) => ready(Ok(OptionalIdentity(None))),
        }
    }
}
