//! Bearer token authentication.
//!
//! Protected handlers take an [`Authenticated`] argument. The extractor reads
//! `Authorization: Bearer <token>` (a bare token is accepted too) and resolves
//! it through the [`TokenVerifier`](crate::domain::ports::TokenVerifier) port
//! held in [`HttpState`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

/// Identity of the caller behind a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub UserId);

/// Extract the raw token from an `Authorization` header value.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let trimmed = header.trim();
    let token = match trimmed.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return None,
        None => trimmed,
    };
    (!token.is_empty()).then_some(token)
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_owned);
        let state = req.app_data::<web::Data<HttpState>>().cloned();

        Box::pin(async move {
            let token = token.ok_or_else(|| Error::unauthorized("missing bearer token"))?;
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered with the app"))?;
            state.tokens.verify(&token).await.map(Authenticated)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc123", Some("abc123"))]
    #[case("bearer   abc123  ", Some("abc123"))]
    #[case("abc123", Some("abc123"))]
    #[case("Basic dXNlcjpwYXNz", None)]
    #[case("Bearer ", None)]
    #[case("", None)]
    fn bearer_token_parsing(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }
}
