//! Authenticated caller extraction.
//!
//! Handlers that require authentication take an [`Identity`] parameter; the
//! extractor validates the bearer token and resolves the acting account
//! through the cache-aside read path before the handler body runs.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::Error;
use crate::domain::user::User;
use crate::inbound::http::state::HttpState;

/// The authenticated account behind the current request.
#[derive(Debug, Clone)]
pub struct Identity {
    /// The acting user, resolved through the cached read path.
    pub user: User,
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authorization header is missing"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is malformed"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("authorization header is malformed"))
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<HttpState>>()
                .ok_or_else(|| Error::internal("application state is missing"))?;

            let token = bearer_token(&req)?;
            let user_id = state
                .tokens
                .validate(&token)
                .map_err(|_| Error::unauthorized("token is invalid or expired"))?;

            let user = state.user_reader.get(user_id).await.map_err(|err| {
                // A token can outlive its account.
                match err.code() {
                    crate::domain::ErrorCode::NotFound => {
                        Error::unauthorized("account no longer exists")
                    }
                    _ => err,
                }
            })?;

            Ok(Identity { user })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn missing_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = bearer_token(&req).expect_err("no header");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(bearer_token(&req).is_err());
    }

    #[test]
    fn bearer_token_is_extracted() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).expect("token"), "abc.def.ghi");
    }
}
