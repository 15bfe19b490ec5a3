//! Admission-control middleware applying the fixed-window rate limiter.
//!
//! Requests are keyed by caller network address and checked before any
//! handler runs. A denied request is answered immediately with 429 and a
//! `Retry-After` header; it never reaches the consistency layer.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error as ActixError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderValue, RETRY_AFTER};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::Error;
use crate::domain::rate_limit::{Admission, FixedWindowLimiter};

/// Fallback key for requests whose caller address cannot be determined.
const UNKNOWN_CALLER: &str = "unknown";

/// Admission-control middleware wrapping a shared [`FixedWindowLimiter`].
///
/// # Examples
/// ```ignore
/// let app = App::new().wrap(RateLimit::new(limiter));
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<FixedWindowLimiter>,
}

impl RateLimit {
    /// Wrap `limiter` for use as application middleware.
    pub fn new(limiter: Arc<FixedWindowLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<FixedWindowLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or(UNKNOWN_CALLER)
            .to_owned();

        match self.limiter.check(&key) {
            Admission::Allowed => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Admission::Denied { retry_after_secs } => {
                debug!(caller = %key, retry_after_secs, "request denied by rate limiter");
                let error = Error::too_many_requests("rate limit exceeded, retry later");
                let mut response = actix_web::ResponseError::error_response(&error);
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
                let res = req.into_response(response).map_into_right_body();
                Box::pin(ready(Ok(res)))
            }
        }
    }
}
