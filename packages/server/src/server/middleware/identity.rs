use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::common::auth::{ErrorKind, Identity, IdentityResolver};

/// Identity middleware
///
/// Resolves the caller from the Authorization header and adds `Identity` to
/// request extensions. Without a valid credential the request continues
/// anonymously; gates decide whether that is acceptable.
pub async fn identity_middleware(
    resolver: Arc<dyn IdentityResolver>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolver.resolve(request.headers()) {
        Some(identity) => {
            debug!(uid = %identity.uid, "Authenticated caller");
            request.extensions_mut().insert(identity);
        }
        None => debug!("No valid authentication token"),
    }

    next.run(request).await
}

/// Authenticated caller, rejecting anonymous requests with `AuthFailed`
#[derive(Clone, Debug)]
pub struct Caller(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ErrorKind;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Caller)
            .ok_or(ErrorKind::AuthFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::auth::JwtIdentityResolver;
    use crate::domains::auth::JwtService;
    use axum::{body::Body, routing::get, Router};
    use tower::ServiceExt;

    async fn whoami(caller: Option<Caller>) -> String {
        caller.map(|Caller(id)| id.uid).unwrap_or_else(|| "anonymous".into())
    }

    fn app(jwt: JwtService) -> Router {
        let resolver: Arc<dyn IdentityResolver> = Arc::new(JwtIdentityResolver::new(jwt));
        Router::new()
            .route("/", get(whoami))
            .layer(axum::middleware::from_fn(move |req, next| {
                identity_middleware(resolver.clone(), req, next)
            }))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_bearer_token_sets_identity() {
        let jwt = JwtService::new("test_secret", "test_issuer".to_string());
        let token = jwt.create_token("uid-1", None).unwrap();

        let response = app(jwt)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_text(response).await, "uid-1");
    }

    #[tokio::test]
    async fn test_invalid_token_is_anonymous() {
        let jwt = JwtService::new("test_secret", "test_issuer".to_string());

        let response = app(jwt)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("authorization", "Bearer invalid_token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_text(response).await, "anonymous");
    }
}
