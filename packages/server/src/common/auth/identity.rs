use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::domains::auth::JwtService;

/// Verified caller, extracted from the bearer credential
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>, email: Option<&str>) -> Self {
        Self {
            uid: uid.into(),
            email: email.map(String::from),
        }
    }
}

/// Resolves the caller's identity from request headers.
///
/// A missing or unverifiable credential yields `None`; anonymous requests are
/// a normal outcome, never an error.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<Identity>;
}

/// Verifies `Authorization: Bearer <jwt>` against the configured secret
pub struct JwtIdentityResolver {
    jwt_service: JwtService,
}

impl JwtIdentityResolver {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl IdentityResolver for JwtIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<Identity> {
        let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = strip_bearer(auth_str);
        if token.is_empty() {
            return None;
        }

        let claims = self.jwt_service.verify_token(token).ok()?;

        Some(Identity {
            uid: claims.sub,
            email: claims.email,
        })
    }
}

/// Handles "Bearer <token>" with any scheme casing, or a raw token
fn strip_bearer(value: &str) -> &str {
    let trimmed = value.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> (JwtIdentityResolver, JwtService) {
        let jwt = JwtService::new("test_secret", "test_issuer".to_string());
        (JwtIdentityResolver::new(jwt.clone()), jwt)
    }

    fn headers(value: Option<String>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(v) = value {
            map.insert(AUTHORIZATION, v.parse().unwrap());
        }
        map
    }

    #[test]
    fn test_resolves_bearer_token() {
        let (resolver, jwt) = resolver();
        let token = jwt.create_token("u1", Some("a@x.com".to_string())).unwrap();

        let identity = resolver.resolve(&headers(Some(format!("Bearer {}", token))));
        assert_eq!(identity, Some(Identity::new("u1", Some("a@x.com"))));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let (resolver, jwt) = resolver();
        let token = jwt.create_token("u1", None).unwrap();

        let identity = resolver.resolve(&headers(Some(format!("bearer   {}", token))));
        assert_eq!(identity.map(|i| i.uid), Some("u1".to_string()));
    }

    #[test]
    fn test_raw_token_accepted() {
        let (resolver, jwt) = resolver();
        let token = jwt.create_token("u2", None).unwrap();

        assert!(resolver.resolve(&headers(Some(token))).is_some());
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        let (resolver, _) = resolver();
        assert!(resolver.resolve(&headers(None)).is_none());
    }

    #[test]
    fn test_malformed_token_is_anonymous() {
        let (resolver, _) = resolver();
        assert!(resolver
            .resolve(&headers(Some("Bearer not-a-jwt".to_string())))
            .is_none());
        assert!(resolver.resolve(&headers(Some("Bearer ".to_string()))).is_none());
    }
}
