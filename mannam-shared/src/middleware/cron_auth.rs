use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::errors::{AppError, ErrorCode};

/// Proves the request came from the scheduler. Cron endpoints carry a
/// shared secret either as a `?secret=` query parameter or as a
/// `Authorization: Bearer <secret>` header.
pub struct CronCaller;

#[axum::async_trait]
impl<S> FromRequestParts<S> for CronCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let expected = match std::env::var("CRON_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!("CRON_SECRET is not configured, rejecting cron request");
                return Err(AppError::new(
                    ErrorCode::Unauthorized,
                    "cron authentication is not configured",
                ));
            }
        };

        let from_query = parts.uri.query().and_then(|q| query_param(q, "secret"));
        let from_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let presented = from_query.or_else(|| from_header.map(str::to_string));

        match presented {
            Some(secret) if secret == expected => Ok(Self),
            _ => Err(AppError::new(
                ErrorCode::Unauthorized,
                "invalid cron secret",
            )),
        }
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_named_query_parameter() {
        assert_eq!(
            query_param("secret=abc123&dry_run=true", "secret"),
            Some("abc123".to_string())
        );
        assert_eq!(
            query_param("dry_run=true&secret=abc123", "secret"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn missing_parameter_yields_none() {
        assert_eq!(query_param("dry_run=true", "secret"), None);
        assert_eq!(query_param("", "secret"), None);
    }

    #[test]
    fn does_not_match_prefixed_names() {
        assert_eq!(query_param("cron_secret=abc", "secret"), None);
    }
}
