use axum::{
    async_trait,
    extract::{FromRequest, RequestParts},
    http::header::AUTHORIZATION,
};
use chrono::Utc;

use crate::auth::Session;
use crate::error::{unauthorized_error, Error};

#[async_trait]
impl<B> FromRequest<B> for Session
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let header = match req.headers().get(AUTHORIZATION) {
            Some(header) => header,
            None => return Ok(Session::Anonymous),
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| unauthorized_error().with_message("malformed authorization header"))?;

        Session::from_token(token, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tokio_test::block_on;

    fn parts(authorization: Option<&str>) -> RequestParts<Body> {
        let mut builder = Request::builder().uri("/programs");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        RequestParts::new(builder.body(Body::empty()).unwrap())
    }

    #[test]
    fn missing_header_is_anonymous() {
        let session = block_on(Session::from_request(&mut parts(None))).unwrap();
        assert!(session.bearer().is_none());
    }

    #[test]
    fn non_bearer_header_is_refused() {
        let err = block_on(Session::from_request(&mut parts(Some("Basic abc")))).unwrap_err();
        assert_eq!(err.code, 401);

        let err = block_on(Session::from_request(&mut parts(Some("Bearer ")))).unwrap_err();
        assert_eq!(err.code, 401);
    }

    #[test]
    fn bearer_token_is_decoded() {
        // {"sub":"5"}
        let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiI1In0.sig";
        let header = format!("Bearer {}", token);

        let session = block_on(Session::from_request(&mut parts(Some(&header)))).unwrap();
        assert_eq!(session.bearer(), Some(token));
        assert_eq!(session.actor().id, 5);
    }
}
