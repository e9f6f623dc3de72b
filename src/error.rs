use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn invalid_state_error() -> Self {
        invalid_state_error()
    }

    pub fn invalid_input_error() -> Self {
        invalid_input_error()
    }

    pub fn unauthorized_error() -> Self {
        unauthorized_error()
    }

    pub fn not_found_error() -> Self {
        not_found_error()
    }

    pub fn is_invalid_input_error(&self) -> bool {
        self.code == 101
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 404
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        serialization_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        authorizor_error(err)
    }
}

impl From<geozero::error::GeozeroError> for Error {
    fn from(err: geozero::error::GeozeroError) -> Self {
        serialization_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            401 => (StatusCode::UNAUTHORIZED, self.message.as_str()),
            404 => (StatusCode::NOT_FOUND, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: 100,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn unauthorized_error() -> Error {
    Error {
        code: 401,
        message: "unauthorized".into(),
    }
}

pub fn not_found_error() -> Error {
    Error {
        code: 404,
        message: "not found".into(),
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    tracing::error!(%err, "environment variable error");
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "database error");
    Error {
        code: 2,
        message: "database error".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::error!(%err, "reqwest error");
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn serialization_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "serialization error");
    Error {
        code: 5,
        message: "serialization error".into(),
    }
}

pub fn authorizor_error(err: oso::OsoError) -> Error {
    tracing::error!(%err, "authorizor error");
    Error {
        code: 6,
        message: "authorizor error".into(),
    }
}

pub fn config_error(message: impl Into<String>) -> Error {
    Error {
        code: 7,
        message: message.into(),
    }
}

pub fn server_error<T: Display>(err: T) -> Error {
    tracing::error!(%err, "server error");
    Error {
        code: 8,
        message: "server error".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_codes_hide_message() {
        let response = database_error("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_codes_map_to_status() {
        assert_eq!(
            unauthorized_error().into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            not_found_error().into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            invalid_input_error().into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            invalid_state_error().into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn with_message_keeps_code() {
        let err = invalid_input_error().with_message("point index 4 out of range");
        assert!(err.is_invalid_input_error());
        assert_eq!(err.message, "point index 4 out of range");
    }
}
