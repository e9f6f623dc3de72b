//! Client for the tour-booking REST backend.
//!
//! Every collection lives at `{base}/api/{collection}` and wraps its
//! payloads in a `{"data": ...}` envelope. Updates are form-method-spoofed
//! POSTs (`_method=PUT`), which is what the backend routes expect.

use std::fmt;
use std::time::Duration;

use reqwest::{multipart, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    auth::Session,
    entities::{Account, PaymentToken, PaymentTokenRequest, Resource},
    error::{
        invalid_input_error, not_found_error, unauthorized_error, upstream_error, Error,
    },
};

#[derive(Clone, Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Clone, Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: Account,
}

/// An uploaded image on its way to the backend's storage.
#[derive(Clone, Debug)]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl Client {
    /// `timeout` bounds every request, including the saves made while a
    /// draft row is locked.
    pub fn new(base: &str, timeout: Duration) -> Result<Self, Error> {
        // join() replaces the last segment unless the base ends in a slash
        let base = match base.ends_with('/') {
            true => base.to_string(),
            false => format!("{}/", base),
        };
        let base = base
            .parse::<Url>()
            .map_err(|_| invalid_input_error().with_message(format!("{} is not a valid url", base)))?;

        let inner = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner,
            base,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base
            .join(&format!("api/{}", path))
            .map_err(|_| invalid_input_error())
    }

    fn authorized(builder: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    #[tracing::instrument(skip(self, session), fields(collection = T::COLLECTION))]
    pub async fn list<T: Resource>(&self, session: &Session) -> Result<Vec<T>, Error> {
        let req = self.inner.get(self.url(T::COLLECTION)?);
        let res = Self::authorized(req, session).send().await?;

        let Envelope { data } = read(res).await?;
        Ok(data)
    }

    #[tracing::instrument(skip(self, session), fields(collection = T::COLLECTION))]
    pub async fn show<T: Resource>(&self, session: &Session, id: i64) -> Result<T, Error> {
        let req = self.inner.get(self.url(&format!("{}/{}", T::COLLECTION, id))?);
        let res = Self::authorized(req, session).send().await?;

        let Envelope { data } = read(res).await?;
        Ok(data)
    }

    #[tracing::instrument(skip(self, session, form), fields(collection = T::COLLECTION))]
    pub async fn create<T: Resource>(&self, session: &Session, form: &T::Form) -> Result<T, Error> {
        let req = self.inner.post(self.url(T::COLLECTION)?).json(form);
        let res = Self::authorized(req, session).send().await?;

        let Envelope { data } = read(res).await?;
        Ok(data)
    }

    #[tracing::instrument(skip(self, session, form), fields(collection = T::COLLECTION))]
    pub async fn update<T: Resource>(
        &self,
        session: &Session,
        id: i64,
        form: &T::Form,
    ) -> Result<T, Error> {
        let body = method_spoofed(serde_json::to_value(form)?, "PUT");

        let req = self
            .inner
            .post(self.url(&format!("{}/{}", T::COLLECTION, id))?)
            .json(&body);
        let res = Self::authorized(req, session).send().await?;

        let Envelope { data } = read(res).await?;
        Ok(data)
    }

    /// Partial update of a single field, e.g. a registration's status.
    #[tracing::instrument(skip(self, session), fields(collection = T::COLLECTION))]
    pub async fn patch_field<T: Resource>(
        &self,
        session: &Session,
        id: i64,
        field: &str,
        value: &str,
    ) -> Result<T, Error> {
        let form = multipart::Form::new()
            .text("_method", "PUT")
            .text(field.to_string(), value.to_string());

        let req = self
            .inner
            .post(self.url(&format!("{}/{}", T::COLLECTION, id))?)
            .multipart(form);
        let res = Self::authorized(req, session).send().await?;

        let Envelope { data } = read(res).await?;
        Ok(data)
    }

    #[tracing::instrument(skip(self, session), fields(collection = T::COLLECTION))]
    pub async fn delete<T: Resource>(&self, session: &Session, id: i64) -> Result<(), Error> {
        let req = self
            .inner
            .delete(self.url(&format!("{}/{}", T::COLLECTION, id))?);
        let res = Self::authorized(req, session).send().await?;

        check(res).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, session, photo), fields(collection = T::COLLECTION))]
    pub async fn upload_photo<T: Resource>(
        &self,
        session: &Session,
        id: i64,
        field: &str,
        photo: Photo,
    ) -> Result<T, Error> {
        let part = multipart::Part::bytes(photo.bytes)
            .file_name(photo.file_name)
            .mime_str(&photo.content_type)
            .map_err(|_| invalid_input_error().with_message("unsupported content type"))?;

        let form = multipart::Form::new()
            .text("_method", "PUT")
            .part(field.to_string(), part);

        let req = self
            .inner
            .post(self.url(&format!("{}/{}", T::COLLECTION, id))?)
            .multipart(form);
        let res = Self::authorized(req, session).send().await?;

        let Envelope { data } = read(res).await?;
        Ok(data)
    }

    #[tracing::instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginData, Error> {
        let res = self
            .inner
            .post(self.url("login")?)
            .json(credentials)
            .send()
            .await?;

        let Envelope { data } = read(res).await?;
        Ok(data)
    }

    #[tracing::instrument(skip_all)]
    pub async fn logout(&self, session: &Session) -> Result<(), Error> {
        let token = session.bearer().ok_or_else(unauthorized_error)?;

        let req = self
            .inner
            .post(self.url("logout")?)
            .json(&serde_json::json!({ "token": token }));
        let res = Self::authorized(req, session).send().await?;

        check(res).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, session))]
    pub async fn create_payment_token(
        &self,
        session: &Session,
        request: &PaymentTokenRequest,
    ) -> Result<PaymentToken, Error> {
        let req = self.inner.post(self.url("create-snap-token")?).json(request);
        let res = Self::authorized(req, session).send().await?;

        read(res).await
    }
}

fn method_spoofed(mut body: Value, method: &str) -> Value {
    if let Value::Object(map) = &mut body {
        map.insert("_method".into(), Value::String(method.into()));
    }
    body
}

fn status_error(status: StatusCode) -> Option<Error> {
    match status.as_u16() {
        200..=299 => None,
        401 | 403 => Some(unauthorized_error()),
        404 => Some(not_found_error()),
        400..=499 => Some(invalid_input_error()),
        _ => Some(upstream_error()),
    }
}

async fn check(res: Response) -> Result<Response, Error> {
    let status = res.status();

    let err = match status_error(status) {
        None => return Ok(res),
        Some(err) => err,
    };

    tracing::warn!(%status, "backend rejected request");

    if status.is_client_error() {
        if let Ok(ErrorBody {
            message: Some(message),
        }) = res.json::<ErrorBody>().await
        {
            return Err(err.with_message(message));
        }
    }

    Err(err)
}

async fn read<T: DeserializeOwned>(res: Response) -> Result<T, Error> {
    let res = check(res).await?;
    let body = res.bytes().await?;

    serde_json::from_slice(&body).map_err(|err| {
        tracing::warn!(%err, "unexpected backend payload");
        upstream_error()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn urls_keep_base_path() {
        let client = Client::new("https://example.com/backend", TIMEOUT).unwrap();
        assert_eq!(
            client.url("routes/4").unwrap().as_str(),
            "https://example.com/backend/api/routes/4"
        );

        let client = Client::new("http://127.0.0.1:8000/", TIMEOUT).unwrap();
        assert_eq!(
            client.url("programs").unwrap().as_str(),
            "http://127.0.0.1:8000/api/programs"
        );
    }

    #[test]
    fn requests_are_bounded() {
        let client = Client::new("http://127.0.0.1:8000", Duration::from_secs(12)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            email: "admin@example.com".into(),
            password: "hunter2-secret".into(),
        };

        assert!(!format!("{:?}", credentials).contains("hunter2-secret"));
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(Client::new("not a url", TIMEOUT).is_err());
    }

    #[test]
    fn statuses_map_to_errors() {
        assert!(status_error(StatusCode::OK).is_none());
        assert!(status_error(StatusCode::CREATED).is_none());
        assert_eq!(status_error(StatusCode::UNAUTHORIZED).unwrap().code, 401);
        assert_eq!(status_error(StatusCode::FORBIDDEN).unwrap().code, 401);
        assert_eq!(status_error(StatusCode::NOT_FOUND).unwrap().code, 404);
        assert_eq!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY).unwrap().code,
            101
        );
        assert_eq!(status_error(StatusCode::BAD_GATEWAY).unwrap().code, 4);
    }

    #[test]
    fn updates_spoof_put() {
        let body = method_spoofed(json!({"price": 150000.0}), "PUT");
        assert_eq!(body, json!({"price": 150000.0, "_method": "PUT"}));
    }
}
