use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::User;
use crate::entities::Account;
use crate::error::{unauthorized_error, Error};

/// Who is calling. Built once per request from the bearer token and passed
/// explicitly to every operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    Anonymous,
    Authenticated {
        token: String,
        account: Account,
        expires_at: Option<DateTime<Utc>>,
    },
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    sub: Option<Value>,
    #[serde(default)]
    user: Option<Account>,
}

impl Session {
    /// Init-on-load: an expired token is refused rather than carried along.
    pub fn from_token(token: &str, now: DateTime<Utc>) -> Result<Self, Error> {
        let claims = decode_claims(token)?;

        let expires_at = match claims.exp {
            Some(exp) => Some(
                Utc.timestamp_opt(exp, 0)
                    .single()
                    .ok_or_else(unauthorized_error)?,
            ),
            None => None,
        };

        if expires_at.map_or(false, |exp| exp < now) {
            return Err(unauthorized_error().with_message("session expired"));
        }

        let account = claims.user.unwrap_or_else(|| Account {
            id: claims.sub.as_ref().and_then(subject_id).unwrap_or(0),
            ..Account::default()
        });

        Ok(Self::Authenticated {
            token: token.to_string(),
            account,
            expires_at,
        })
    }

    /// Builds the session returned by a successful login, trusting the
    /// account the backend sent alongside the token.
    pub fn from_login(token: String, account: Account) -> Result<Self, Error> {
        let expires_at = decode_claims(&token)
            .ok()
            .and_then(|claims| claims.exp)
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single());

        Ok(Self::Authenticated {
            token,
            account,
            expires_at,
        })
    }

    pub fn bearer(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { token, .. } => Some(token.as_str()),
        }
    }

    pub fn account(&self) -> Option<&Account> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { account, .. } => Some(account),
        }
    }

    pub fn actor(&self) -> User {
        match self.account() {
            Some(account) => User::from_account(account),
            None => User::guest(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Anonymous => false,
            Self::Authenticated { expires_at, .. } => expires_at.map_or(false, |exp| exp < now),
        }
    }

    /// Clear-on-logout.
    pub fn clear(&mut self) {
        *self = Self::Anonymous;
    }
}

fn decode_claims(token: &str) -> Result<Claims, Error> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| unauthorized_error().with_message("malformed token"))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| unauthorized_error().with_message("malformed token"))?;

    serde_json::from_slice(&bytes).map_err(|_| unauthorized_error().with_message("malformed token"))
}

fn subject_id(sub: &Value) -> Option<i64> {
    match sub {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn token(claims: Value) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        )
    }

    #[test]
    fn decodes_user_claim() {
        let now = Utc::now();
        let exp = (now + Duration::hours(1)).timestamp();
        let raw = token(json!({
            "exp": exp,
            "user": {"id": 3, "name": "Admin", "email": "admin@example.com", "role": "admin"}
        }));

        let session = Session::from_token(&raw, now).unwrap();
        assert_eq!(session.bearer(), Some(raw.as_str()));
        assert!(session.account().unwrap().is_admin());
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(2)));
        assert_eq!(session.actor().id, 3);
    }

    #[test]
    fn falls_back_to_subject() {
        let raw = token(json!({ "sub": "42" }));
        let session = Session::from_token(&raw, Utc::now()).unwrap();

        let account = session.account().unwrap();
        assert_eq!(account.id, 42);
        assert!(!account.is_admin());
        assert!(session.actor().signed_in);
    }

    #[test]
    fn expired_token_is_refused() {
        let now = Utc::now();
        let raw = token(json!({ "exp": (now - Duration::minutes(1)).timestamp(), "sub": 1 }));

        let err = Session::from_token(&raw, now).unwrap_err();
        assert_eq!(err.code, 401);
    }

    #[test]
    fn garbage_is_refused() {
        assert!(Session::from_token("not-a-token", Utc::now()).is_err());
        assert!(Session::from_token("a.!!!.c", Utc::now()).is_err());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut session =
            Session::from_login(token(json!({ "sub": 1 })), Account::default()).unwrap();
        session.clear();

        assert!(session.bearer().is_none());
        assert!(!session.actor().signed_in);
    }
}
