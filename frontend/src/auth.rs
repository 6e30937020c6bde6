//! Bearer-token session, decoded role claims and their local storage mirror.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use yew::functional::UseStateHandle;

use crate::models::LoginResponse;
use crate::storage;

pub const SESSION_KEY: &str = "utilitrack-auth";

/// Shared through a `ContextProvider`; `None` means signed out.
pub type AuthContext = UseStateHandle<Option<AuthSession>>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token is not a three part JWT")]
    MalformedToken,
    #[error("token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token payload is not valid claims JSON: {0}")]
    Claims(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum RoleClaim {
    One(String),
    Many(Vec<String>),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "StripeCustomerId", default)]
    pub stripe_customer_id: Option<String>,
    #[serde(
        rename = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
        default
    )]
    roles: Option<RoleClaim>,
    #[serde(
        rename = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier",
        default
    )]
    pub name_identifier: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn roles(&self) -> Vec<String> {
        match &self.roles {
            Some(RoleClaim::One(role)) => vec![role.clone()],
            Some(RoleClaim::Many(roles)) => roles.clone(),
            None => Vec::new(),
        }
    }
}

/// Reads the payload segment of a JWT. The signature is not checked; the
/// backend does that on every request.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(AuthError::MalformedToken),
    };
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl AuthSession {
    /// Builds a session from a token. A token whose claims cannot be read
    /// still signs the user in, only without roles or billing id.
    pub fn from_token(token: String, user_id: Option<String>) -> Self {
        let claims = match decode_claims(&token) {
            Ok(claims) => claims,
            Err(err) => {
                log::error!("could not decode token claims: {}", err);
                TokenClaims::default()
            }
        };

        let user_id = user_id
            .filter(|id| !id.is_empty())
            .or_else(|| claims.name_identifier.clone())
            .or_else(|| claims.sub.clone());

        Self {
            roles: claims.roles(),
            stripe_customer_id: claims.stripe_customer_id,
            expires_at: claims.exp,
            token,
            user_id,
            user_name: None,
            email: None,
        }
    }

    /// `None` when the backend did not hand out a token.
    pub fn from_login(response: &LoginResponse) -> Option<Self> {
        let token = response.token.clone().filter(|t| !t.is_empty())?;
        let mut session = Self::from_token(token, response.id.clone());
        session.user_name = response.user_name.clone();
        session.email = response.email.clone();
        Some(session)
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    pub fn primary_role(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_company(&self) -> bool {
        self.has_role("Company")
    }

    pub fn can_manage_expense_types(&self) -> bool {
        matches!(self.primary_role(), Some("Premium") | Some("Company"))
    }

    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Account")
    }
}

/// Restores the stored session. Expired tokens are dropped on the way in.
pub fn load_session() -> Option<AuthSession> {
    let session = storage::load::<AuthSession>(SESSION_KEY)?;
    if session.token.is_empty() || session.is_expired(chrono::Utc::now().timestamp()) {
        log::info!("stored session expired, signing out");
        storage::remove(SESSION_KEY);
        return None;
    }
    Some(session)
}

/// Updates both the context and local storage.
pub fn save_session(context: &AuthContext, session: Option<AuthSession>) {
    match &session {
        Some(session) => storage::save(SESSION_KEY, session),
        None => storage::remove(SESSION_KEY),
    }
    context.set(session);
}

pub fn logout(context: &AuthContext) {
    log::info!("signing out");
    save_session(context, None);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

    pub(crate) fn token_with(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn decodes_single_role_and_customer() {
        let token = token_with(&serde_json::json!({
            "StripeCustomerId": "cus_42",
            ROLE_CLAIM: "Premium",
            "sub": "user-1",
            "exp": 1_900_000_000i64
        }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.stripe_customer_id.as_deref(), Some("cus_42"));
        assert_eq!(claims.roles(), vec!["Premium"]);
        assert_eq!(claims.exp, Some(1_900_000_000));
    }

    #[test]
    fn decodes_role_arrays() {
        let token = token_with(&serde_json::json!({ ROLE_CLAIM: ["Company", "Premium"] }));
        let session = AuthSession::from_token(token, Some("u7".into()));
        assert_eq!(session.roles, vec!["Company", "Premium"]);
        assert_eq!(session.primary_role(), Some("Company"));
        assert!(session.is_company());
        assert!(session.can_manage_expense_types());
        assert_eq!(session.user_id.as_deref(), Some("u7"));
    }

    #[test]
    fn malformed_tokens_keep_an_empty_role_list() {
        assert!(matches!(decode_claims("abc"), Err(AuthError::MalformedToken)));
        assert!(decode_claims("a.!!!.c").is_err());
        let session = AuthSession::from_token("a.b.c".into(), None);
        assert!(session.roles.is_empty());
        assert!(session.user_id.is_none());
        assert!(!session.can_manage_expense_types());
    }

    #[test]
    fn user_id_falls_back_to_claims() {
        let token = token_with(&serde_json::json!({
            "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier": "nid-1",
            "sub": "sub-1"
        }));
        let session = AuthSession::from_token(token, Some(String::new()));
        assert_eq!(session.user_id.as_deref(), Some("nid-1"));
    }

    #[test]
    fn login_without_token_has_no_session() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"isSuccessfull": true, "id": "u1"}"#).unwrap();
        assert!(AuthSession::from_login(&response).is_none());

        let token = token_with(&serde_json::json!({ ROLE_CLAIM: "Free" }));
        let response = LoginResponse {
            is_successfull: true,
            response_message: None,
            token: Some(token),
            id: Some("u1".into()),
            user_name: Some("ana".into()),
            email: None,
        };
        let session = AuthSession::from_login(&response).unwrap();
        assert_eq!(session.display_name(), "ana");
        assert!(session.bearer().starts_with("Bearer "));
        assert!(!session.can_manage_expense_types());
    }

    #[test]
    fn expiry_is_inclusive() {
        let mut session = AuthSession::from_token("a.b.c".into(), None);
        assert!(!session.is_expired(100));
        session.expires_at = Some(100);
        assert!(session.is_expired(100));
        assert!(!session.is_expired(99));
    }

    #[test]
    fn session_round_trips_through_storage_json() {
        let token = token_with(&serde_json::json!({ ROLE_CLAIM: "Company" }));
        let session = AuthSession::from_token(token, Some("u1".into()));
        let raw = serde_json::to_string(&session).unwrap();
        let restored: AuthSession = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored, session);
    }
}
