//! Thin wrappers over the backend REST endpoints.
//!
//! Every call returns `Result<_, ApiError>`; pages turn the error into banner
//! text with [`ApiError::user_message`].

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::AuthSession;
use crate::billing::PurchaseRequest;
use crate::config::config;
use crate::error::ApiError;
use crate::models::{
    Address, AddressExpense, CheckoutSession, CreatedAddress, Expense, ExpenseType, LoginResponse,
    NewAddress, NewAddressExpense, NewExpense, NewExpenseType, OcrResponse, Product,
};

const SKIP_WARNING_HEADER: &str = "ngrok-skip-browser-warning";

fn get(path: &str) -> RequestBuilder {
    Request::get(&config().endpoint(path)).header(SKIP_WARNING_HEADER, "true")
}

fn post(path: &str) -> RequestBuilder {
    Request::post(&config().endpoint(path)).header(SKIP_WARNING_HEADER, "true")
}

fn authorized(builder: RequestBuilder, session: &AuthSession) -> RequestBuilder {
    builder.header("Authorization", &session.bearer())
}

fn user_id(session: &AuthSession) -> Result<&str, ApiError> {
    session
        .user_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingSession)
}

/// Pulls a human readable message out of an error body.
pub fn backend_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => ["message", "responseMessage", "title"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(str::to_string),
        Ok(serde_json::Value::String(text)) if !text.trim().is_empty() => Some(text),
        Ok(_) => None,
        Err(_) if body.starts_with('<') => None,
        Err(_) => Some(body.to_string()),
    }
}

/// Part of an emailed confirmation link that follows `/api`.
pub fn confirmation_path(link: &str) -> Option<&str> {
    link.split_once("/api")
        .map(|(_, rest)| rest)
        .filter(|rest| !rest.is_empty())
}

async fn status_error(resp: Response) -> ApiError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    log::warn!("{} answered {}", resp.url(), status);
    ApiError::Status {
        status,
        message: backend_message(&body),
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    if !resp.ok() {
        return Err(status_error(resp).await);
    }
    resp.json::<T>().await.map_err(|err| {
        log::error!("could not decode {}: {}", resp.url(), err);
        ApiError::from(err)
    })
}

async fn expect_ok(resp: Response) -> Result<(), ApiError> {
    if resp.ok() {
        Ok(())
    } else {
        Err(status_error(resp).await)
    }
}

async fn send_json<B: Serialize>(builder: RequestBuilder, body: &B) -> Result<Response, ApiError> {
    Ok(builder.json(body)?.send().await?)
}

pub async fn login(email: &str, password: &str) -> Result<AuthSession, ApiError> {
    let body = serde_json::json!({ "email": email, "password": password });
    let resp = send_json(post("/Auth/login"), &body).await?;
    let response: LoginResponse = read_json(resp).await?;
    if !response.is_successfull {
        log::info!("login rejected for {}", email);
        return Err(ApiError::Rejected(response.response_message));
    }
    AuthSession::from_login(&response).ok_or(ApiError::Rejected(response.response_message))
}

/// Registers an account. A backend that answers with a token signs the user
/// straight in.
pub async fn register(
    email: &str,
    password: &str,
    user_name: &str,
) -> Result<Option<AuthSession>, ApiError> {
    let body = serde_json::json!({
        "email": email,
        "password": password,
        "userName": user_name,
    });
    let resp = send_json(post("/Auth/register"), &body).await?;
    let response: LoginResponse = read_json(resp).await?;
    Ok(AuthSession::from_login(&response))
}

pub async fn request_password_reset(email: &str) -> Result<(), ApiError> {
    let body = serde_json::json!({ "email": email });
    expect_ok(send_json(post("/Auth/forgot-password"), &body).await?).await
}

pub async fn reset_password(
    email: &str,
    token: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), ApiError> {
    let body = serde_json::json!({
        "email": email,
        "token": token,
        "password": password,
        "password_confirmation": confirmation,
    });
    expect_ok(send_json(post("/Auth/reset-password"), &body).await?).await
}

pub async fn confirm_email(link: &str) -> Result<(), ApiError> {
    let path = confirmation_path(link)
        .ok_or_else(|| ApiError::Rejected(Some("Invalid confirmation link.".to_string())))?;
    expect_ok(get(path).send().await?).await
}

pub async fn fetch_expenses(session: &AuthSession) -> Result<Vec<Expense>, ApiError> {
    let path = format!("/user-expenses/{}", user_id(session)?);
    let resp = authorized(get(&path), session).send().await?;
    read_json(resp).await
}

pub async fn create_expense(session: &AuthSession, expense: &NewExpense) -> Result<(), ApiError> {
    let builder = authorized(post("/user-expenses/Create-User-Expense"), session);
    expect_ok(send_json(builder, expense).await?).await
}

pub async fn fetch_expense_types(session: &AuthSession) -> Result<Vec<ExpenseType>, ApiError> {
    let builder = authorized(get("/ExpenseTypes/Get-All-Expense-Types"), session)
        .query([("activeOnly", "true")]);
    read_json(builder.send().await?).await
}

pub async fn add_expense_type(
    session: &AuthSession,
    expense_type: &NewExpenseType,
) -> Result<(), ApiError> {
    let builder = authorized(post("/ExpenseTypes/Add-Expense-Type"), session);
    expect_ok(send_json(builder, expense_type).await?).await
}

/// Uploads a bill for OCR. The browser sets the multipart boundary itself.
pub async fn analyze_bill(
    session: &AuthSession,
    file: &web_sys::File,
) -> Result<OcrResponse, ApiError> {
    let form = web_sys::FormData::new()
        .map_err(|err| ApiError::Network(format!("{:?}", err)))?;
    form.append_with_blob("file", file)
        .map_err(|err| ApiError::Network(format!("{:?}", err)))?;

    let builder = authorized(post("/Bill/analyze-Bill-Electricity"), session);
    let resp = builder.body(form)?.send().await?;
    read_json(resp).await
}

/// Raw analysis body. A JSON string body is unwrapped to its text.
pub async fn fetch_analysis(session: &AuthSession) -> Result<String, ApiError> {
    let id = user_id(session)?;
    let builder =
        authorized(get("/user-expenses/Get-AI-Response"), session).query([("userId", id)]);
    let resp = builder.send().await?;
    if !resp.ok() {
        return Err(status_error(resp).await);
    }
    let body = resp.text().await?;
    Ok(match serde_json::from_str::<String>(&body) {
        Ok(text) => text,
        Err(_) => body,
    })
}

pub async fn fetch_products(session: &AuthSession) -> Result<Vec<Product>, ApiError> {
    let resp = authorized(get("/Stripe/get-all-products"), session)
        .send()
        .await?;
    read_json(resp).await
}

pub async fn purchase_plan(
    session: &AuthSession,
    request: &PurchaseRequest,
) -> Result<CheckoutSession, ApiError> {
    let builder = authorized(post("/Stripe/purchase-plan"), session);
    read_json(send_json(builder, request).await?).await
}

pub async fn fetch_addresses(session: &AuthSession) -> Result<Vec<Address>, ApiError> {
    let resp = authorized(get("/Address/GetAddressesByCurrunt"), session)
        .send()
        .await?;
    read_json(resp).await
}

pub async fn add_address(
    session: &AuthSession,
    address: &NewAddress,
) -> Result<CreatedAddress, ApiError> {
    let builder = authorized(post("/Address/AddAddress"), session);
    read_json(send_json(builder, address).await?).await
}

pub async fn fetch_address_expenses(
    session: &AuthSession,
) -> Result<Vec<AddressExpense>, ApiError> {
    let resp = authorized(get("/AddressExpense/GetExpenseWithAddress"), session)
        .send()
        .await?;
    read_json(resp).await
}

pub async fn add_address_expense(
    session: &AuthSession,
    expense: &NewAddressExpense,
) -> Result<(), ApiError> {
    let builder = authorized(post("/AddressExpense/AddExpenseWithAddress"), session);
    expect_ok(send_json(builder, expense).await?).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_reads_common_keys() {
        assert_eq!(
            backend_message(r#"{"message": "Email already taken"}"#).as_deref(),
            Some("Email already taken")
        );
        assert_eq!(
            backend_message(r#"{"isSuccessfull": false, "responseMessage": "Locked"}"#).as_deref(),
            Some("Locked")
        );
        assert_eq!(
            backend_message(r#"{"message": " ", "title": "Bad Request"}"#).as_deref(),
            Some("Bad Request")
        );
    }

    #[test]
    fn backend_message_handles_plain_bodies() {
        assert_eq!(backend_message("\"quota\"").as_deref(), Some("quota"));
        assert_eq!(backend_message("User not found").as_deref(), Some("User not found"));
        assert_eq!(backend_message("<html>502</html>"), None);
        assert_eq!(backend_message("   "), None);
        assert_eq!(backend_message("[1, 2]"), None);
    }

    #[test]
    fn confirmation_link_keeps_path_after_api() {
        assert_eq!(
            confirmation_path("https://old.host/api/Auth/confirm-email?userId=1&code=x"),
            Some("/Auth/confirm-email?userId=1&code=x")
        );
        assert_eq!(confirmation_path("https://old.host/api"), None);
        assert_eq!(confirmation_path("https://old.host/confirm"), None);
    }
}
