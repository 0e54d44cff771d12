// API client module: a small blocking HTTP client that talks to the
// QuickDesk backend. Every call is synchronous and returns the response
// as-is; status codes are never turned into errors here.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// Base URL used when `QUICKDESK_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Simple API client that holds a reqwest blocking client and the base URL
/// of the QuickDesk backend. Tokens are passed per call because the run
/// switches between the admin and the normal user.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Registration payload for `POST /auth/register`.
#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload for `POST /auth/login`.
#[derive(Serialize, Debug, Clone)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug)]
pub struct RoleChange {
    pub role: String,
}

/// Body of `PUT /auth/approve-upgrade/{id}`. The backend accepts
/// `approved` or `rejected`.
#[derive(Serialize, Debug)]
pub struct UpgradeDecision {
    pub status: String,
}

#[derive(Serialize, Debug)]
pub struct NewQuestion {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct Vote {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Debug)]
pub struct NewAnswer {
    pub text: String,
}

#[derive(Serialize, Debug)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

/// A fully read response: status plus the raw body text. The body is kept
/// as text so that non-JSON replies can still be shown.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub text: String,
}

impl ApiClient {
    /// Create an ApiClient for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client, base_url })
    }

    /// Create an ApiClient configured from the environment variable
    /// `QUICKDESK_API_URL` or fallback to `http://localhost:5000`.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("QUICKDESK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the Authorization header map when a token is given.
    fn auth_headers(token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(t) = token {
            let val = format!("Bearer {}", t);
            let val = HeaderValue::from_str(&val).context("Token is not a valid header value")?;
            headers.insert(AUTHORIZATION, val);
        }
        Ok(headers)
    }

    /// Send one request to `base_url + path` and read the whole body.
    ///
    /// Only transport failures are errors; 4xx and 5xx come back as a
    /// normal `ApiResponse`.
    pub fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", &self.base_url, path);
        let mut req = self
            .client
            .request(method.clone(), &url)
            .headers(Self::auth_headers(token)?);
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req
            .send()
            .with_context(|| format!("Failed to send {} {}", method, path))?;
        let status = res.status();
        let text = res
            .text()
            .with_context(|| format!("Failed to read response body of {} {}", method, path))?;
        Ok(ApiResponse { status, text })
    }
}

impl ApiResponse {
    /// Reason phrase for the status code, empty when the code is unknown.
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Parsed body, or `None` if the body is not valid JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.text).ok()
    }

    /// Top-level `token` field (login responses).
    pub fn token(&self) -> Option<String> {
        self.json().as_ref().and_then(|v| v.get("token")).and_then(id_string)
    }

    /// `<key>._id`, e.g. `user._id` or `question._id`.
    pub fn nested_id(&self, key: &str) -> Option<String> {
        self.json()
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.get("_id"))
            .and_then(id_string)
    }

    /// `<key>[0]._id`, e.g. the first pending upgrade request.
    pub fn first_id_in(&self, key: &str) -> Option<String> {
        self.json()
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("_id"))
            .and_then(id_string)
    }
}

// Mongo ids arrive as strings; numbers are accepted too.
fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, text: &str) -> ApiResponse {
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            text: text.to_string(),
        }
    }

    #[test]
    fn login_fields_are_extracted() {
        let r = response(200, r#"{"token": "t1", "user": {"_id": "u1", "name": "Admin"}}"#);
        assert_eq!(r.token().as_deref(), Some("t1"));
        assert_eq!(r.nested_id("user").as_deref(), Some("u1"));
    }

    #[test]
    fn non_json_body_yields_nothing() {
        let r = response(404, "Not Found");
        assert!(r.json().is_none());
        assert!(r.token().is_none());
        assert!(r.nested_id("user").is_none());
        assert_eq!(r.reason(), "Not Found");
    }

    #[test]
    fn first_id_handles_empty_and_malformed_lists() {
        assert!(response(200, r#"{"requests": []}"#).first_id_in("requests").is_none());
        assert!(response(200, r#"{"requests": [{"user": "x"}]}"#)
            .first_id_in("requests")
            .is_none());
        assert!(response(200, r#"{"requests": "nope"}"#).first_id_in("requests").is_none());
        assert_eq!(
            response(200, r#"{"requests": [{"_id": "r1"}, {"_id": "r2"}]}"#)
                .first_id_in("requests")
                .as_deref(),
            Some("r1")
        );
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let r = response(201, r#"{"question": {"_id": 42}}"#);
        assert_eq!(r.nested_id("question").as_deref(), Some("42"));
    }

    #[test]
    fn unknown_status_has_empty_reason() {
        assert_eq!(response(599, "").reason(), "");
    }

    #[test]
    fn vote_serializes_type_field() {
        let v = serde_json::to_value(Vote { kind: "up".into() }).unwrap();
        assert_eq!(v, serde_json::json!({"type": "up"}));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
    }
}
