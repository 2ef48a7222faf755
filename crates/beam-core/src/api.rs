//! Back-office HTTP client: authentication and archive upload.
//!
//! The authentication contract is a single token-based status check; the
//! API key travels in the `X-Api-Token` header on every request. There is
//! no retry and no token refresh. Upload errors can arrive as a single
//! code or an array of codes even on a 2xx response; both shapes are
//! normalized to a list at the deserialization boundary so nothing
//! downstream branches on the payload type.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default back-office API base URL.
pub const DEFAULT_API_URL: &str = "https://api.backoffice.example.com/api";

/// Error codes the back office returns on upload, mapped to readable
/// messages. Unmapped codes are surfaced raw.
const UPLOAD_ERRORS: &[(&str, &str)] = &[
    (
        "version_already_exists",
        "The current version of your app already exists",
    ),
    ("missing_field_file", "There is a missing field"),
    (
        "app_belongs_to_other_user",
        "You are not the owner of this app",
    ),
];

/// Map a backend error code to its human-readable form, falling through to
/// the raw code when unmapped.
pub fn describe_upload_error(code: &str) -> String {
    UPLOAD_ERRORS
        .iter()
        .find(|(key, _)| *key == code)
        .map_or_else(|| code.to_string(), |(_, msg)| (*msg).to_string())
}

/// Authentication or upload failure. All variants are fatal.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The credential was rejected or the back office was unreachable.
    /// Deliberately generic: bad key, network failure, and unexpected
    /// payloads all look the same to the user.
    #[error("incorrect API key or not logged in to the dashboard")]
    Unauthorized,

    /// A nominally successful login carried no security context.
    #[error("unexpected authentication error")]
    UnexpectedAuth,

    /// Transport-level failure during upload.
    #[error("upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The archive could not be read for upload.
    #[error("could not read archive: {0}")]
    Io(#[from] std::io::Error),

    /// The back office rejected the upload with one or more error codes
    /// (already mapped to readable messages).
    #[error("upload rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),
}

/// The authenticated session user extracted from the login response.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Account type, selects the upload route (e.g. `developer`).
    #[serde(rename = "type")]
    pub user_type: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(rename = "securityContext", default)]
    security_context: Vec<User>,
}

/// The `error` field of an upload response: the backend sometimes returns
/// a single code, sometimes an array. Normalized via [`ErrorField::into_vec`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    One(String),
    Many(Vec<String>),
}

impl ErrorField {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(code) => vec![code],
            Self::Many(codes) => codes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    error: Option<ErrorField>,
}

/// HTTP client for the app-store back office.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Create a client for the given API base URL and credential.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Authenticate with a single status check and return the session user.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] on any transport or status failure;
    /// [`ApiError::UnexpectedAuth`] when a successful response carries an
    /// empty security context.
    pub async fn login(&self) -> Result<User, ApiError> {
        let url = format!("{}/authentication/login-status", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("X-Api-Token", &self.api_key)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .send()
            .await
            .map_err(|_| ApiError::Unauthorized)?
            .error_for_status()
            .map_err(|_| ApiError::Unauthorized)?;

        let mut login: LoginResponse = response.json().await.map_err(|_| ApiError::Unauthorized)?;

        // The session user is the last entry of the security context.
        login.security_context.pop().ok_or(ApiError::UnexpectedAuth)
    }

    /// Submit a packed release archive for the given app.
    ///
    /// Multipart fields: `id` (app identifier), `version`, and `upload`
    /// (the archive). The archive is size-guarded to under 10 MB before
    /// this call, so it is read fully into memory.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] carrying every mapped error message when the
    /// response body names errors; transport and IO failures otherwise.
    pub async fn upload(
        &self,
        user: &User,
        identifier: &str,
        version: &str,
        archive: &Path,
    ) -> Result<(), ApiError> {
        let url = format!("{}/{}/app-store/upload", self.base_url, user.user_type);

        let filename = archive
            .file_name()
            .map_or_else(|| "upload.tgz".to_string(), |n| n.to_string_lossy().into_owned());
        let bytes = tokio::fs::read(archive).await?;

        let form = reqwest::multipart::Form::new()
            .text("id", identifier.to_string())
            .text("version", version.to_string())
            .part(
                "upload",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(filename)
                    .mime_str("application/gzip")?,
            );

        let response = self
            .http
            .post(&url)
            .header("X-Api-Token", &self.api_key)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        // Errors also come back on a 200, so the body decides.
        let body: UploadResponse = response.json().await?;
        match body.error {
            None => Ok(()),
            Some(field) => {
                let messages: Vec<String> = field
                    .into_vec()
                    .iter()
                    .map(String::as_str)
                    .map(describe_upload_error)
                    .collect();
                Err(ApiError::Rejected(messages))
            }
        }
    }
}
