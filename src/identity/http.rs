//! GoTrue-compatible HTTP identity client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use uuid::Uuid;

use super::{AuthUser, IdentityProvider, IdentityUser, Session};
use crate::config::AppConfig;
use crate::error::ApiError;

/// Identity client speaking the GoTrue REST dialect.
///
/// Admin endpoints authenticate with the service-role key; user-scoped
/// endpoints forward the caller's own bearer token.
#[derive(Debug, Clone)]
pub struct HttpIdentity {
    base_url: String,
    service_key: String,
    http: reqwest::Client,
}

impl HttpIdentity {
    /// Builds a client from the service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(Self {
            base_url: config.identity_url.trim_end_matches('/').to_string(),
            service_key: config.identity_service_key.clone(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn admin_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.endpoint(path))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

/// Password-grant and recovery-verify responses share this shape.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    refresh_token: String,
    user: IdentityUser,
}

impl TokenResponse {
    fn into_parts(self) -> (Session, IdentityUser) {
        (
            Session {
                access_token: self.access_token,
                token_type: self.token_type,
                expires_in: self.expires_in,
                expires_at: self.expires_at,
                refresh_token: self.refresh_token,
            },
            self.user,
        )
    }
}

fn invalid_token() -> ApiError {
    ApiError::Forbidden("Invalid or expired token".to_string())
}

/// GoTrue error bodies are not uniform across endpoints; probe the known
/// message keys in order.
fn extract_message(body: &serde_json::Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(serde_json::Value::as_str))
        .map(str::to_string)
}

async fn provider_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.json::<serde_json::Value>().await.ok();
    body.as_ref()
        .and_then(extract_message)
        .unwrap_or_else(|| format!("identity provider returned {status}"))
}

#[async_trait]
impl IdentityProvider for HttpIdentity {
    async fn verify_token(&self, token: &str) -> Result<AuthUser, ApiError> {
        let response = self
            .http
            .get(self.endpoint("/auth/v1/user"))
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|_| invalid_token())?;
        if !response.status().is_success() {
            return Err(invalid_token());
        }
        let user: IdentityUser = response.json().await.map_err(|_| invalid_token())?;
        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
        })
    }

    async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<IdentityUser, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "email_confirm": true,
            "user_metadata": { "name": name },
        });
        let response = self
            .admin_request(Method::POST, "/auth/v1/admin/users")
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::InvalidArgument(provider_message(response).await));
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    async fn admin_delete_user(&self, user_id: Uuid) -> Result<(), ApiError> {
        let response = self
            .admin_request(Method::DELETE, &format!("/auth/v1/admin/users/{user_id}"))
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::Internal(provider_message(response).await));
        }
        Ok(())
    }

    async fn admin_update_password(
        &self,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .admin_request(Method::PUT, &format!("/auth/v1/admin/users/{user_id}"))
            .json(&serde_json::json!({ "password": new_password }))
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::Internal(provider_message(response).await));
        }
        Ok(())
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Session, IdentityUser), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/token?grant_type=password"))
            .header("apikey", &self.service_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(token.into_parts())
    }

    async fn send_recovery(&self, email: &str, redirect_to: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/recover"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.service_key)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::Internal(provider_message(response).await));
        }
        Ok(())
    }

    async fn verify_recovery(&self, token: &str) -> Result<(Session, IdentityUser), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/verify"))
            .header("apikey", &self.service_key)
            .json(&serde_json::json!({ "type": "recovery", "token_hash": token }))
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::InvalidArgument(
                "Invalid or expired reset token".to_string(),
            ));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(token.into_parts())
    }

    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.endpoint("/auth/v1/user"))
            .header("apikey", &self.service_key)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "password": new_password }))
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::Internal(provider_message(response).await));
        }
        Ok(())
    }
}
