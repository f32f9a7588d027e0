//! User and authentication endpoints.
//!
//! These calls only talk to the backend; keeping the logged-in user is the
//! job of `auth::Session`.

use serde_json::json;

use super::client::ApiClient;
use super::error::{ApiError, Result};
use crate::models::{ApiResponse, LoginRequest, OtpVerifyRequest, RegisterRequest, User};

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> Result<ApiResponse> {
        self.post("users/register", request).await
    }

    pub async fn verify_otp(&self, request: &OtpVerifyRequest) -> Result<ApiResponse> {
        self.post("users/verify-otp", request).await
    }

    pub async fn resend_otp(&self, email: &str) -> Result<ApiResponse> {
        self.post("users/resend-otp", &json!({ "email": email })).await
    }

    /// Log in and return the authenticated user.
    pub async fn login(&self, request: &LoginRequest) -> Result<User> {
        let response: ApiResponse = self.post("users/login", request).await?;
        if !response.is_success() {
            return Err(ApiError::AccessDenied(response.message));
        }
        response.user.ok_or_else(|| {
            ApiError::InvalidResponse("Login response did not include a user".to_string())
        })
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        self.get("users").await
    }

    pub async fn fetch_user(&self, user_id: i64) -> Result<User> {
        self.get(&format!("users/{}", user_id)).await
    }

    pub async fn update_user(&self, user_id: i64, user: &User) -> Result<ApiResponse> {
        self.put(&format!("users/{}", user_id), user).await
    }
}
