//! User and authentication models.
//!
//! The backend has renamed its customer fields over time. `User` is the one
//! client-side shape; old names are accepted at deserialization.

use serde::{Deserialize, Serialize};

/// A role, sent either as a bare name or as a `{roleID, roleName}` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum Role {
    Name(String),
    Record {
        #[serde(rename = "roleID", default)]
        id: Option<i64>,
        #[serde(rename = "roleName")]
        name: String,
    },
}

impl Role {
    pub fn name(&self) -> &str {
        match self {
            Role::Name(name) => name,
            Role::Record { name, .. } => name,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.name().eq_ignore_ascii_case("admin")
    }

    pub fn is_tour_guide(&self) -> bool {
        matches!(self.name(), "Tour Guide" | "TOUR_GUIDE")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct User {
    #[serde(rename = "userID", alias = "idKhachHang", default)]
    pub id: Option<i64>,
    #[serde(alias = "tenKhachHang", default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
    #[serde(alias = "tuoi", default)]
    pub age: Option<u32>,
    #[serde(alias = "queQuan", default)]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "dateCreated", default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().map(Role::is_admin).unwrap_or(false)
    }

    pub fn is_tour_guide(&self) -> bool {
        self.role.as_ref().map(Role::is_tour_guide).unwrap_or(false)
    }

    pub fn display_name(&self) -> &str {
        self.fullname
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("guest")
    }
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct RegisterRequest {
    pub fullname: String,
    pub age: Option<u32>,
    pub address: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct OtpVerifyRequest {
    pub email: String,
    #[serde(rename = "otpCode")]
    pub otp_code: String,
}

/// The `{success, message, ...}` envelope used by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<T>,
    /// Present on a successful login.
    #[serde(default)]
    pub user: Option<User>,
}

impl<T> ApiResponse<T> {
    /// A missing `success` flag counts as success; the status code already
    /// told us the request was accepted.
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }
}
