// ABOUTME: Account type definitions
// ABOUTME: Donor and receiver records, sign-up inputs and session roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::password::MIN_PASSWORD_LENGTH;

/// Which kind of account a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Receiver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Receiver => "receiver",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DonorType {
    #[default]
    Individual,
    Ngo,
    Corporate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReceiverType {
    #[default]
    Ngo,
    School,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub number: String,
    pub address: String,
    #[serde(rename = "type")]
    pub donor_type: DonorType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receiver {
    pub id: String,
    pub name: String,
    pub email: String,
    pub number: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub receiver_type: ReceiverType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DonorSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub number: String,
    pub address: String,
    #[serde(default, rename = "type")]
    pub donor_type: DonorType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiverSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub number: Option<String>,
    pub address: Option<String>,
    #[serde(default, rename = "type")]
    pub receiver_type: ReceiverType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Lowercase and trim an email, rejecting obviously malformed ones.
pub(crate) fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AuthError::Validation("A valid email is required".to_string()));
    }
    Ok(email)
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) fn check_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

impl DonorSignup {
    pub(crate) fn validate(&self) -> Result<String, AuthError> {
        require("Name", &self.name)?;
        require("Number", &self.number)?;
        require("Address", &self.address)?;
        check_password(&self.password)?;
        normalize_email(&self.email)
    }
}

impl ReceiverSignup {
    pub(crate) fn validate(&self) -> Result<String, AuthError> {
        require("Name", &self.name)?;
        check_password(&self.password)?;
        normalize_email(&self.email)
    }
}
