//! Company (tenant) type.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A tenant. Every other entity is scoped to exactly one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,

    /// Unique across all companies.
    pub domain: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,

    pub subscription_plan: String,
    pub billing_cycle: String,
    pub max_employees: i32,
    pub max_storage_gb: i32,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Input for registering a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default = "default_subscription_plan")]
    pub subscription_plan: String,
    #[serde(default = "default_billing_cycle")]
    pub billing_cycle: String,
    #[serde(default = "default_max_employees")]
    pub max_employees: i32,
    #[serde(default = "default_max_storage_gb")]
    pub max_storage_gb: i32,
}

fn default_subscription_plan() -> String {
    "free".to_string()
}

fn default_billing_cycle() -> String {
    "monthly".to_string()
}

fn default_max_employees() -> i32 {
    25
}

fn default_max_storage_gb() -> i32 {
    5
}
