//! Consolidated constants for the gateway adapter

// =============================================================================
// HTTP Headers
// =============================================================================

/// Header key for tenant identification
pub const X_TENANT_ID: &str = "x-tenant-id";
/// Header key for request ID
pub const X_REQUEST_ID: &str = "x-request-id";
/// Header key for gateway identification
pub const X_GATEWAY: &str = "x-gateway";
/// API key header, overrides the configured gateway secret for a single request
pub const X_API_KEY: &str = "x-api-key";

// =============================================================================
// Error Messages and Codes
// =============================================================================

/// No error message string const
pub const NO_ERROR_MESSAGE: &str = "No error message";
/// No error code string const
pub const NO_ERROR_CODE: &str = "No error code";
/// A string constant representing a redacted or masked value
pub const REDACTED: &str = "Redacted";

// =============================================================================
// Transactions
// =============================================================================

/// Currency used when a transaction does not carry one
pub const DEFAULT_CURRENCY: &str = "usd";
/// Lifetime of an authorization hold, in days
pub const AUTHORIZATION_VALIDITY_DAYS: i64 = 7;

// =============================================================================
// Environment and Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Development,
    Release,
}

impl Env {
    pub const fn current_env() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Release
        }
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Release => "production.toml",
        }
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Release => write!(f, "release"),
        }
    }
}
