// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.

// ==========================================================================
// Service Defaults
// ==========================================================================

/// Base URL of the consultation backend.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout (in seconds). SOAP generation runs a language
/// model on the backend, so this is generous.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Minimum request timeout (in seconds).
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Maximum request timeout (in seconds).
pub const MAX_TIMEOUT_SECS: u64 = 600;

// ==========================================================================
// Logging Defaults
// ==========================================================================

/// Default `tracing` filter directive when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "ehr_agent=info";
