//! Cleanup request/result model
//!
//! A cleanup operation either could not be attempted at all (invalid input,
//! unreachable host, rejected credentials) or it ran and produced a
//! [`CleanupResult`], which may itself report a partial failure. The two
//! cases are kept apart by [`OperationOutcome`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{Error, Result};

/// Cleanup request as received from a caller; every field may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequestInput {
    #[serde(default)]
    pub target_address: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
}

impl CleanupRequestInput {
    pub fn new(
        target_address: impl Into<String>,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            target_address: Some(target_address.into()),
            username: Some(username.into()),
            credential: Some(credential.into()),
        }
    }
}

/// Validated cleanup request; only obtainable through [`validate`]
#[derive(Clone, PartialEq, Eq)]
pub struct CleanupRequest {
    target_address: String,
    username: String,
    credential: String,
}

impl CleanupRequest {
    pub fn target_address(&self) -> &str {
        &self.target_address
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }
}

// Keep the credential out of logs
impl std::fmt::Debug for CleanupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupRequest")
            .field("target_address", &self.target_address)
            .field("username", &self.username)
            .field("credential", &"***")
            .finish()
    }
}

/// Validate a raw request
///
/// Each missing or empty field contributes one violation; all violations
/// are reported together in a single [`Error::InvalidInput`].
pub fn validate(input: &CleanupRequestInput) -> Result<CleanupRequest> {
    fn required<'a>(
        value: &'a Option<String>,
        field: &str,
        violations: &mut Vec<String>,
    ) -> &'a str {
        match value.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => {
                violations.push(format!("{} is required", field));
                ""
            }
        }
    }

    let mut violations = Vec::new();
    let target_address = required(&input.target_address, "targetAddress", &mut violations);
    let username = required(&input.username, "username", &mut violations);
    let credential = required(&input.credential, "credential", &mut violations);

    if !violations.is_empty() {
        return Err(Error::InvalidInput(violations.join(", ")));
    }

    Ok(CleanupRequest {
        target_address: target_address.to_string(),
        username: username.to_string(),
        credential: credential.to_string(),
    })
}

/// Result of a cleanup operation that ran
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResult {
    /// Overall outcome; false means at least one entry in `errors`
    pub success: bool,
    /// Total bytes reclaimed
    pub freed_space_bytes: u64,
    /// Removed paths, in deletion order
    pub deleted_items: Vec<String>,
    /// Per-item or operation failure descriptions
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Record a failure; the result is no longer a full success
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.success = false;
    }

    /// Does `success` agree with `errors`?
    pub fn is_consistent(&self) -> bool {
        self.success == self.errors.is_empty()
    }
}

/// Either the operation ran and produced a result, or it could not run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationOutcome {
    #[serde(rename = "result")]
    Completed(CleanupResult),
    #[serde(rename = "error")]
    Failed(String),
}

impl OperationOutcome {
    pub fn result(&self) -> Option<&CleanupResult> {
        match self {
            OperationOutcome::Completed(result) => Some(result),
            OperationOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OperationOutcome::Completed(_) => None,
            OperationOutcome::Failed(message) => Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OperationOutcome::Failed(_))
    }
}

impl From<Error> for OperationOutcome {
    fn from(err: Error) -> Self {
        OperationOutcome::Failed(err.to_string())
    }
}

impl From<Result<CleanupResult>> for OperationOutcome {
    fn from(result: Result<CleanupResult>) -> Self {
        match result {
            Ok(result) => OperationOutcome::Completed(result),
            Err(err) => err.into(),
        }
    }
}

/// Executes a validated cleanup request against a target host
///
/// Errors returned here mean the operation could not be attempted;
/// partial failures are reported inside the [`CleanupResult`].
#[async_trait]
pub trait CleanupExecutor: Send + Sync {
    async fn execute(&self, request: &CleanupRequest) -> Result<CleanupResult>;
}

/// Validate a raw request and run it on the executor
#[instrument(skip(executor, input), fields(target = ?input.target_address))]
pub async fn run_cleanup(
    executor: &dyn CleanupExecutor,
    input: &CleanupRequestInput,
) -> OperationOutcome {
    let request = match validate(input) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Rejected cleanup request");
            return e.into();
        }
    };

    executor.execute(&request).await.into()
}
