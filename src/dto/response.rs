//! The `{status, error?, data?}` envelope wrapped around every game response.

use serde::Serialize;
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

/// Outcome marker carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The operation succeeded.
    Ok,
    /// The operation failed; `error` says why.
    Error,
}

/// Empty payload used by envelopes that never carry `data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoData {}

/// Fixed JSON envelope returned by the game endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Outcome marker.
    pub status: ResponseStatus,
    /// Client-facing failure message, present only on errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Operation result, present only on successful lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Envelope without a data payload.
pub type StatusResponse = ApiResponse<NoData>;

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`.
    pub fn ok_with(data: T) -> Self {
        Self {
            status: ResponseStatus::Ok,
            error: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<NoData> {
    /// Successful envelope with nothing but the status.
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Ok,
            error: None,
            data: None,
        }
    }

    /// Failed envelope carrying a human readable message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            error: Some(message.into()),
            data: None,
        }
    }

    /// Failed envelope listing one message per offending field, in field-name order.
    pub fn validation_error(errors: &ValidationErrors) -> Self {
        Self::error(validation_message(errors))
    }
}

/// Render `errors` as `field X is ...` messages joined with `", "`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| errs.first().map(|err| (field.to_string(), err)))
        .collect::<Vec<_>>();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .iter()
        .map(|(field, err)| describe(field, err))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(field: &str, err: &ValidationError) -> String {
    match err.code.as_ref() {
        "required" => format!("field {field} is a required field"),
        _ => format!("field {field} is not valid"),
    }
}
