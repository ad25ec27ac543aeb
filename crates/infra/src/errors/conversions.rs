//! Conversions from external infrastructure errors into domain errors.

use frostlink_domain::FrostlinkError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FrostlinkError);

impl From<InfraError> for FrostlinkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FrostlinkError> for InfraError {
    fn from(value: FrostlinkError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFrostlinkError {
    fn into_frostlink(self) -> FrostlinkError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FrostlinkError */
/* -------------------------------------------------------------------------- */

impl IntoFrostlinkError for HttpError {
    fn into_frostlink(self) -> FrostlinkError {
        if self.is_timeout() {
            return FrostlinkError::transport("HTTP request timed out");
        }

        if self.is_connect() {
            return FrostlinkError::transport("HTTP connection failure");
        }

        if self.is_decode() {
            return FrostlinkError::decode(format!("response body unreadable: {self}"));
        }

        if self.is_builder() {
            return FrostlinkError::internal(format!("malformed HTTP request: {self}"));
        }

        FrostlinkError::transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_frostlink())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → FrostlinkError */
/* -------------------------------------------------------------------------- */

impl IntoFrostlinkError for JsonError {
    fn into_frostlink(self) -> FrostlinkError {
        FrostlinkError::decode(self.to_string())
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_frostlink())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → FrostlinkError */
/* -------------------------------------------------------------------------- */

impl IntoFrostlinkError for UrlError {
    fn into_frostlink(self) -> FrostlinkError {
        FrostlinkError::config(format!("invalid URL: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(value.into_frostlink())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
