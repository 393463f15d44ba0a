//! The response envelope.
//!
//! Every operation answers with the same shape: a request id, the
//! data (or null), a list of error strings, and the status code the
//! outcome maps to.

use serde::Serialize;
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    #[serde(rename = "request-id")]
    pub request_id: Uuid,
    pub data: serde_json::Value,
    pub errors: Vec<String>,
    pub status: u16,
}

impl Envelope {
    /// Wrap a successful result.
    pub fn success<T: Serialize>(data: &T, status: u16) -> Result<Self, Error> {
        let data = serde_json::to_value(data)
            .map_err(|e| Error::Internal(format!("response serialization failed: {e}")))?;
        Ok(Self {
            request_id: Uuid::new_v4(),
            data,
            errors: Vec::new(),
            status,
        })
    }

    /// Wrap an error. Internal error text is masked unless `debug` is
    /// set; everything else is already phrased for the caller.
    pub fn failure(error: &Error, debug: bool) -> Self {
        let message = if error.user_facing() || debug {
            error.to_string()
        } else {
            "Internal server error.".to_owned()
        };
        Self {
            request_id: Uuid::new_v4(),
            data: serde_json::Value::Null,
            errors: vec![message],
            status: error.status(),
        }
    }
}
