// ── Error taxonomy ──
//
// Every failure the core can produce, from request validation through
// driver dispatch. The boundary layer derives the response status from
// the variant, so the split between request-side and driver-side errors
// is load-bearing.

use thiserror::Error;

/// Core error type for request validation, orchestration, and dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required field was absent from the request.
    #[error("Missing field '{field}'. Try resending the request with {field} set.")]
    RequestValueMissing { field: String },

    /// A field was present but semantically invalid.
    #[error("Invalid value '{value}' for field '{field}'.{}",
        .valid_values.as_deref().map_or_else(String::new, |v| format!(" Valid values are {v}.")))]
    RequestValue {
        field: String,
        value: String,
        valid_values: Option<String>,
    },

    /// A field's runtime value did not match its declared shape.
    #[error("Value '{value}' for field '{field}' is not the correct type: expected {expected}.")]
    RequestType {
        field: String,
        value: String,
        expected: String,
    },

    /// The driver could not find the object as described.
    #[error("Object not found.")]
    ObjectNotFound,

    /// A create request targeted an identity that already exists.
    #[error("Object {}already exists.", .name.as_deref().map_or_else(String::new, |n| format!("{n} ")))]
    ObjectExists { name: Option<String> },

    /// The driver returned a value of the wrong shape. Always a driver bug.
    #[error("Device driver {driver} did not supply a properly formatted response.")]
    DriverResponseInvalid { driver: String },

    /// The driver does not implement the requested capability.
    #[error("Device driver {driver} does not support {operation}.")]
    DriverOperationUnsupported { driver: String, operation: String },

    /// The driver supports the operation, but the target device family does not.
    #[error("Device driver {driver} cannot execute {operation} on device_id: {device_id}.")]
    DeviceOperationUnsupported {
        driver: String,
        operation: String,
        device_id: String,
    },

    /// A well-formed request the device cannot satisfy due to platform limitations.
    #[error("{message}")]
    DriverRequest { message: String },

    /// The device is unknown to the inventory backend.
    #[error("Could not find device_id: {device_id} in backend {backend}.")]
    DeviceNotFound { device_id: String, backend: String },

    /// The device exists but its credentials could not be resolved.
    #[error("Could not find credentials for device_id: {device_id} in backend: {backend}.")]
    DeviceCredentialsNotFound { device_id: String, backend: String },

    /// The device exists but names no driver.
    #[error("Could not retrieve driver information for device_id: {device_id} from backend: {backend}.")]
    DeviceDriverNotDefined { device_id: String, backend: String },

    /// No driver with the given name is registered.
    #[error("Could not load driver {name}.")]
    DriverNotFound { name: String },

    /// Anything else. Surfaced verbatim only in debug mode.
    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for [`Error::RequestValue`] without a valid-values hint.
    pub fn request_value(field: impl Into<String>, value: impl ToString) -> Self {
        Self::RequestValue {
            field: field.into(),
            value: value.to_string(),
            valid_values: None,
        }
    }

    /// Shorthand for [`Error::RequestValue`] with a valid-values hint.
    pub fn request_value_expected(
        field: impl Into<String>,
        value: impl ToString,
        valid_values: impl Into<String>,
    ) -> Self {
        Self::RequestValue {
            field: field.into(),
            value: value.to_string(),
            valid_values: Some(valid_values.into()),
        }
    }

    /// HTTP-style status code for the response envelope.
    pub fn status(&self) -> u16 {
        match self {
            Self::RequestValueMissing { .. }
            | Self::RequestValue { .. }
            | Self::RequestType { .. } => 400,
            Self::ObjectNotFound | Self::DeviceNotFound { .. } => 404,
            Self::ObjectExists { .. } => 409,
            Self::DriverOperationUnsupported { .. } | Self::DeviceOperationUnsupported { .. } => {
                501
            }
            _ => 500,
        }
    }

    /// Whether the error text is safe to hand to the caller without
    /// debug mode. Internal errors get a generic message instead.
    pub fn user_facing(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            Error::RequestValueMissing {
                field: "name".into()
            }
            .status(),
            400
        );
        assert_eq!(Error::ObjectNotFound.status(), 404);
        assert_eq!(Error::ObjectExists { name: None }.status(), 409);
        assert_eq!(
            Error::DriverOperationUnsupported {
                driver: "memory".into(),
                operation: "vrf:create".into()
            }
            .status(),
            501
        );
        assert_eq!(
            Error::DriverRequest {
                message: "no more TCAM".into()
            }
            .status(),
            500
        );
    }

    #[test]
    fn object_exists_message_with_and_without_name() {
        assert_eq!(
            Error::ObjectExists { name: None }.to_string(),
            "Object already exists."
        );
        assert_eq!(
            Error::ObjectExists {
                name: Some("Vlan100".into())
            }
            .to_string(),
            "Object Vlan100 already exists."
        );
    }

    #[test]
    fn request_value_message_includes_hint() {
        let err = Error::request_value_expected("family", "ipx", "[ipv4, ipv6]");
        assert_eq!(
            err.to_string(),
            "Invalid value 'ipx' for field 'family'. Valid values are [ipv4, ipv6]."
        );
    }
}
