//! Command dispatch: map CLI arguments onto `DeviceService` calls and
//! wrap the outcome in the response envelope.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use switchboard_config::ConfigError;
use switchboard_core::model::{Interface, Lag, Vlan, Vrf, Vxlan};
use switchboard_core::{DeviceService, Envelope, Error as CoreError, Payload, Resource};

use crate::cli::{ActionArg, Cli, ResourceArg};

/// Failures before a request reaches the service layer: bad
/// invocation or broken local configuration. Domain errors never land
/// here; they come back as failure envelopes.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("{action} requires a resource key")]
    #[diagnostic(help("pass the key after the action, e.g. `switchboard -d sw1 vlan {action} 72`"))]
    MissingKey { action: String },

    #[error("{action} requires a request body")]
    #[diagnostic(help("pass one with --data '{{...}}'"))]
    MissingData { action: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Run one operation. `Ok` carries the envelope and the process exit
/// code derived from its status.
pub fn dispatch(cli: &Cli, service: &DeviceService, debug: bool) -> Result<Envelope, CliError> {
    let payload = match parse_data(cli) {
        Ok(payload) => payload,
        Err(err) => return Ok(Envelope::failure(&err, debug)),
    };
    let result = match cli.resource {
        ResourceArg::Interface => run_resource::<Interface>(cli, service, payload)?,
        ResourceArg::Lag => run_resource::<Lag>(cli, service, payload)?,
        ResourceArg::Vlan => run_resource::<Vlan>(cli, service, payload)?,
        ResourceArg::Vrf => run_resource::<Vrf>(cli, service, payload)?,
        ResourceArg::Vxlan => run_resource::<Vxlan>(cli, service, payload)?,
    };
    match result {
        Ok(envelope) => Ok(envelope),
        Err(err) => Ok(Envelope::failure(&err, debug)),
    }
}

fn parse_data(cli: &Cli) -> Result<Option<Payload>, CoreError> {
    match &cli.data {
        None => Ok(None),
        Some(raw) => {
            let value: serde_json::Value = serde_json::from_str(raw)
                .map_err(|e| CoreError::request_value("<body>", format!("invalid JSON: {e}")))?;
            Payload::from_value(value).map(Some)
        }
    }
}

fn run_resource<R: Resource + Serialize>(
    cli: &Cli,
    service: &DeviceService,
    payload: Option<Payload>,
) -> Result<Result<Envelope, CoreError>, CliError> {
    let key = cli.key.as_deref();
    let outcome = match cli.action {
        ActionArg::Read => match key {
            Some(key) => service.read::<R>(key).and_then(|e| Envelope::success(&e, 200)),
            None => service.list::<R>().and_then(|e| Envelope::success(&e, 200)),
        },
        ActionArg::Create => {
            let payload = payload.ok_or_else(|| CliError::MissingData {
                action: "create".into(),
            })?;
            service.create::<R>(payload).and_then(|e| Envelope::success(&e, 201))
        }
        ActionArg::Replace => {
            let key = require_key(key, "replace")?;
            let payload = payload.ok_or_else(|| CliError::MissingData {
                action: "replace".into(),
            })?;
            service
                .replace::<R>(key, payload)
                .and_then(|e| Envelope::success(&e, 200))
        }
        ActionArg::Update => {
            let key = require_key(key, "update")?;
            let payload = payload.ok_or_else(|| CliError::MissingData {
                action: "update".into(),
            })?;
            service
                .update::<R>(key, payload)
                .and_then(|e| Envelope::success(&e, 200))
        }
        ActionArg::Delete => {
            let key = require_key(key, "delete")?;
            service
                .delete::<R>(key)
                .and_then(|()| Envelope::success(&serde_json::Value::Null, 204))
        }
    };
    Ok(outcome)
}

fn require_key<'a>(key: Option<&'a str>, action: &str) -> Result<&'a str, CliError> {
    key.ok_or_else(|| CliError::MissingKey {
        action: action.to_owned(),
    })
}
