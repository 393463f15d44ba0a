//! Clap derive structures for the `switchboard` CLI.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// switchboard -- vendor-neutral network device configuration
#[derive(Debug, Parser)]
#[command(
    name = "switchboard",
    version,
    about = "Configure network devices through a vendor-neutral object model",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Device id from the inventory
    #[arg(long, short = 'd', env = "SWITCHBOARD_DEVICE")]
    pub device: String,

    /// Path to a TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Inventory file (overrides configuration)
    #[arg(long, short = 'i')]
    pub inventory: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Resource family to operate on
    pub resource: ResourceArg,

    /// Operation to perform
    pub action: ActionArg,

    /// Resource key (interface name, VLAN id, VNI); omit with `read`
    /// to list everything
    pub key: Option<String>,

    /// JSON request body for create/replace/update
    #[arg(long)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceArg {
    Interface,
    Lag,
    Vlan,
    Vrf,
    Vxlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Read,
    Create,
    Replace,
    Update,
    Delete,
}
