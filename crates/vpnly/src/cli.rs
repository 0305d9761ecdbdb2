//! Clap derive structures for the `vpnly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vpnly -- site-to-site VPN configuration from the command line
#[derive(Debug, Parser)]
#[command(
    name = "vpnly",
    version,
    about = "Orchestrate site-to-site VPN configuration from the command line",
    long_about = "Inspect VPN connections, re-point them at customer gateways, register\n\
        new gateways and compile IPsec profiles for the on-premises router.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "VPNLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Control plane endpoint URL (overrides profile)
    #[arg(long, short = 'e', env = "VPNLY_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Region (overrides profile)
    #[arg(long, short = 'r', env = "VPNLY_REGION", global = true)]
    pub region: Option<String>,

    /// Access key id (overrides profile)
    #[arg(long, env = "VPNLY_ACCESS_KEY_ID", global = true)]
    pub access_key_id: Option<String>,

    /// Access key secret
    #[arg(long, env = "VPNLY_SECRET_ACCESS_KEY", global = true, hide_env = true)]
    pub secret: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VPNLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip TLS certificate verification (lab endpoints only)
    #[arg(long, short = 'k', env = "VPNLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "VPNLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect and re-associate VPN connections
    Vpn(VpnArgs),

    /// Manage customer gateways
    #[command(alias = "gw")]
    Gateways(GatewaysArgs),

    /// Compile and deliver IPsec profiles
    Profile(ProfileArgs),

    /// List VPCs
    Vpcs(VpcsArgs),

    /// Interactive session: select, inspect and mutate in one place
    Shell,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VPN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VpnArgs {
    #[command(subcommand)]
    pub command: VpnCommand,
}

#[derive(Debug, Subcommand)]
pub enum VpnCommand {
    /// List VPN connections with their resolved peer gateways
    #[command(alias = "ls")]
    List,

    /// Show one connection with tunnel and IKE detail
    Show {
        /// VPN connection ID
        id: String,

        /// Include tunnel pre-shared keys in the output
        #[arg(long)]
        show_secrets: bool,
    },

    /// Point a connection at a different customer gateway
    Associate {
        /// VPN connection ID
        vpn_id: String,

        /// Customer gateway ID
        gateway_id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GATEWAYS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GatewaysArgs {
    #[command(subcommand)]
    pub command: GatewaysCommand,
}

#[derive(Debug, Subcommand)]
pub enum GatewaysCommand {
    /// List customer gateways
    #[command(alias = "ls")]
    List,

    /// Register a new customer gateway and name it
    Create {
        /// Public IPv4 address of the on-premises router
        #[arg(long)]
        ip: String,

        /// BGP autonomous system number
        #[arg(long)]
        asn: String,

        /// Display name
        #[arg(long)]
        name: String,
    },

    /// Attach a name to an existing gateway (retries a failed label step)
    Label {
        /// Customer gateway ID
        id: String,

        /// Display name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Compile a connection's IPsec profile and write it as JSON
    Push {
        /// VPN connection ID
        vpn_id: String,

        /// Write to this file instead of stdout
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VPCS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VpcsArgs {
    #[command(subcommand)]
    pub command: VpcsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VpcsCommand {
    /// List VPCs (always fetched fresh)
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (e.g., "endpoint", "region", "timeout")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's access key secret in the system keyring
    SetSecret,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
