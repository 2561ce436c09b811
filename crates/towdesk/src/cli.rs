//! Clap derive structures for the `towdesk` CLI.
//!
//! Defines the command tree, global flags, and shared types. Kept free of
//! workspace crates so `build.rs` can include it for man page generation.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// towdesk -- admin dashboard for roadside assistance data
#[derive(Debug, Parser)]
#[command(
    name = "towdesk",
    version,
    about = "Manage towdesk users, tow requests and partner companies",
    long_about = "Administrative CLI over the towdesk document database.\n\n\
        Lists users and tow requests, manages insurance and towing\n\
        companies, and triggers password reset emails.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "TOWDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Cloud project id (overrides profile)
    #[arg(long, env = "TOWDESK_PROJECT", global = true)]
    pub project: Option<String>,

    /// Web API key
    #[arg(long, env = "TOWDESK_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Firestore emulator host:port (overrides profile)
    #[arg(long, env = "FIRESTORE_EMULATOR_HOST", global = true, value_name = "HOST:PORT")]
    pub emulator: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TOWDESK_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "TOWDESK_TIMEOUT", global = true)]
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
    /// Plain text, one id per line (scripting)
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
    /// View platform user profiles
    #[command(alias = "u")]
    Users(UsersArgs),

    /// View account roles
    Roles(RolesArgs),

    /// View roadside assistance requests
    #[command(alias = "tr")]
    TowRequests(TowRequestsArgs),

    /// Manage partner insurance companies
    #[command(alias = "ins")]
    Insurers(InsurersArgs),

    /// Manage towing companies
    #[command(alias = "tow")]
    Towing(TowingArgs),

    /// Account operations on the identity provider
    Auth(AuthArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS / ROLES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users with their resolved roles
    #[command(alias = "ls")]
    List,

    /// Show one user
    Get {
        /// User document id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RolesCommand {
    /// List role ids
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOW REQUESTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TowRequestsArgs {
    #[command(subcommand)]
    pub command: TowRequestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TowRequestsCommand {
    /// List tow requests
    #[command(alias = "ls")]
    List,

    /// Show one tow request
    Get {
        /// Tow request document id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INSURERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InsurersArgs {
    #[command(subcommand)]
    pub command: InsurersCommand,
}

#[derive(Debug, Subcommand)]
pub enum InsurersCommand {
    /// List insurance companies
    #[command(alias = "ls")]
    List,

    /// Show one insurance company
    Get {
        /// Company document id
        id: String,
    },

    /// Register an insurance company
    Create {
        /// Company display name
        #[arg(long, required = true)]
        name: String,

        /// Claims contact email
        #[arg(long, required = true)]
        email: String,

        /// Id of the insurer's user account
        #[arg(long, required = true)]
        user_id: String,

        /// Active claim id (repeatable)
        #[arg(long = "claim")]
        claims: Vec<String>,

        /// Operating region
        #[arg(long)]
        region: Option<String>,
    },

    /// Change fields of an insurance company
    Update {
        /// Company document id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        user_id: Option<String>,

        /// Replace the active claim list (repeatable)
        #[arg(long = "claim")]
        claims: Option<Vec<String>>,

        #[arg(long)]
        region: Option<String>,
    },

    /// Delete an insurance company
    Delete {
        /// Company document id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOWING COMPANIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TowingArgs {
    #[command(subcommand)]
    pub command: TowingCommand,
}

#[derive(Debug, Subcommand)]
pub enum TowingCommand {
    /// List towing companies
    #[command(alias = "ls")]
    List,

    /// Show one towing company
    Get {
        /// Company document id
        id: String,
    },

    /// Register a towing company
    Create {
        #[arg(long, required = true)]
        name: String,

        /// Dispatch email
        #[arg(long, required = true)]
        email: String,

        #[arg(long, required = true)]
        phone: String,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        region: Option<String>,
    },

    /// Change fields of a towing company
    Update {
        /// Company document id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        region: Option<String>,
    },

    /// Delete a towing company
    Delete {
        /// Company document id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Send a password reset email
    ResetPassword {
        /// Account email address
        email: String,
    },
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

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (e.g. project_id, emulator_host, timeout)
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

    /// Store an API key in the system keyring
    SetApiKey {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
