//! Clap derive structures for the `roster` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use roster_core::SortField;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// roster -- manage the student roster from the command line
#[derive(Debug, Parser)]
#[command(
    name = "roster",
    version,
    about = "Manage student records from the command line",
    long_about = "List, inspect, create, edit, delete and toggle student records\n\
        held by a remote student REST service.",
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
    /// Service profile to use
    #[arg(long, short = 'p', env = "ROSTER_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service root URL (overrides profile)
    #[arg(long, env = "ROSTER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format [default: table, or `defaults.output` from config]
    #[arg(long, short = 'o', env = "ROSTER_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto, or `defaults.color` from config]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

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
    #[arg(long, env = "ROSTER_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// Manage student records
    #[command(alias = "s")]
    Students(StudentsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STUDENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StudentsArgs {
    #[command(subcommand)]
    pub command: StudentsCommand,
}

/// Sortable column.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// Student code
    Code,
    /// Student name
    Name,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Code => SortField::StudentCode,
            SortArg::Name => SortField::Name,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum StudentsCommand {
    /// List students
    #[command(alias = "ls")]
    List {
        /// Case-insensitive filter on name or student code
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Column to sort by
        #[arg(long, default_value = "name")]
        sort: SortArg,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show a single student
    Get {
        /// Student ID
        id: String,
    },

    /// Create a student
    #[command(alias = "create")]
    Add {
        /// Unique student code (min. 3 characters)
        #[arg(long)]
        code: String,

        /// Full name (min. 2 characters)
        #[arg(long)]
        name: String,

        /// Create the student as inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Update a student's name or status
    #[command(alias = "update")]
    Edit {
        /// Student ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Mark active
        #[arg(long, conflicts_with = "inactive")]
        active: bool,

        /// Mark inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Delete a student
    #[command(alias = "rm")]
    Delete {
        /// Student ID
        id: String,
    },

    /// Flip a student's active flag
    Toggle {
        /// Student ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
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

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set the service URL of the active profile
    SetUrl {
        /// Service root, e.g. https://student-api.example.com
        url: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
