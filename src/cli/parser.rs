use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for closetrack
/// Tracks the monthly closing checklist of every location, kept in sync
/// through a shared store
#[derive(Parser)]
#[command(
    name = "closetrack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Monthly inventory closing checklist per location, synchronized through a shared store",
    long_about = None
)]
pub struct Cli {
    /// Override the shared store path (useful for tests or custom stores)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Work without the shared store (changes are not persisted)
    #[arg(global = true, long = "offline")]
    pub offline: bool,

    /// Period to work on (e.g. "abril-2025" or "2025-04"); default: current month
    #[arg(global = true, long = "period", short = 'p')]
    pub period: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the shared store
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Show the checklist matrix for the period
    List {
        #[arg(long, short = 'g', help = "Only locations of this region (VALLE, CAUCA, ANTIOQUIA)")]
        group: Option<String>,

        #[arg(long, short = 's', help = "Search in location name and responsible")]
        search: Option<String>,

        #[arg(long = "pending", help = "Hide locations with every activity done")]
        pending: bool,
    },

    /// Mark an activity as done (or pending with --off)
    Check {
        /// Location id, code (e.g. 001) or full name
        location: String,

        /// Activity key or 1-based position in the checklist
        activity: String,

        #[arg(long = "off", help = "Mark the activity as pending")]
        off: bool,
    },

    /// Set the exception note of a location (empty text clears it)
    Note {
        location: String,
        text: String,
    },

    /// Assign the responsible staff member of a location
    Assign {
        location: String,
        responsible: String,
    },

    /// Show KPIs and progress per responsible
    Summary {
        #[arg(long, short = 'g')]
        group: Option<String>,
    },

    /// Discard every record of the period in the shared store
    Reset {
        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Follow live changes from other operators (Ctrl-C to stop)
    Watch,

    /// Export the period's records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'g')]
        group: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
