use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for rShiftlog
/// CLI application to clock in/out of geofenced project shifts with SQLite
#[derive(Parser)]
#[command(
    name = "rshiftlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clock in and out of project shifts, gated by the site's geofence, and total the week",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the current position comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct PositionArgs {
    /// Observed latitude in decimal degrees
    #[arg(long = "lat", allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Observed longitude in decimal degrees
    #[arg(long = "lon", allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Reported accuracy of the observed position, in meters
    #[arg(long = "accuracy")]
    pub accuracy: Option<f64>,

    /// Read the position from a JSON fix file written by a GPS daemon
    #[arg(long = "fix-file", value_name = "FILE", conflicts_with_all = ["lat", "lon"])]
    pub fix_file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage projects (site location, allowed radius, lunch break)
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Clock in on a project
    Start {
        /// Project id
        project: i64,

        /// User clocking in (defaults to `default_user` from the configuration)
        #[arg(long = "user")]
        user: Option<String>,

        /// Lunch break in minutes for this shift (overrides the project's)
        #[arg(long = "lunch")]
        lunch: Option<i64>,

        #[command(flatten)]
        position: PositionArgs,
    },

    /// Clock out of an open shift
    Stop {
        /// Entry id of the open shift
        #[arg(required_unless_present = "project", conflicts_with = "project")]
        entry: Option<i64>,

        /// Close the open shift on this project instead of naming the entry
        #[arg(long = "project")]
        project: Option<i64>,

        /// User clocking out (defaults to `default_user` from the configuration)
        #[arg(long = "user")]
        user: Option<String>,

        #[command(flatten)]
        position: PositionArgs,
    },

    /// Show open shifts with the time elapsed so far
    Status {
        #[arg(long = "user")]
        user: Option<String>,
    },

    /// Show worked hours per day for one week (Monday to Sunday)
    Week {
        /// Any date inside the week (YYYY-MM-DD), default today
        #[arg(long = "date")]
        date: Option<String>,

        #[arg(long = "user")]
        user: Option<String>,

        /// Only count shifts on this project
        #[arg(long = "project")]
        project: Option<i64>,

        /// Print the summary as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup file")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Register a new project site
    Add {
        #[arg(long)]
        name: String,

        #[arg(long = "lat", allow_negative_numbers = true)]
        lat: f64,

        #[arg(long = "lon", allow_negative_numbers = true)]
        lon: f64,

        /// Allowed distance from the site, in meters
        #[arg(long = "radius", allow_negative_numbers = true)]
        radius: f64,

        /// Lunch break deducted from each shift, in minutes
        #[arg(long = "lunch", default_value_t = 0, allow_negative_numbers = true)]
        lunch: i64,
    },

    /// List projects
    List,

    /// Change fields of an existing project
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "lat", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long = "lon", allow_negative_numbers = true)]
        lon: Option<f64>,

        #[arg(long = "radius", allow_negative_numbers = true)]
        radius: Option<f64>,

        #[arg(long = "lunch", allow_negative_numbers = true)]
        lunch: Option<i64>,
    },

    /// Delete a project without time entries
    Del {
        id: i64,

        /// Do not ask for confirmation
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}
