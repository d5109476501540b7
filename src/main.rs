use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

use commitments::cli::{
    handle_activity_command, handle_admin_command, handle_admin_login, handle_dashboard_command,
    handle_export_command, handle_fixtures_command, handle_header_command, handle_login,
    handle_logout, handle_record_command, handle_sequence_command, handle_user_command,
    handle_whoami, handle_xml_command,
};
use commitments::config::{AppPaths, Settings, StorageBackend};
use commitments::services::auth::{AuthService, BOOTSTRAP_ADMIN_PASSWORD, BOOTSTRAP_ADMIN_USERNAME};
use commitments::storage::Storage;

#[derive(Parser)]
#[command(
    name = "commitments",
    version,
    about = "Budget commitment records with XML import/export",
    long_about = "commitments-cli keeps per-user lists of budget commitments \
                  (invoices with a budget classification item), checks their \
                  sequence numbering and exchanges them as XML."
)]
struct Cli {
    /// Override the configured storage backend for this run
    #[arg(long, global = true, value_enum)]
    backend: Option<StorageBackend>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and bootstrap admin account
    Init,

    /// Show current configuration and paths
    Config {
        /// Persist a storage backend choice
        #[arg(long, value_enum)]
        set_backend: Option<StorageBackend>,
        /// Persist the record list page size
        #[arg(long)]
        set_page_size: Option<usize>,
    },

    /// Log in as a user
    Login {
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log in as the admin
    AdminLogin {
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// End the current session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Header commands
    #[command(subcommand)]
    Header(commitments::cli::HeaderCommands),

    /// Record management commands
    #[command(subcommand)]
    Record(commitments::cli::RecordCommands),

    /// XML import, export and verification
    #[command(subcommand)]
    Xml(commitments::cli::XmlCommands),

    /// Sequence number checks and repair
    #[command(subcommand, alias = "seq")]
    Sequence(commitments::cli::SequenceCommands),

    /// User management commands (admin)
    #[command(subcommand)]
    User(commitments::cli::UserCommands),

    /// Admin account commands
    #[command(subcommand)]
    Admin(commitments::cli::AdminCommands),

    /// Monthly activity
    Activity {
        /// Every user's activity (admin)
        #[arg(long)]
        all: bool,
    },

    /// Current-month totals (admin)
    Dashboard,

    /// CSV, JSON and YAML exports
    #[command(subcommand)]
    Export(commitments::cli::ExportCommands),

    /// Synthetic XML fixtures
    #[command(subcommand)]
    Fixtures(commitments::cli::FixturesCommands),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = AppPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let needs_init = !matches!(
        cli.command,
        None | Some(Commands::Init) | Some(Commands::Config { .. }) | Some(Commands::Fixtures(_))
    );
    if needs_init && !storage.is_initialized() {
        bail!("Not initialized. Run 'commitments init' first");
    }

    // The override applies to this run only and is never saved
    let mut effective = settings.clone();
    if let Some(backend) = cli.backend {
        effective.backend = backend;
    }

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing commitments-cli at: {}", paths.base_dir().display());
            let created = AuthService::new(&storage).initialize()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if created {
                println!();
                println!(
                    "Admin account: {} / {}",
                    BOOTSTRAP_ADMIN_USERNAME, BOOTSTRAP_ADMIN_PASSWORD
                );
                println!("Change it with 'commitments admin set-credentials'.");
            }
        }
        Some(Commands::Config {
            set_backend,
            set_page_size,
        }) => {
            if set_backend.is_some() || set_page_size.is_some() {
                if let Some(backend) = set_backend {
                    settings.backend = backend;
                }
                if let Some(size) = set_page_size {
                    settings.page_size = size.max(1);
                }
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }
            println!("commitments-cli Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Database file:    {}", paths.database_file().display());
            println!("Initialized:      {}", if storage.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!("  Storage backend:  {}", settings.backend);
            println!("  Page size:        {}", settings.page_size);
            println!("  Fixture records:  {}", settings.fixture_record_count);
        }
        Some(Commands::Login { username, password }) => {
            handle_login(&storage, username, password)?;
        }
        Some(Commands::AdminLogin { username, password }) => {
            handle_admin_login(&storage, username, password)?;
        }
        Some(Commands::Logout) => handle_logout(&storage)?,
        Some(Commands::Whoami) => handle_whoami(&storage)?,
        Some(Commands::Header(cmd)) => handle_header_command(&storage, &effective, cmd)?,
        Some(Commands::Record(cmd)) => handle_record_command(&storage, &effective, cmd)?,
        Some(Commands::Xml(cmd)) => handle_xml_command(&storage, &effective, cmd)?,
        Some(Commands::Sequence(cmd)) => handle_sequence_command(&storage, &effective, cmd)?,
        Some(Commands::User(cmd)) => handle_user_command(&storage, cmd)?,
        Some(Commands::Admin(cmd)) => handle_admin_command(&storage, cmd)?,
        Some(Commands::Activity { all }) => handle_activity_command(&storage, all)?,
        Some(Commands::Dashboard) => handle_dashboard_command(&storage)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &effective, cmd)?,
        Some(Commands::Fixtures(cmd)) => handle_fixtures_command(&effective, cmd)?,
        None => {
            println!("commitments-cli - budget commitment records");
            println!();
            println!("Run 'commitments --help' for usage information.");
            println!("Run 'commitments init' to get started.");
        }
    }

    Ok(())
}
