//! Citywatch CLI - civic alerts, reports, and local services.
//!
//! This is the main binary entry point. See the `citywatch` library for
//! the core functionality.

use anyhow::Result;
use citywatch::commands::{self, profile::ProfileUpdate};
use citywatch::geo::services::ServiceKind;
use citywatch::models::Category;
use citywatch::{Config, Session};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

/// mimalloc outperforms the system allocator for allocation-heavy
/// JSON decode paths.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "citywatch", version, about = "Client for the citywatch civic backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        email: String,
        password: String,
    },
    /// Create an account and sign in
    Register {
        email: String,
        password: String,
    },
    /// Clear the stored credential
    Logout,
    /// Show or update the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Submit a report
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// List your submitted reports
    Reports {
        /// List patient reports instead of incident reports
        #[arg(long)]
        patient: bool,
    },
    /// Locally cached report drafts
    Drafts {
        /// Clear the cache instead of listing it
        #[arg(long)]
        clear: bool,
    },
    /// City alerts
    Alerts {
        /// Stay connected and print alerts as they arrive
        #[arg(long)]
        watch: bool,
    },
    /// Find civic services near a position
    Services {
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lon: Option<f64>,
        /// hospital | pharmacy | clinic | shelter | community-center
        #[arg(long)]
        kind: Option<ServiceKind>,
        /// Case-insensitive name/address filter
        #[arg(long, default_value = "")]
        query: String,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Print the profile
    Show,
    /// Update profile fields; a pincode triggers location autofill
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        address1: Option<String>,
        #[arg(long)]
        address2: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        pincode: Option<String>,
    },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Submit an incident report
    Incident {
        #[arg(long)]
        category: Category,
        #[arg(long)]
        location: String,
        #[arg(long)]
        description: String,
    },
    /// Submit a patient report
    Patient {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        condition: String,
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let mut session = Session::load()?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, &mut session, email, password).await
        }
        Commands::Register { email, password } => {
            commands::auth::register(&config, &mut session, email, password).await
        }
        Commands::Logout => commands::auth::logout(&mut session),
        Commands::Profile { command } => match command {
            ProfileCommands::Show => commands::profile::show(&config, &session).await,
            ProfileCommands::Update {
                name,
                phone,
                dob,
                address1,
                address2,
                city,
                state,
                country,
                pincode,
            } => {
                let update = ProfileUpdate {
                    name,
                    phone,
                    dob,
                    address1,
                    address2,
                    city,
                    state,
                    country,
                    pincode,
                };
                commands::profile::update(&config, &session, update).await
            }
        },
        Commands::Report { command } => match command {
            ReportCommands::Incident {
                category,
                location,
                description,
            } => commands::report::incident(&config, &session, category, location, description).await,
            ReportCommands::Patient {
                name,
                age,
                condition,
                location,
                description,
            } => {
                commands::report::patient(
                    &config, &session, name, age, condition, location, description,
                )
                .await
            }
        },
        Commands::Reports { patient } => commands::report::mine(&config, &session, patient).await,
        Commands::Drafts { clear } => {
            if clear {
                commands::report::clear_drafts(&session)
            } else {
                commands::report::drafts(&session)
            }
        }
        Commands::Alerts { watch } => {
            if watch {
                commands::alerts::watch(&config, &session).await
            } else {
                commands::alerts::list(&config, &session).await
            }
        }
        Commands::Services {
            lat,
            lon,
            kind,
            query,
        } => commands::services::near(&config, lat, lon, kind, query).await,
    }
}
