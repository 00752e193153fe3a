//! Livelihood registry CLI entry point.
//!
//! Manages projects and their beneficiaries in a local SQLite database.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use livelihood::application::registry::Registry;
use livelihood::commands::{self, BeneficiaryForm};
use livelihood::domain::{BeneficiaryId, ProjectId, RegistryError};
use livelihood::infra::app_config::{self, AppConfig};
use livelihood::infra::db::Database;

#[derive(Parser, Debug)]
#[command(name = "livelihood")]
#[command(version)]
#[command(about = "Livelihood program project and beneficiary registry", long_about = None)]
struct Cli {
    /// Database file to use instead of the configured location
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Configuration file to read
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a username and password against the users table
    Login {
        username: String,
        password: String,
    },

    /// Show the database location and record counts
    Status,

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage beneficiaries
    #[command(subcommand)]
    Beneficiary(BeneficiaryCommand),
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// List projects
    List {
        /// Only show projects containing this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one project
    Show { id: ProjectId },
    /// Add a project
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
    },
    /// Edit a project; omitted fields keep their current value
    Edit {
        id: ProjectId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a project with no assigned beneficiaries
    Delete {
        id: ProjectId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List the accepted categories
    Categories,
}

#[derive(Subcommand, Debug)]
enum BeneficiaryCommand {
    /// List beneficiaries with their project names
    List {
        /// Only show beneficiaries containing this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one beneficiary
    Show { id: BeneficiaryId },
    /// Add a beneficiary
    Add(BeneficiaryFields),
    /// Edit a beneficiary; omitted fields keep their current value
    Edit {
        id: BeneficiaryId,
        #[command(flatten)]
        fields: BeneficiaryFields,
    },
    /// Delete a beneficiary
    Delete {
        id: BeneficiaryId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct BeneficiaryFields {
    #[arg(long)]
    lname: Option<String>,
    #[arg(long)]
    fname: Option<String>,
    #[arg(long)]
    mname: Option<String>,
    /// SR., JR., II, "III, IV, V, etc." or - for none
    #[arg(long)]
    suffix: Option<String>,
    /// MALE, FEMALE, OTHER or - for none
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    barangay: Option<String>,
    #[arg(long = "contact")]
    contactno: Option<String>,
    /// Project id the beneficiary belongs to
    #[arg(long = "project")]
    project_id: Option<ProjectId>,
}

impl From<BeneficiaryFields> for BeneficiaryForm {
    fn from(fields: BeneficiaryFields) -> Self {
        BeneficiaryForm {
            lname: fields.lname,
            fname: fields.fname,
            mname: fields.mname,
            suffix: fields.suffix,
            gender: fields.gender,
            street: fields.street,
            barangay: fields.barangay,
            contactno: fields.contactno,
            project_id: fields.project_id,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => report(&err),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn open_database(db: Option<PathBuf>, config: Option<PathBuf>) -> Result<Database> {
    let config: AppConfig = match config {
        Some(path) => app_config::load_config_from(path),
        None => app_config::load_config(),
    };
    let path = db.unwrap_or_else(|| Database::resolve_path(&config));
    Database::open_with(path, config.seed_admin)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let db = open_database(cli.db, cli.config).context("Failed to open database")?;
    let registry = Registry::new(&db);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Login { username, password } => {
            if !commands::login(&registry, &username, &password, &mut out)? {
                return Ok(ExitCode::from(2));
            }
        }
        Commands::Status => {
            commands::status(&registry, &db.describe(), db.counts()?, &mut out)?;
        }
        Commands::Project(cmd) => match cmd {
            ProjectCommand::List { search, json } => {
                commands::list_projects(&registry, &search, json, &mut out)?;
            }
            ProjectCommand::Show { id } => commands::show_project(&registry, id, &mut out)?,
            ProjectCommand::Add { name, category } => {
                commands::save_project(&registry, None, Some(&name), Some(&category), &mut out)?;
            }
            ProjectCommand::Edit { id, name, category } => {
                commands::save_project(
                    &registry,
                    Some(id),
                    name.as_deref(),
                    category.as_deref(),
                    &mut out,
                )?;
            }
            ProjectCommand::Delete { id, yes } => {
                if yes || confirm(&format!("Delete project {id}?"))? {
                    commands::delete_project(&registry, id, &mut out)?;
                }
            }
            ProjectCommand::Categories => commands::list_categories(&mut out)?,
        },
        Commands::Beneficiary(cmd) => match cmd {
            BeneficiaryCommand::List { search, json } => {
                commands::list_beneficiaries(&registry, &search, json, &mut out)?;
            }
            BeneficiaryCommand::Show { id } => {
                commands::show_beneficiary(&registry, id, &mut out)?;
            }
            BeneficiaryCommand::Add(fields) => {
                commands::save_beneficiary(&registry, None, &fields.into(), &mut out)?;
            }
            BeneficiaryCommand::Edit { id, fields } => {
                commands::save_beneficiary(&registry, Some(id), &fields.into(), &mut out)?;
            }
            BeneficiaryCommand::Delete { id, yes } => {
                if yes || confirm(&format!("Delete beneficiary {id}?"))? {
                    commands::delete_beneficiary(&registry, id, &mut out)?;
                }
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

/// Print the failure and pick an exit code: 2 for rejected input, 3 for a
/// missing or still-referenced record, 1 otherwise.
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<RegistryError>() {
        Some(RegistryError::Validation(reason)) => {
            eprintln!("{reason}");
            ExitCode::from(2)
        }
        Some(registry_err) if registry_err.is_user_correctable() => {
            eprintln!("Error: {registry_err}");
            ExitCode::from(3)
        }
        _ => {
            log::error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}
