//! Clears projects and beneficiaries from the registry database.
//! User accounts are kept so the login still works afterwards.

use anyhow::{Context, Result};
use livelihood::infra::db::{Database, TableCounts};
use std::path::Path;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run()
}

pub fn run() -> Result<()> {
    let db_path = Database::default_path();

    if !db_path.exists() {
        println!("Database does not exist at: {}", db_path.display());
        println!("No reset needed.");
        return Ok(());
    }

    println!("Connecting to database at: {}", db_path.display());
    let db = Database::open_with(db_path.clone(), false)?;

    let before = db.counts()?;
    print_counts("Current record counts:", before);

    clear(&db)?;

    let after = db.counts()?;
    print_counts("\nAfter reset:", after);

    if after.projects == 0 && after.beneficiaries == 0 {
        println!("\nDatabase successfully reset! Projects and beneficiaries have been deleted.");
    } else {
        eprintln!("\nWarning: Some records still exist in the database.");
    }
    report_location(&db_path);

    Ok(())
}

/// Beneficiaries go first because they reference projects.
fn clear(db: &Database) -> Result<()> {
    let conn = db.connection();
    let conn = conn
        .lock()
        .map_err(|_| anyhow::anyhow!("database lock poisoned"))?;

    let removed = conn
        .execute("DELETE FROM beneficiaries", [])
        .context("clear beneficiaries")?;
    log::info!("Cleared {} beneficiaries", removed);

    let removed = conn
        .execute("DELETE FROM projects", [])
        .context("clear projects")?;
    log::info!("Cleared {} projects", removed);
    Ok(())
}

fn print_counts(heading: &str, counts: TableCounts) {
    println!("{heading}");
    println!("  Users: {}", counts.users);
    println!("  Projects: {}", counts.projects);
    println!("  Beneficiaries: {}", counts.beneficiaries);
}

fn report_location(path: &Path) {
    println!("Database location: {}", path.display());
}
