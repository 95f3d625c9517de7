mod prompt;

use std::path::PathBuf;

use anyhow::Result;
use portal_export::pipeline::{self, ExportJob, ExportOutcome};
use portal_export::{sectors, LoginConfig, Session, Settings};
use prompt::Prompt;
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let settings = Settings::load()?;
    info!("Starting portal export with {:?}", settings);

    println!("Portal Export");
    println!("=============\n");

    let mut prompt = Prompt::new()?;
    let login_url = prompt.ask("Login URL: ")?;
    let username = prompt.ask("Username: ")?;
    let password = prompt.ask("Password: ")?;

    let mut login = LoginConfig::new(login_url.clone(), username, password)
        .with_method(settings.auth_method);
    let sectors_url = settings.sectors_url.clone().unwrap_or(login_url);
    let session = Session::new(settings)?;

    println!("\nLooking up available sectors...");
    if let Some(catalog) = sectors::discover(&session, &sectors_url) {
        println!("\nAvailable sectors:");
        for (name, id) in catalog.iter() {
            println!("- {} (ID: {})", name, id);
        }
        let choice = prompt.ask("\nSector name: ")?;
        match pipeline::resolve_sector(&catalog, &choice) {
            Some(id) => login.sector = Some(id),
            None => {
                println!("Sector not found!");
                return Ok(());
            }
        }
    }

    if !portal_export::auth::authenticate(&session, &login) {
        println!("Authentication failed!");
        return Ok(());
    }

    let target_url = prompt.ask("\nPage URL to extract: ")?;
    let output = prompt.ask("Output file (.docx): ")?;
    let job = ExportJob {
        target_url,
        output: PathBuf::from(output),
    };

    match pipeline::export_page(&session, &job) {
        ExportOutcome::Written(path) => println!("Export finished: {}", path.display()),
        ExportOutcome::ExtractionFailed => println!("Text extraction failed!"),
        ExportOutcome::WriteFailed => println!("Could not write the document!"),
        ExportOutcome::AuthenticationFailed => println!("Authentication failed!"),
    }
    Ok(())
}
