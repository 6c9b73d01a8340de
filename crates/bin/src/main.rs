use std::fs;
use std::io::Write;

use clap::Parser;
use jotdb::{Session, Value, backend::InMemory};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands, ExportArgs, GetArgs, InitArgs};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("jotdb=info".parse().unwrap()),
        )
        .init();

    match Cli::parse().command {
        Commands::Init(args) => init(args),
        Commands::Export(args) => export(args),
        Commands::Get(args) => get(args),
    }
}

fn init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let root = match &args.json_file {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Value::from_json(&serde_json::from_str(&text)?)
        }
        None => Value::empty_map(),
    };

    // A fresh backend bound to the target path: init replaces any existing
    // store file on flush.
    let backend = InMemory::bound_to_file(&args.store);
    let session = Session::init(Box::new(backend), root)?;
    session.close()?;
    tracing::info!("initialized store at {}", args.store.display());
    Ok(())
}

fn export(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = InMemory::load_from_file(&args.store)?;
    let session = Session::open_readonly(Box::new(backend))?;
    let json = session.export()?.to_json();
    let text = serde_json::to_string_pretty(&json)?;

    match &args.json_file {
        Some(path) => fs::write(path, text + "\n")?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(())
}

fn get(args: GetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = InMemory::load_from_file(&args.store)?;
    let session = Session::open_readonly(Box::new(backend))?;

    let mut reference = session.root();
    for segment in args.path.split('.').filter(|s| !s.is_empty()) {
        reference = reference.as_map()?.get(segment)?;
    }

    let json = reference.materialize()?.to_json();
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
