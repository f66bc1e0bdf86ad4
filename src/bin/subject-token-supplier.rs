use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use subject_token_supplier::config::loader;
use subject_token_supplier::server;
use subject_token_supplier::supplier::{build_supplier, SubjectTokenSupplier, SupplierContext};
use subject_token_supplier::utils::logging::{self, LogLevel};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "subject-token-supplier.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one subject token and print it to stdout
    Token {
        #[arg(long, default_value = "")]
        audience: String,
        #[arg(long, default_value = "")]
        subject_token_type: String,
    },
    /// Serve subject tokens over HTTP
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let service_config = loader::file_to_config(Path::new(&args.config)).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build supplier
    // -------------------------------

    let supplier = build_supplier(&service_config)?;

    // -------------------------------
    // 3. Run command
    // -------------------------------

    match args.command {
        Command::Token { audience, subject_token_type } => {
            let context = SupplierContext::new(audience, subject_token_type);
            let token = supplier.get_token(&context).await?;
            println!("{}", token);
        }
        Command::Serve => {
            info!("Service starting...");
            server::server::start(&service_config.settings, Arc::new(supplier)).await?;
        }
    }

    Ok(())
}
