use clap::Parser;
use geispoint::config::cli::{CliArgs, Command};
use geispoint::utils::logger::{self, LogFormat};
use geispoint::{ErrorCategory, LookupError, LookupService};
use serde::Serialize;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let format = if args.json_logs { LogFormat::Json } else { LogFormat::Compact };
    logger::init(format, args.verbose);
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = run(&args).await {
        tracing::error!("Lookup failed: {} (category: {:?})", e, e.category());
        eprintln!("error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(args: &CliArgs) -> Result<(), LookupError> {
    let config = args.lookup_config()?;
    let service = LookupService::new(config)?;

    match &args.command {
        Command::Regions { country } => print_json(&service.get_regions(country.as_deref()).await?),
        Command::Cities { country, region } => {
            print_json(&service.get_cities(country.as_deref(), *region).await?)
        }
        Command::Point { gpid } => print_json(&service.get_point_detail(gpid).await?),
        Command::Search { zip, city, gpid } => print_json(
            &service
                .search_points(zip.as_deref(), city.as_deref(), gpid.as_deref())
                .await?,
        ),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), LookupError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(e: &LookupError) -> i32 {
    match e.category() {
        ErrorCategory::Configuration => 2,
        ErrorCategory::Validation => 3,
        ErrorCategory::NotFound => 4,
        ErrorCategory::Remote => 5,
        ErrorCategory::Cache => 6,
    }
}
