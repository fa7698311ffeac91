use crate::config::LookupConfig;
use crate::utils::error::{LookupError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "geispoint")]
#[command(about = "Look up GeisPoint pickup points, regions and cities")]
pub struct CliArgs {
    /// TOML configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Service endpoint, overrides the configuration file
    #[arg(long, env = "GEISPOINT_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List regions of a country
    Regions {
        #[arg(long)]
        country: Option<String>,
    },
    /// List cities of a region
    Cities {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        region: Option<i64>,
    },
    /// Show one pickup point
    Point { gpid: String },
    /// Search pickup points
    Search {
        #[arg(long)]
        zip: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        gpid: Option<String>,
    },
}

impl CliArgs {
    pub fn lookup_config(&self) -> Result<LookupConfig> {
        let mut config = match (&self.config, &self.endpoint) {
            (Some(path), _) => LookupConfig::from_file(path)?,
            (None, Some(endpoint)) => LookupConfig::new(endpoint.clone()),
            (None, None) => {
                return Err(LookupError::config(
                    "either --config or --endpoint (GEISPOINT_ENDPOINT) is required",
                ))
            }
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_only() {
        let args = CliArgs::parse_from(["geispoint", "--endpoint", "https://gp.example.com/soap", "regions"]);
        let config = args.lookup_config().unwrap();

        assert_eq!(config.endpoint, "https://gp.example.com/soap");
        assert!(matches!(args.command, Command::Regions { country: None }));
    }

    #[test]
    fn test_search_filters() {
        let args = CliArgs::parse_from([
            "geispoint",
            "--endpoint",
            "https://gp.example.com/soap",
            "search",
            "--city",
            "Brno",
        ]);

        match args.command {
            Command::Search { zip, city, gpid } => {
                assert!(zip.is_none());
                assert_eq!(city.as_deref(), Some("Brno"));
                assert!(gpid.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
