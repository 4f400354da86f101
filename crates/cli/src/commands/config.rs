use anyhow::Result;
use application::bootstrap::storage_path;
use clap::{Args, Subcommand};
use domain::config::ProofreaderConfig;
use infrastructure::config::{ConfigLoader, ConfigSource, ConfigValidator};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Print an example configuration file
    #[command(alias = "gen")]
    Generate {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },

    /// Validate the current configuration
    #[command(alias = "check")]
    Validate,

    /// Show the effective configuration, environment overrides included
    Show,

    /// Print where segments and settings are stored
    Path,

    /// Write the default configuration to a file
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = "proofreader.toml")]
        output: PathBuf,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub async fn execute(
        &self,
        loader: &ConfigLoader,
        config: &ProofreaderConfig,
        source: &ConfigSource,
    ) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Generate { format } => self.generate_config(format),
            ConfigSubcommand::Validate => self.validate_config(config, source),
            ConfigSubcommand::Show => self.show_config(config, source),
            ConfigSubcommand::Path => {
                println!("{}", storage_path(config).display());
                Ok(())
            }
            ConfigSubcommand::Init { output, force } => {
                self.init_config(loader, output, *force).await
            }
        }
    }

    fn generate_config(&self, format: &str) -> Result<()> {
        let example_config = ConfigLoader::generate_example_config();

        let content = if format == "json" {
            let config: ProofreaderConfig = toml::from_str(&example_config)?;
            serde_json::to_string_pretty(&config)?
        } else {
            example_config
        };

        println!("{content}");
        Ok(())
    }

    fn validate_config(&self, config: &ProofreaderConfig, source: &ConfigSource) -> Result<()> {
        info!("Validating configuration from {}", source);

        match ConfigValidator::new().validate(config) {
            Ok(()) => {
                println!("✅ Configuration is valid ({source})");
                Ok(())
            }
            Err(e) => {
                println!("❌ Configuration validation failed:");
                println!("   {e}");
                Err(e)
            }
        }
    }

    fn show_config(&self, config: &ProofreaderConfig, source: &ConfigSource) -> Result<()> {
        println!("# Loaded from {source}, PROOFREADER_* environment overrides applied");
        println!("{}", toml::to_string_pretty(config)?);
        Ok(())
    }

    async fn init_config(&self, loader: &ConfigLoader, output: &Path, force: bool) -> Result<()> {
        if output.exists() && !force {
            warn!("Configuration file already exists");
            println!("❌ Configuration file already exists at {}", output.display());
            println!("   Use --force to overwrite");
            return Ok(());
        }

        loader
            .save_config(&ProofreaderConfig::default(), output)
            .await?;

        println!("✅ Configuration written to {}", output.display());
        println!("🔧 Next steps:");
        println!("   1. Run 'proofreader set-key' to store your Google Gemini API key");
        println!("   2. Adjust the model, retry and throttle settings if needed");
        println!("   3. Run 'proofreader config validate' to check your configuration");

        Ok(())
    }
}
