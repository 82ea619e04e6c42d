//! `scribe health` command implementation.

use clap::Args;

use super::ProviderArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the health command.
#[derive(Args)]
pub(crate) struct HealthArgs {
    #[command(flatten)]
    providers: ProviderArgs,

    /// Print the health report as JSON.
    #[arg(long)]
    json: bool,
}

impl HealthArgs {
    /// Probe every configured provider and report.
    ///
    /// Exits with an error when the primary is unhealthy and no enabled
    /// fallback is healthy.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.providers.load_config()?;
        let factory = super::build_factory(&config)?;

        let report = factory.health_report().await;

        if self.json {
            output.emit(&serde_json::to_string_pretty(&report)?)?;
        } else {
            if let Some(path) = &config.config_path {
                output.info(&format!("Config: {}", path.display()));
            }
            for (name, health) in &report.providers {
                output.health(name, &health.check);
            }
            if report.fallback.is_some() && !report.enable_fallback {
                output.warning("Failover: disabled");
            }
        }

        let usable = |name: &str| {
            report
                .providers
                .get(name)
                .is_some_and(|health| !health.check.is_unhealthy())
        };
        let fallback_usable = report.enable_fallback
            && report.fallback.as_deref().is_some_and(usable);
        if usable(&report.primary) || fallback_usable {
            Ok(())
        } else {
            Err(CliError::Validation("no healthy provider available".to_owned()))
        }
    }
}
