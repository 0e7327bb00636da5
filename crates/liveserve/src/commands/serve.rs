//! `liveserve serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use liveserve_config::{CliSettings, Config};
use liveserve_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args, Default)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover liveserve.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to serve (overrides config).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (per-request and reload logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable live reload (default: enabled).
    #[arg(long)]
    live_reload: Option<bool>,

    /// Disable live reload.
    #[arg(long, conflicts_with = "live_reload")]
    no_live_reload: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Resolve flags before moving into CliSettings
        let live_reload_enabled = self.resolve_live_reload_enabled();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            root_dir: self.root,
            live_reload_enabled,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // The served directory must exist; a typo'd --root should fail
        // up front rather than as a stream of 404s
        if !config.site_resolved.root_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "Root directory does not exist: {}",
                config.site_resolved.root_dir.display()
            )));
        }

        // Print startup info
        output.info(&format!(
            "Serving {} on http://{}:{}",
            config.site_resolved.root_dir.display(),
            config.server.host,
            config.server.port
        ));

        if config.live_reload.enabled {
            output.info(&format!(
                "Live reload: enabled (watching {})",
                config.live_reload.watch_patterns.join(", ")
            ));
        } else {
            output.info("Live reload: disabled");
        }

        // Build server config and run
        let server_config = server_config_from_config(&config, self.verbose);
        run_server(server_config).await?;

        Ok(())
    }

    /// Resolve `live_reload_enabled` from --live-reload/--no-live-reload flags.
    fn resolve_live_reload_enabled(&self) -> Option<bool> {
        self.no_live_reload.then_some(false).or(self.live_reload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_live_reload_default_is_none() {
        let args = ServeArgs::default();
        assert_eq!(args.resolve_live_reload_enabled(), None);
    }

    #[test]
    fn test_resolve_live_reload_no_flag_wins() {
        let args = ServeArgs {
            no_live_reload: true,
            ..Default::default()
        };
        assert_eq!(args.resolve_live_reload_enabled(), Some(false));
    }

    #[test]
    fn test_resolve_live_reload_explicit_enable() {
        let args = ServeArgs {
            live_reload: Some(true),
            ..Default::default()
        };
        assert_eq!(args.resolve_live_reload_enabled(), Some(true));
    }
}
