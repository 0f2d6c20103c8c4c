//! `trustmesh init` — Write a default configuration file.

use clap::Args;
use std::path::Path;

use crate::config::TrustmeshConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    TrustmeshConfig::default().save(config_path)?;
    tracing::info!(path = %config_path.display(), "wrote default config");
    println!("Initialized TrustMesh configuration at {}", config_path.display());
    println!("Edit it to tune risk thresholds and logging.");

    Ok(())
}
