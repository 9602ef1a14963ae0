//! `init` command - write a starter project configuration

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::config::{loader, EngineConfig};
use crate::error::CodewardenError;
use crate::exit_codes;
use crate::rules::Severity;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to write the configuration into
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: InitArgs) -> Result<i32, CodewardenError> {
    let target = args.path.join(loader::PROJECT_CONFIG_FILENAME);

    if target.exists() && !args.force {
        eprintln!(
            "{} {} already exists (use --force to overwrite)",
            "error:".red().bold(),
            target.display()
        );
        return Ok(exit_codes::ERROR);
    }

    let config = EngineConfig {
        fail_on_severity: Some(Severity::High),
        ..Default::default()
    };

    loader::save(&config, &target)?;

    println!("{} wrote {}", "✓".green().bold(), target.display());
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_config() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        let code = execute(args).await.unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        let written = dir.path().join(loader::PROJECT_CONFIG_FILENAME);
        assert!(written.exists());
        let content = std::fs::read_to_string(written).unwrap();
        assert!(content.contains("fail_on_severity"));
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join(loader::PROJECT_CONFIG_FILENAME);
        std::fs::write(&target, "# existing\n").unwrap();

        let code = execute(InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        })
        .await
        .unwrap();

        assert_eq!(code, exit_codes::ERROR);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "# existing\n");
    }

    #[tokio::test]
    async fn test_init_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join(loader::PROJECT_CONFIG_FILENAME);
        std::fs::write(&target, "# existing\n").unwrap();

        let code = execute(InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        })
        .await
        .unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        assert!(std::fs::read_to_string(&target)
            .unwrap()
            .contains("fail_on_severity"));
    }
}
