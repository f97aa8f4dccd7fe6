//! `frontdesk init`: create the data directory and database up front.

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use clap::Args;
use frontdesk::config::CONFIG_FILE_NAME;
use frontdesk::database::DATABASE_FILE_NAME;
use frontdesk::init::{init_data_dir, InitOptions, InitResult};
use frontdesk::programs::quiz::{QUESTIONS_FILE_NAME, RESULTS_FILE_NAME};
use frontdesk::programs::smarthome::DEVICES_FILE_NAME;
use std::path::Path;

/// Initialize the data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Drop and recreate an existing database
    #[arg(long)]
    pub overwrite: bool,

    /// Also write a commented config.yaml with every default
    #[arg(long)]
    pub with_config: bool,

    /// Print what would happen and change nothing
    #[arg(long)]
    pub dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--disable-autoinit` has no effect here.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;

        let lines = if self.dry_run {
            self.plan(&data_dir)
        } else {
            let result = init_data_dir(
                &InitOptions::new(data_dir)
                    .with_overwrite(self.overwrite)
                    .with_create_config(self.with_config),
            )?;
            self.report(&result)
        };
        for line in lines {
            println!("{line}");
        }
        Ok(())
    }

    fn report(&self, result: &InitResult) -> Vec<String> {
        let mut lines = vec![format!(
            "Initialized frontdesk in: {}",
            result.data_dir.display()
        )];
        if result.data_dir_created {
            lines.push("  - Created data directory".to_string());
        }
        if result.database_created {
            let verb = if self.overwrite { "Recreated" } else { "Created" };
            lines.push(format!("  - {verb} database"));
        }
        if result.config_created {
            lines.push("  - Created default configuration file".to_string());
        } else if self.with_config {
            lines.push("  - Configuration file already exists (not overwritten)".to_string());
        }
        lines
    }

    fn plan(&self, data_dir: &Path) -> Vec<String> {
        let mut lines = vec![
            "Dry-run mode: no changes will be made".to_string(),
            String::new(),
            format!("Would initialize frontdesk in: {}", data_dir.display()),
        ];
        if !data_dir.exists() {
            lines.push(format!("  - Create data directory: {}", data_dir.display()));
        }

        let db_path = data_dir.join(DATABASE_FILE_NAME);
        lines.push(match (db_path.exists(), self.overwrite) {
            (false, _) => format!("  - Create database: {}", db_path.display()),
            (true, true) => format!("  - Recreate database: {}", db_path.display()),
            (true, false) => format!(
                "  - Refuse: database already exists (use --overwrite): {}",
                db_path.display()
            ),
        });

        if self.with_config {
            let config_path = data_dir.join(CONFIG_FILE_NAME);
            lines.push(if config_path.exists() {
                format!("  - Keep existing configuration: {}", config_path.display())
            } else {
                format!("  - Write configuration: {}", config_path.display())
            });
        }

        let untouched: Vec<&str> = [DEVICES_FILE_NAME, QUESTIONS_FILE_NAME, RESULTS_FILE_NAME]
            .into_iter()
            .filter(|name| data_dir.join(name).exists())
            .collect();
        if !untouched.is_empty() {
            lines.push(format!("  - Leave program files as they are: {}", untouched.join(", ")));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn command(overwrite: bool, with_config: bool) -> InitCommand {
        InitCommand {
            overwrite,
            with_config,
            dry_run: true,
        }
    }

    #[test]
    fn test_plan_for_fresh_directory() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let plan = command(false, true).plan(&data_dir).join("\n");
        assert!(plan.contains("Create data directory"));
        assert!(plan.contains("Create database"));
        assert!(plan.contains("Write configuration"));
        assert!(!plan.contains("Leave program files"));
    }

    #[test]
    fn test_plan_for_existing_database() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(DATABASE_FILE_NAME), b"").unwrap();
        std::fs::write(dir.path().join(DEVICES_FILE_NAME), b"").unwrap();

        let refuse = command(false, false).plan(dir.path()).join("\n");
        assert!(refuse.contains("Refuse: database already exists"));
        assert!(refuse.contains("Leave program files as they are: devices.txt"));

        let recreate = command(true, false).plan(dir.path()).join("\n");
        assert!(recreate.contains("Recreate database"));
    }

    #[test]
    fn test_report_lines() {
        let result = InitResult {
            data_dir_created: false,
            database_created: true,
            config_created: false,
            data_dir: "/tmp/fd".into(),
        };
        let lines = command(true, true).report(&result);
        assert_eq!(
            lines,
            [
                "Initialized frontdesk in: /tmp/fd",
                "  - Recreated database",
                "  - Configuration file already exists (not overwritten)",
            ]
        );
    }
}
