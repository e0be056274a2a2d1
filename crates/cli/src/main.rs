use std::fs::File;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::{debug, LevelFilter};

use aws_control_cli::app;
use aws_control_cli::cli_args::Args;
use aws_control_cli::jobs::JobRunner;
use aws_control_cli::menu::AppContext;
use aws_control_core::aws::LambdaConnector;
use aws_control_core::config;
use aws_control_core::error::{Error, Result};
use aws_control_core::settings::get_settings;

/// Where log records go. The terminal belongs to the menu, so without a file they are dropped.
fn log_target(log_file: Option<&str>) -> Result<Target> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| Error::io_error("log".to_string(), path.to_string(), e))?;
            Ok(Target::Pipe(Box::new(file)))
        }
        None => Ok(Target::Pipe(Box::new(io::sink()))),
    }
}

fn init_logging(log_file: Option<&str>) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if log_file.is_none() {
        builder.filter_level(LevelFilter::Off);
    }
    builder.target(log_target(log_file)?);
    builder.init();
    Ok(())
}

fn execute() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let settings_path = config::get_settings_path(&args.settings_path);
    debug!("Settings path: `{settings_path}`");
    let settings = get_settings(&settings_path)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let runner = JobRunner::new(runtime.handle().clone(), Arc::new(LambdaConnector::default()));

    let ctx = AppContext {
        settings,
        settings_path,
        target_runtime: args.target_runtime,
        report_mode: args.report.into(),
    };

    app::run(ctx, runner)
}

fn main() -> ExitCode {
    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_log_target_never_writes_to_the_terminal() {
        let target = log_target(None).unwrap();
        assert!(matches!(target, Target::Pipe(_)));
    }

    #[test]
    fn test_log_target_creates_the_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("awsc.log");

        let target = log_target(path.to_str()).unwrap();

        assert!(matches!(target, Target::Pipe(_)));
        assert!(path.exists());
    }

    #[test]
    fn test_log_target_reports_unwritable_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("awsc.log");

        assert!(log_target(path.to_str()).is_err());
    }
}
