mod cli;
mod commands;
mod config;
mod logging;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use config::{AppConfig, DetectorChoice, ResolvedConfig};
use vehicle_inspect_adapters::{
    FixtureDamageDetector, HttpDamageDetector, ImageCrateRaster, SqliteInspectionRepository,
    SystemClock, UuidIdGenerator, WalkdirPhotoScanner,
};
use vehicle_inspect_application::{BootstrapStoreCommand, DamageDetector, InspectionService};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.catalog);
    let resolved = config.resolve()?;

    let service = build_inspection_service(resolved)?;
    service
        .bootstrap_store(BootstrapStoreCommand)
        .context("failed to bootstrap vehicle-inspect")?;

    commands::run(cli.command, &service)
}

fn build_inspection_service(config: ResolvedConfig) -> Result<InspectionService> {
    let detector: Box<dyn DamageDetector> = match config.detector {
        DetectorChoice::Http(http) => {
            Box::new(HttpDamageDetector::new(http).context("failed to build detector client")?)
        }
        DetectorChoice::Fixture(path) => Box::new(
            FixtureDamageDetector::from_path(&path).context("failed to load detector fixture")?,
        ),
    };

    Ok(InspectionService::new(
        Box::new(SqliteInspectionRepository::new(config.catalog_path)),
        detector,
        Box::new(ImageCrateRaster),
        Box::new(WalkdirPhotoScanner),
        Box::new(SystemClock),
        Box::new(UuidIdGenerator),
        config.service,
    ))
}
