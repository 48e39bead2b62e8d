use clap::Parser;
use log::debug;
use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::reference_data::ReferenceData;

mod config;
mod csv_handler;
mod error;
mod reference_data;
mod row_builder;

fn main() -> Result<(), GeneratorError> {
    env_logger::init();
    let config = GeneratorConfig::parse();
    debug!("Running with {:?}", config);

    let reference = ReferenceData::seeded()?;
    csv_handler::generate_csv_file(&config, &reference)?;
    Ok(())
}
