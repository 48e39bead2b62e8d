use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::reference_data::ReferenceData;
use crate::row_builder::{build_row, RowKind, RowSelector, INVALID_CATEGORIES};

pub const HEADER: [&str; 11] = [
    "Reference ID",
    "Source Account",
    "Source Account Name",
    "Source Bank Code",
    "Beneficiary Account",
    "Beneficiary Account Name",
    "Beneficiary Bank Code",
    "Currency",
    "Amount",
    "Transaction Type",
    "Note",
];

pub const PROGRESS_INTERVAL: u64 = 10_000;

/// Tally of what was actually written.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub valid: u64,
    pub invalid: u64,
    pub by_kind: HashMap<RowKind, u64>,
}

impl GenerationSummary {
    fn record(&mut self, kind: RowKind) {
        if kind == RowKind::Valid {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
        *self.by_kind.entry(kind).or_insert(0) += 1;
    }

    pub fn count(&self, kind: RowKind) -> u64 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

fn csv_writer<W: io::Write>(sink: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink)
}

/// Writes the header and rows `1..=rows` to `sink` as CSV, quoting only where needed.
pub fn write_transactions<W: io::Write, R: Rng>(
    sink: W,
    rows: u64,
    selector: &RowSelector,
    reference: &ReferenceData,
    rng: &mut R,
) -> Result<GenerationSummary, GeneratorError> {
    // The header is written by hand so that an empty run still gets one.
    let mut writer = csv_writer(sink);
    writer.write_record(HEADER)?;

    let mut summary = GenerationSummary::default();
    for index in 1..=rows {
        let kind = selector.select(rng);
        let row = build_row(rng, reference, kind, index);
        writer.serialize(&row)?;
        summary.record(kind);

        if index % PROGRESS_INTERVAL == 0 {
            println!("  {:>7} / {} rows written ...", index, rows);
        }
    }

    writer.flush()?;
    Ok(summary)
}

/// Generates the file described by `config`, printing the plan, progress and a summary to stdout.
pub fn generate_csv_file(config: &GeneratorConfig, reference: &ReferenceData) -> Result<GenerationSummary, GeneratorError> {
    let selector = RowSelector::new(config.invalid_rate)?;
    let mut rng = match config.seed {
        Some(seed) => {
            debug!("Seeding generator with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => {
            debug!("No seed given, seeding generator from entropy");
            StdRng::from_entropy()
        }
    };

    if let Some(parent) = config.out.parent() {
        if !parent.as_os_str().is_empty() {
            debug!("Creating output directory {}", parent.display());
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(&config.out)?;

    let invalid_rate = selector.invalid_rate();
    let expected_invalid = (config.rows as f64 * invalid_rate) as u64;
    let expected_valid = config.rows - expected_invalid;

    println!("Generating {} rows -> {}", config.rows, config.out.display());
    println!("  valid rows  : ~{}  ({:.0}%)", expected_valid, 100.0 - invalid_rate * 100.0);
    println!("  invalid rows: ~{}  ({:.0}%)", expected_invalid, invalid_rate * 100.0);
    let breakdown: Vec<String> = INVALID_CATEGORIES
        .iter()
        .map(|(kind, weight)| format!("{:.0}% {}", weight * 100.0, kind))
        .collect();
    println!("  invalid breakdown: {}", breakdown.join(", "));
    println!();

    let summary = write_transactions(file, config.rows, &selector, reference, &mut rng)?;

    println!();
    println!("Done - {}", config.out.display());
    println!("  actual valid  : {}", summary.valid);
    println!("  actual invalid: {}", summary.invalid);
    for (kind, _) in INVALID_CATEGORIES {
        println!("    {:<22}: {}", kind.to_string(), summary.count(kind));
    }

    Ok(summary)
}
