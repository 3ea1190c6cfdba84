//! A command-line application to extract material properties from
//! Abaqus-style `.inp` input decks and export them to JSON and CSV.

#![allow(clippy::needless_return)] // i'll never forgive rust for this
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use inp::prelude::*;
use log::*;
use mat_csv::prelude::*;

/// Indent unit for the extraction summary.
const INDENT: &str = "  ";

/// The arguments passed to the extractor.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Cli {
  /// Path to write the hierarchical JSON export to.
  #[arg(short = 'j', long = "json", default_value = "material_properties.json")]
  json: PathBuf,
  /// Path to write the flat CSV export to.
  #[arg(short = 'c', long = "csv", default_value = "material_properties.csv")]
  csv: PathBuf,
  /// Skip the JSON export.
  #[arg(long = "no-json")]
  no_json: bool,
  /// Skip the CSV export.
  #[arg(long = "no-csv")]
  no_csv: bool,
  /// The delimiter used in the CSV.
  #[arg(short = 'd', long = "delim", default_value = ",")]
  delim: char,
  /// Output extra/debug info while parsing and converting.
  #[arg(short = 'v', long = "verbose")]
  verbose: bool,
  /// The name of the input deck. If -, reads from standard input.
  input: PathBuf
}

fn main() -> io::Result<()> {
  // init cli stuff
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  // parse the deck
  let set: MaterialSet = if args.input.as_os_str().eq_ignore_ascii_case("-") {
    DeckParser::parse_reader(io::stdin())?
  } else if args.input.is_file() {
    if let Some(bn) = args.input.file_name().and_then(|s| s.to_str()) {
      info!("Parsing {}...", bn);
    } else {
      info!("Parsing...");
    }
    DeckParser::parse_file(&args.input)?
  } else {
    error!("Provided path either does not exist or is not a file!");
    std::process::exit(1);
  };
  info!("Done parsing.");
  // summarise what we found
  if set.is_empty() {
    warn!("No materials found in the deck.");
    warn!("Check that it contains *MATERIAL definitions.");
  } else {
    info!("Found {} material(s):", set.len());
    log_summary(&set);
  }
  // hierarchical export
  if !args.no_json {
    set.save_json(&args.json)?;
    info!("Material properties saved to: {}", args.json.display());
  }
  // flat export
  if !args.no_csv {
    let records = to_records(&set);
    if records.is_empty() {
      warn!("No data to write to the CSV.");
    } else {
      let delim_byte: u8 = args.delim.try_into()
        .expect("Delimiter must not be a special character!");
      let width = max_width(&records);
      let out = BufWriter::new(File::create(&args.csv)?);
      let mut wtr = csv::WriterBuilder::new()
        .delimiter(delim_byte)
        .from_writer(out);
      wtr.write_record(headers(width))?;
      for rec in records.iter() {
        wtr.write_record(rec.to_fields(width))?;
      }
      wtr.flush()?;
      info!("Material properties saved to: {}", args.csv.display());
    }
  }
  // done
  return Ok(());
}

/// Logs a per-material breakdown of the extracted properties.
fn log_summary(set: &MaterialSet) {
  for (name, props) in set.iter() {
    info!("- Material \"{}\":", name);
    if props.is_empty() {
      info!("{}(no properties found)", INDENT);
    }
    for (key, value) in props.iter() {
      match value {
        PropertyValue::Rows(rows) => {
          info!("{}- {}: {} row(s)", INDENT, key, rows.len());
        },
        scalar => {
          info!("{}- {}: {}", INDENT, key, scalar);
        }
      };
    }
  }
}
