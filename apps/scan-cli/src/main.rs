//! # weft-scan: Receiving-Station CLI
//!
//! Terminal front-end for the WeftScan decode engine.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           weft-scan                                     │
//! │                                                                         │
//! │  classify / validate ──► weft-core only, no catalog needed             │
//! │                                                                         │
//! │  decode / explain / info                                                │
//! │        │                                                                │
//! │        ├─► ScanConfig      flags > environment > scan.toml              │
//! │        ├─► weft-catalog    load catalog, stack color overrides          │
//! │        └─► weft-core       decode, one JSON result per code             │
//! │                                                                         │
//! │  stdout: results only                stderr: logs                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exit Codes
//! - 0: success
//! - 1: error (no catalog, unreadable file, bad JSON)
//! - 2: `validate` saw a code matching no known format

mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use weft_catalog::{load_colors_path, load_path, CatalogFile};
use weft_core::{decode, expand, identify_vendor, is_valid_format, ColorMap, FabricInfo};

use crate::config::ScanConfig;
use crate::error::{CliError, CliResult};

/// Exit code for `validate` when the code matches no known format.
const EXIT_INVALID_FORMAT: u8 = 2;

// =============================================================================
// Command Line
// =============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "weft-scan",
    version,
    about = "Decode supplier roll-label codes at the receiving station"
)]
struct Cli {
    /// Catalog JSON file (overrides WEFT_CATALOG_PATH and scan.toml)
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Color override JSON file (dye code to name)
    #[arg(long, global = true, value_name = "FILE")]
    colors: Option<PathBuf>,

    /// Alternate scan.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode label codes, one JSON result per line
    Decode {
        /// Codes as scanned or typed
        #[arg(required = true)]
        codes: Vec<String>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Name the vendor a code's shape points at, catalog-free
    Classify { code: String },

    /// Exit 0 if the code matches a known label format, 2 if not
    Validate { code: String },

    /// Walk a code through the pipeline and show every step
    Explain { code: String },

    /// Summarize the loaded catalog
    Info,
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    match &cli.command {
        // Shape-only commands, catalog never touched
        Command::Classify { code } => {
            println!("{}", identify_vendor(code));
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { code } => {
            if is_valid_format(code) {
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::from(EXIT_INVALID_FORMAT))
            }
        }
        Command::Decode { codes, pretty } => {
            let station = Station::load(&cli)?;
            station.decode_all(codes, *pretty)
        }
        Command::Explain { code } => {
            let station = Station::load(&cli)?;
            station.explain(code);
            Ok(ExitCode::SUCCESS)
        }
        Command::Info => {
            let station = Station::load(&cli)?;
            station.info();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs on stderr so stdout carries nothing but results.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - show everything
/// - `RUST_LOG=weft_core=trace` - trace the engine only
/// - Default: INFO overall, DEBUG for the weft crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,weft_core=debug,weft_catalog=debug,weft_scan=debug")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Station
// =============================================================================

/// A loaded catalog plus merged colors: everything one receiving spot needs.
struct Station {
    file: CatalogFile,
    colors: ColorMap,
    pretty_default: bool,
}

impl Station {
    /// Resolve paths (flags > environment > scan.toml), load the catalog,
    /// and stack any color override file on top of the file's own colors.
    fn load(cli: &Cli) -> CliResult<Self> {
        let config = ScanConfig::load_or_default(cli.config.clone());

        let catalog_path = cli
            .catalog
            .clone()
            .or_else(|| config.catalog.path.clone())
            .ok_or(CliError::MissingCatalog)?;
        let file = load_path(&catalog_path)?;
        info!(
            path = %catalog_path.display(),
            products = file.products,
            "catalog loaded"
        );

        let mut colors = file.colors.clone();
        if let Some(path) = cli.colors.clone().or_else(|| config.colors.path.clone()) {
            let overrides = load_colors_path(&path)?;
            info!(
                path = %path.display(),
                entries = overrides.len(),
                "color overrides loaded"
            );
            colors.extend(overrides);
        }

        Ok(Self {
            file,
            colors,
            pretty_default: config.output.pretty,
        })
    }

    fn decode_all(&self, codes: &[String], pretty: bool) -> CliResult<ExitCode> {
        let pretty = pretty || self.pretty_default;
        for code in codes {
            let result = decode(code, &self.file.catalog, &self.colors);
            let line = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{line}");
        }
        Ok(ExitCode::SUCCESS)
    }

    /// Bench-debug report: every intermediate the pipeline produces for one
    /// code, printed as plain text.
    fn explain(&self, code: &str) {
        let trimmed = code.trim();
        println!("code:      {trimmed}");
        println!("vendor:    {}", identify_vendor(trimmed));
        println!("valid:     {}", is_valid_format(trimmed));

        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        println!(
            "digits:    {:?} (zeroless {:?})",
            digits,
            digits.trim_start_matches('0')
        );
        println!("variants:  {} probe forms", expand(trimmed).len());

        match self.file.catalog.find(trimmed) {
            Some(record) => println!("catalog:   {} / {}", record.erp_code, record.erp_name),
            None => println!("catalog:   no record"),
        }

        let result = decode(trimmed, &self.file.catalog, &self.colors);
        println!("pattern:   {}", result.matched_pattern);
        println!("quantity:  {} m", result.quantity);
        if !result.color.is_empty() {
            println!("color:     {}", result.color);
        }
        println!("erp code:  {}", result.erp_code);
        println!("erp name:  {}", result.erp_name);

        let description = if result.vendor_product.is_empty() {
            &result.erp_name
        } else {
            &result.vendor_product
        };
        let fabric = FabricInfo::parse(description);
        if let Some(width) = fabric.width_m {
            println!("width:     {width} m");
        }
        if let Some(composition) = &fabric.composition {
            println!("fiber:     {composition}");
        }
        if let Some(grammage) = fabric.grammage {
            println!("grammage:  {grammage} g/m2");
        }
    }

    fn info(&self) {
        let stats = self.file.catalog.index_stats();
        println!("products:   {}", self.file.products);
        println!("indexed:    {} records, {} variants", stats.records, stats.variants);
        println!(
            "skipped:    {} rows at load, {} at index",
            self.file.skipped, stats.skipped
        );
        println!("colors:     {}", self.colors.len());
        println!("loaded at:  {}", self.file.loaded_at);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_decode_flags() {
        let cli = Cli::try_parse_from([
            "weft-scan",
            "--catalog",
            "cat.json",
            "decode",
            "147100.50.SDE100",
            "--pretty",
        ])
        .unwrap();

        assert_eq!(cli.catalog.as_deref(), Some(Path::new("cat.json")));
        match cli.command {
            Command::Decode { codes, pretty } => {
                assert_eq!(codes, vec!["147100.50.SDE100"]);
                assert!(pretty);
            }
            other => panic!("parsed wrong command: {other:?}"),
        }
    }

    #[test]
    fn test_decode_requires_codes() {
        assert!(Cli::try_parse_from(["weft-scan", "decode"]).is_err());
    }

    #[test]
    fn test_global_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["weft-scan", "info", "--catalog", "cat.json"]).unwrap();
        assert_eq!(cli.catalog.as_deref(), Some(Path::new("cat.json")));
    }

    #[test]
    fn test_station_load_merges_color_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        std::fs::write(
            &catalog_path,
            r#"{
                "products": {
                    "147100": {"erpCode": "9109", "erpName": "OXFORDINE", "vendor": "TESSUTO"}
                },
                "colors": {"103": "file color"}
            }"#,
        )
        .unwrap();
        let colors_path = dir.path().join("colors.json");
        std::fs::write(&colors_path, r#"{"103": "override color"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "weft-scan",
            "--catalog",
            catalog_path.to_str().unwrap(),
            "--colors",
            colors_path.to_str().unwrap(),
            "info",
        ])
        .unwrap();

        let station = Station::load(&cli).unwrap();
        assert_eq!(station.file.products, 1);
        // The override file wins over the catalog's own colors
        assert_eq!(station.colors.get("103"), Some("override color"));

        let result = decode(
            "0000000147100.0000050000.000SDE103",
            &station.file.catalog,
            &station.colors,
        );
        assert_eq!(result.erp_code, "9109");
        assert_eq!(result.color, "override color");
    }

    #[test]
    fn test_station_load_without_catalog_errors() {
        // Point --config at an absent file so only flags could name a catalog
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "weft-scan",
            "--config",
            dir.path().join("none.toml").to_str().unwrap(),
            "info",
        ])
        .unwrap();

        assert!(matches!(
            Station::load(&cli),
            Err(CliError::MissingCatalog),
        ));
    }
}
