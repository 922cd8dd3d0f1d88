//! Batch report evaluation to JSON
//!
//! Reads a JSON file of raw reports, groups them per station, evaluates
//! every station through the full pipeline, and prints the assessment
//! records to stdout.
//!
//! Usage:
//!   cargo run --bin metops-eval -- --reports reports.json
//!   cargo run --bin metops-eval -- --reports reports.json \
//!       --runways runways.toml --minima minima.toml --pretty
//!
//! Input format:
//!   [{"kind": "METAR", "station": "ENGM", "text": "ENGM 241200Z ..."},
//!    {"kind": "TAF",   "station": "ENGM", "text": "TAF ENGM ..."}]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

use metops::{
    evaluate_batch, MinimaTable, RawReport, ReportKind, RunwayTable, StationAssessment,
    StationReports,
};

#[derive(Parser, Debug)]
#[command(
    name = "metops-eval",
    about = "Evaluate METAR/TAF reports into severity, alerts, and OM advisories"
)]
struct Args {
    /// JSON file of raw reports ([{kind, station, text}, ...])
    #[arg(long)]
    reports: PathBuf,

    /// Optional runway geometry table (.toml or .json)
    #[arg(long)]
    runways: Option<PathBuf>,

    /// Optional approach minima table (.toml or .json)
    #[arg(long)]
    minima: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

/// One raw report as it appears in the input file
#[derive(Debug, Deserialize)]
struct ReportInput {
    kind: ReportKind,
    station: String,
    text: String,
}

/// Top-level output document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    evaluated_at: DateTime<Utc>,
    stations: Vec<StationAssessment>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let contents = std::fs::read_to_string(&args.reports)
        .with_context(|| format!("reading reports file {}", args.reports.display()))?;
    let inputs: Vec<ReportInput> =
        serde_json::from_str(&contents).context("parsing reports file")?;

    let runways = args
        .runways
        .as_deref()
        .map(RunwayTable::load_from_file)
        .transpose()?;
    let minima = args
        .minima
        .as_deref()
        .map(MinimaTable::load_from_file)
        .transpose()?;

    // Group reports per station; the last METAR/TAF per station wins.
    let mut grouped: BTreeMap<String, StationReports> = BTreeMap::new();
    for input in inputs {
        let report = RawReport::new(input.kind, &input.station, &input.text)
            .with_context(|| format!("invalid report for station {:?}", input.station))?;
        let entry = grouped
            .entry(report.station().to_string())
            .or_insert_with(|| StationReports {
                metar: None,
                taf: None,
            });
        match report.kind() {
            ReportKind::Metar => entry.metar = Some(report),
            ReportKind::Taf => entry.taf = Some(report),
        }
    }

    let items: Vec<StationReports> = grouped.into_values().collect();
    let results = evaluate_batch(&items, runways.as_ref(), minima.as_ref());

    let mut stations = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(assessment) => stations.push(assessment),
            Err(e) => warn!(error = %e, "Skipping station"),
        }
    }

    let output = Output {
        evaluated_at: Utc::now(),
        stations,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");

    Ok(())
}
