mod analysis;
mod common;
mod config;
mod logging;
mod parsing;

use argh::FromArgs;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

// Import analysis functions
use analysis::constants::DEFAULT_TOP_EXTENSIONS;
use analysis::{
    annotate, generate_comparison_plots, generate_file_age_analysis, generate_file_age_plots,
    generate_file_size_analysis, generate_file_size_plots, generate_file_type_analysis,
    write_summary, EntryCounts, ListingReport,
};
use common::csv_output::write_records_csv;
use common::ParsedListing;
use config::{AnalysisConfig, SyntheticYear};

// Import parsing functionality
use parsing::{parse_listing, ListingParser};

/// Statistical analysis of directory listing dumps
#[derive(FromArgs, Debug)]
pub struct Args {
    /// listing file to analyze, plain text or .zst; repeat to compare several listings
    #[argh(option, short = 'i')]
    input: Vec<PathBuf>,

    /// directory receiving the reports (default: output)
    #[argh(option, short = 'o', default = "PathBuf::from(\"output\")")]
    output: PathBuf,

    /// years before the reference year assumed for entries showing a time (default: 0)
    #[argh(option, default = "0")]
    year_offset: u32,

    /// reference date for file ages as YYYY-MM-DD (default: today)
    #[argh(option)]
    reference_date: Option<String>,

    /// number of known extensions kept in the file type table (default: 10)
    #[argh(option, default = "DEFAULT_TOP_EXTENSIONS")]
    top: usize,

    /// skip rendering PNG plots
    #[argh(switch)]
    no_plots: bool,

    /// enable debug logging
    #[argh(switch, short = 'v')]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<AnalysisConfig> {
        let mut config = AnalysisConfig::new(self.input, self.output);
        if let Some(reference_date) = &self.reference_date {
            config.reference_date = AnalysisConfig::parse_reference_date(reference_date)?;
        }
        config.synthetic_year = SyntheticYear::from_offset(self.year_offset);
        config.top_extensions = self.top;
        config.render_plots = !self.no_plots;
        Ok(config)
    }
}

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to create output directory: {0}")]
    OutputDir(#[from] std::io::Error),

    #[error("Parsing error: {0}")]
    Parsing(#[from] parsing::ParsingError),

    #[error("CSV output error: {0}")]
    Csv(#[from] common::csv_output::CsvOutputError),

    #[error("File size analysis error: {0}")]
    FileSize(#[from] analysis::file_size::FileSizeError),

    #[error("File age analysis error: {0}")]
    FileAge(#[from] analysis::file_age::FileAgeError),

    #[error("File type analysis error: {0}")]
    FileType(#[from] analysis::file_type::FileTypeError),

    #[error("Summary error: {0}")]
    Summary(#[from] analysis::summary::SummaryError),

    #[error("Comparison plot error: {0}")]
    Comparison(#[from] common::PlotError),
}

type Result<T> = core::result::Result<T, AnalysisError>;

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    logging::init(args.verbose);

    let config = args.into_config()?;
    config.validate()?;

    run(&config)?;
    Ok(())
}

/// Parses and analyses every listing, then draws the comparison plots
fn run(config: &AnalysisConfig) -> Result<Vec<ListingReport>> {
    fs::create_dir_all(&config.output_dir)?;

    let parser = ListingParser::new(config.resolved_synthetic_year());
    info!(
        reference_date = %config.reference_date,
        synthetic_year = parser.synthetic_year(),
        listings = config.inputs.len(),
        "Starting listing analysis"
    );

    let mut listings = Vec::with_capacity(config.inputs.len());
    let mut reports = Vec::with_capacity(config.inputs.len());
    for input in &config.inputs {
        let listing = parse_listing(input, &parser)?;
        reports.push(analyze_listing(&listing, config, parser.synthetic_year())?);
        listings.push(listing);
    }

    if config.render_plots && listings.len() > 1 {
        generate_comparison_plots(&listings, &config.output_dir)?;
    }

    info!(output = %config.output_dir.display(), "Analysis complete");
    Ok(reports)
}

/// Writes the CSV, text, JSON and plot outputs of one listing
fn analyze_listing(
    listing: &ParsedListing,
    config: &AnalysisConfig,
    synthetic_year: i32,
) -> Result<ListingReport> {
    let output_dir = config.listing_output_dir(&listing.label);
    fs::create_dir_all(&output_dir)?;

    // Derive date, age and extension columns
    let annotated = annotate(&listing.records, config.reference_date);
    write_records_csv(&annotated, &output_dir.join("parsed_listing.csv"))?;

    // Generate text reports
    let size = generate_file_size_analysis(listing, &output_dir)?;
    let age = generate_file_age_analysis(&listing.label, &annotated, &output_dir)?;
    let top_file_types = generate_file_type_analysis(
        &listing.label,
        &annotated,
        config.top_extensions,
        &output_dir,
    )?;

    // Generate plots
    if config.render_plots {
        generate_file_size_plots(listing, &output_dir)?;
        generate_file_age_plots(&listing.label, &annotated, &output_dir)?;
    }

    let report = ListingReport {
        label: listing.label.clone(),
        reference_date: config.reference_date,
        synthetic_year,
        lines_read: listing.lines_read,
        entries: EntryCounts::of(listing),
        skipped: listing.skipped.clone(),
        size,
        age,
        top_file_types,
    };
    write_summary(&report, &output_dir)?;

    Ok(report)
}
