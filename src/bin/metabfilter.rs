//! metabfilter - minimum-detection filtering CLI
//!
//! Command-line interface for filtering Mass Profiler feature tables.

use clap::{Parser, Subcommand};
use metabfilter::data::{write_template, FeatureTable, SampleCatalog, SampleGroupMap};
use metabfilter::error::Result;
use metabfilter::pipeline::{FilterConfig, RunConfig};
use metabfilter::report::FilterReport;
use std::path::PathBuf;

/// Minimum-detection filtering for metabolomics feature tables
#[derive(Parser)]
#[command(name = "metabfilter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sample-groupings template from a feature table
    Template {
        /// Path to the feature table CSV
        #[arg(short, long)]
        features: PathBuf,

        /// Output path (default: <stem>_sample_groupings.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Filter a feature table using a filled-in groupings file
    Filter {
        /// Path to the feature table CSV
        #[arg(short, long)]
        features: PathBuf,

        /// Path to the groupings CSV (default: <stem>_sample_groupings.csv)
        #[arg(short, long)]
        groups: Option<PathBuf>,

        /// Minimum detection group threshold, a fraction in [0, 1]
        #[arg(short, long, default_value = "0.33")]
        threshold: f64,

        /// Keep features detected only in the QCs (disables the QC stage)
        #[arg(long)]
        keep_qc_only: bool,

        /// Output path for kept features (default: <stem>_metabolites_kept.csv)
        #[arg(long)]
        kept: Option<PathBuf>,

        /// Output path for removed features (default: <stem>_metabolites_removed.csv)
        #[arg(long)]
        removed: Option<PathBuf>,

        /// Summary format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Filter a feature table driven by a YAML run configuration
    Run {
        /// Path to the run configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Summary format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Write an example run configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "metabfilter.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Template { features, output } => cmd_template(&features, output.as_ref()),
        Commands::Filter {
            features,
            groups,
            threshold,
            keep_qc_only,
            kept,
            removed,
            format,
        } => cmd_filter(
            &features,
            groups,
            threshold,
            keep_qc_only,
            kept,
            removed,
            &format,
        ),
        Commands::Run { config, format } => cmd_run(&config, &format),
        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Generate the groupings template.
fn cmd_template(features_path: &PathBuf, output_path: Option<&PathBuf>) -> Result<()> {
    eprintln!("Loading feature table from {:?}...", features_path);
    let table = FeatureTable::from_csv(features_path)?;
    let catalog = SampleCatalog::from_headers(table.headers())?;

    eprintln!(
        "Found {} sample columns among {} total columns",
        catalog.len(),
        table.n_columns()
    );

    let output = match output_path {
        Some(path) => path.clone(),
        None => RunConfig::for_input(features_path).groupings_path(),
    };
    write_template(&catalog, &output)?;

    eprintln!("Wrote groupings template to {:?}", output);
    eprintln!("Fill in the Groups column before filtering.");
    eprintln!("Label QC replicates as 'QC' and samples to exclude as 'Ignore'.");
    Ok(())
}

/// Filter with explicit command-line options.
fn cmd_filter(
    features_path: &PathBuf,
    groups_path: Option<PathBuf>,
    threshold: f64,
    keep_qc_only: bool,
    kept_path: Option<PathBuf>,
    removed_path: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let config = RunConfig {
        input_file: features_path.clone(),
        groupings_file: groups_path,
        kept_file: kept_path,
        removed_file: removed_path,
        filter: FilterConfig {
            remove_metabolites_only_in_qcs: !keep_qc_only,
            minimum_detection_group_threshold: threshold,
            ..FilterConfig::default()
        },
    };
    run_and_report(&config, format)
}

/// Filter driven by a YAML run configuration.
fn cmd_run(config_path: &PathBuf, format: &str) -> Result<()> {
    eprintln!("Loading run configuration from {:?}...", config_path);
    let config_str = std::fs::read_to_string(config_path)?;
    let config = RunConfig::from_yaml(&config_str)?;
    run_and_report(&config, format)
}

/// Write an example run configuration.
fn cmd_example(output_path: &PathBuf) -> Result<()> {
    let config = RunConfig::for_input("ExampleData_NEG.csv");
    let yaml = config.to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example run configuration to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);
    Ok(())
}

/// Shared run-write-report path for `filter` and `run`.
fn run_and_report(config: &RunConfig, format: &str) -> Result<()> {
    eprintln!("Loading feature table from {:?}...", config.input_file);
    let table = FeatureTable::from_csv(&config.input_file)?;

    let groupings_path = config.groupings_path();
    eprintln!("Loading sample groupings from {:?}...", groupings_path);
    let groups = SampleGroupMap::from_csv(&groupings_path)?;

    eprintln!(
        "Loaded {} features, {} grouped samples",
        table.n_rows(),
        groups.len()
    );
    if config.filter.remove_metabolites_only_in_qcs {
        eprintln!("Filtering out metabolites present only in the QCs");
    }
    eprintln!(
        "Applying minimum detection threshold {:.0}%",
        config.filter.minimum_detection_group_threshold * 100.0
    );

    let report = metabfilter::pipeline::run_filter(&table, &groups, &config.filter)?;

    let kept_path = config.kept_path();
    let removed_path = config.removed_path();
    report.kept.to_csv(&kept_path)?;
    report.removed.to_csv(&removed_path)?;
    eprintln!("Kept features written to {:?}", kept_path);
    eprintln!("Removed features written to {:?}", removed_path);

    print_summary(&report, format)
}

fn print_summary(report: &FilterReport, format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report.summary)?),
        _ => println!("{}", report.summary),
    }
    Ok(())
}
