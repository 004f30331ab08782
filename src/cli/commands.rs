use crate::analyzers::{YearlyAnalyzer, YearlyReport};
use crate::cli::args::{Cli, Commands, InputArgs, OutputFormat, YearRangeArgs};
use crate::config::AnalysisConfig;
use crate::readers::{ObservationReader, ObservationSet};
use crate::utils::filename::generate_default_output_dir;
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;
use anyhow::{Context, Result};
use tracing::{debug, warn};

pub fn run(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;
    let mut config =
        AnalysisConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!("Configuration: {:?}", config);

    match cli.command {
        Commands::Summary {
            input,
            years,
            format,
        } => {
            apply_overrides(&mut config, &input, &years, None)?;
            let report = build_report(&config, &input, quiet)?;

            match format {
                OutputFormat::Text => println!("{}", report.summary()),
                OutputFormat::Json => println!("{}", report.to_json()?),
            }
        }

        Commands::Export {
            input,
            years,
            output_dir,
            compression,
            row_group_size,
        } => {
            if let Some(size) = row_group_size {
                config.row_group_size = size;
            }
            apply_overrides(&mut config, &input, &years, compression.as_deref())?;
            let writer = ParquetWriter::new()
                .with_compression(&config.compression)?
                .with_row_group_size(config.row_group_size);
            let report = build_report(&config, &input, quiet)?;

            let output_dir = output_dir.unwrap_or_else(generate_default_output_dir);
            println!("Writing yearly tables to {}", output_dir.display());

            let exported = writer
                .write_tables(
                    &report.yearly_temperature,
                    &report.yearly_pollutants,
                    &report.combined,
                    &output_dir,
                )
                .with_context(|| format!("Failed to export to {}", output_dir.display()))?;

            for path in [
                &exported.yearly_temperature,
                &exported.yearly_pollutants,
                &exported.combined,
            ] {
                let info = writer.get_file_info(path)?;
                println!("\n{}\n{}", path.display(), info.summary());
            }

            println!("Export complete!");
        }

        Commands::Validate { input, mmap } => {
            println!("Validating {}", input.display());

            let progress = ProgressReporter::new_spinner("Parsing observations...", quiet);
            let set = ObservationReader::new()
                .with_skip_invalid(true)
                .with_mmap(mmap)
                .read_observations(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            progress.finish_with_message(&format!("Parsed {} rows", set.rows_read));

            println!("\n{}", validation_summary(&set));

            if set.rows_skipped == 0 {
                println!("✅ All rows passed validation checks");
            } else {
                println!("⚠️  Found {} malformed rows", set.rows_skipped);
            }
        }

        Commands::Info { file } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let info = writer.get_file_info(&file)?;
            println!("\n{}", info.summary());

            let has_column = |name: &str| info.columns.iter().any(|c| c == name);
            if has_column("samples") {
                println!("\nYearly mean temperature:");
                for row in writer.read_yearly_temperature(&file)? {
                    println!(
                        "  {}: {:.1}°C ({} readings)",
                        row.year, row.mean_temperature, row.samples
                    );
                }
            } else if has_column("mean_temperature") {
                println!("\nCombined rows:");
                for row in writer.read_combined(&file)? {
                    println!("  {}: {:.1}°C {:?}", row.year, row.mean_temperature, row.means);
                }
            }
        }
    }

    Ok(())
}

fn apply_overrides(
    config: &mut AnalysisConfig,
    input: &InputArgs,
    years: &YearRangeArgs,
    compression: Option<&str>,
) -> Result<()> {
    config
        .apply_overrides(years.year_min, years.year_max, compression, input.skip_invalid)
        .context("Invalid command-line settings")
}

fn read_input(config: &AnalysisConfig, input: &InputArgs, quiet: bool) -> Result<ObservationSet> {
    let progress = ProgressReporter::new_spinner("Reading observations...", quiet);

    let set = ObservationReader::new()
        .with_skip_invalid(config.skip_invalid_rows)
        .with_mmap(input.mmap)
        .read_observations(&input.input)
        .with_context(|| format!("Failed to read {}", input.input.display()))?;

    progress.finish_with_message(&format!("Read {} observations", set.len()));

    if set.rows_skipped > 0 {
        warn!("Skipped {} malformed rows", set.rows_skipped);
    }

    Ok(set)
}

fn build_report(config: &AnalysisConfig, input: &InputArgs, quiet: bool) -> Result<YearlyReport> {
    let set = read_input(config, input, quiet)?;
    let analyzer = YearlyAnalyzer::new(config.clone());

    analyzer
        .analyze(&set.observations, set.station.as_deref())
        .context("Aggregation failed")
}

fn validation_summary(set: &ObservationSet) -> String {
    let years = set.distinct_years();
    let years = if years.is_empty() {
        "none".to_string()
    } else {
        years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let coverage = match set.coverage() {
        Some((start, end)) => format!("{} to {}", start, end),
        None => "no readings".to_string(),
    };

    format!(
        "Validation Summary:\n\
        - Station: {}\n\
        - Rows read: {}\n\
        - Valid observations: {}\n\
        - Rows skipped: {}\n\
        - Years: {}\n\
        - Coverage: {}",
        set.station.as_deref().unwrap_or("unknown"),
        set.rows_read,
        set.len(),
        set.rows_skipped,
        years,
        coverage
    )
}
