use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "airquality-processor")]
#[command(about = "Yearly temperature and pollutant aggregation for PRSA air-quality station data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log errors and hide progress output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Configuration file [default: ./airquality.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(short, long, help = "Input CSV file with hourly station readings")]
    pub input: PathBuf,

    #[arg(long, help = "Skip malformed rows instead of failing")]
    pub skip_invalid: bool,

    #[arg(long, help = "Memory-map the input file")]
    pub mmap: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct YearRangeArgs {
    #[arg(long, help = "First year of the temperature window (inclusive)")]
    pub year_min: Option<i32>,

    #[arg(long, help = "Last year of the temperature window (inclusive)")]
    pub year_max: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain-text tables (default)
    #[default]
    Text,
    /// JSON document
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print yearly temperature, pollutant and combined tables
    Summary {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        years: YearRangeArgs,

        #[arg(long, default_value = "text", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Write the derived tables to Parquet files
    Export {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        years: YearRangeArgs,

        #[arg(
            short,
            long,
            help = "Output directory [default: output/airquality-yearly-{YYMMDD}]"
        )]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Compression codec (snappy, gzip, lz4, zstd, none)")]
        compression: Option<String>,

        #[arg(long, help = "Maximum rows per Parquet row group")]
        row_group_size: Option<usize>,
    },

    /// Parse the input file and report row counts and coverage
    Validate {
        #[arg(short, long, help = "Input CSV file with hourly station readings")]
        input: PathBuf,

        #[arg(long, help = "Memory-map the input file")]
        mmap: bool,
    },

    /// Display information about an exported Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_summary() {
        let cli = Cli::parse_from([
            "airquality-processor",
            "summary",
            "--input",
            "wanliu.csv",
            "--year-min",
            "2014",
            "--format",
            "json",
            "-v",
        ]);

        assert!(cli.verbose);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        match cli.command {
            Commands::Summary {
                input,
                years,
                format,
            } => {
                assert_eq!(input.input, PathBuf::from("wanliu.csv"));
                assert_eq!(years.year_min, Some(2014));
                assert_eq!(years.year_max, None);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected summary command"),
        }
    }

    #[test]
    fn test_parse_export_defaults() {
        let cli = Cli::parse_from(["airquality-processor", "export", "-i", "data.csv", "-q"]);

        assert_eq!(cli.log_level(), tracing::Level::ERROR);
        match cli.command {
            Commands::Export {
                output_dir,
                compression,
                row_group_size,
                input,
                ..
            } => {
                assert!(output_dir.is_none());
                assert!(compression.is_none());
                assert!(row_group_size.is_none());
                assert!(!input.skip_invalid);
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_parse_export_row_group_size() {
        let cli = Cli::parse_from([
            "airquality-processor",
            "export",
            "-i",
            "data.csv",
            "--row-group-size",
            "500",
        ]);

        match cli.command {
            Commands::Export { row_group_size, .. } => assert_eq!(row_group_size, Some(500)),
            _ => panic!("expected export command"),
        }
    }
}
