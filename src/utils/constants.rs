/// CSV column names (PRSA hourly station files)
pub const COLUMN_YEAR: &str = "year";
pub const COLUMN_MONTH: &str = "month";
pub const COLUMN_DAY: &str = "day";
pub const COLUMN_HOUR: &str = "hour";
pub const COLUMN_TEMP: &str = "TEMP";
pub const COLUMN_PM25: &str = "PM2.5";
pub const COLUMN_PM10: &str = "PM10";
pub const COLUMN_SO2: &str = "SO2";
pub const COLUMN_NO2: &str = "NO2";
pub const COLUMN_O3: &str = "O3";

pub const REQUIRED_COLUMNS: [&str; 10] = [
    COLUMN_YEAR,
    COLUMN_MONTH,
    COLUMN_DAY,
    COLUMN_HOUR,
    COLUMN_TEMP,
    COLUMN_PM25,
    COLUMN_PM10,
    COLUMN_SO2,
    COLUMN_NO2,
    COLUMN_O3,
];

/// Missing value markers
pub const MISSING_MARKER: &str = "NA";

/// Output file names
pub const YEARLY_TEMPERATURE_FILE: &str = "yearly_temperature.parquet";
pub const YEARLY_POLLUTANTS_FILE: &str = "yearly_pollutants.parquet";
pub const COMBINED_FILE: &str = "combined.parquet";

/// Configuration
pub const DEFAULT_CONFIG_FILE: &str = "airquality.toml";
pub const ENV_PREFIX: &str = "AIRQ";

/// Analysis defaults (Wanliu station, March 2013 - February 2017)
pub const DEFAULT_YEAR_MIN: i32 = 2013;
pub const DEFAULT_YEAR_MAX: i32 = 2017;
pub const DEFAULT_STATION_LABEL: &str = "Wanliu";
pub const DEFAULT_TEMPERATURE_DECIMALS: usize = 1;
pub const DEFAULT_POLLUTANT_DECIMALS: usize = 2;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
