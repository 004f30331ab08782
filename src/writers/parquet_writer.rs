use crate::error::{ProcessingError, Result};
use crate::models::{
    CombinedRecord, Pollutant, PollutantMeans, YearlyPollutants, YearlyTemperature,
};
use crate::utils::constants::{
    COMBINED_FILE, COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY,
    COMPRESSION_ZSTD, DEFAULT_ROW_GROUP_SIZE, YEARLY_POLLUTANTS_FILE, YEARLY_TEMPERATURE_FILE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

/// Paths of the three tables written by [`ParquetWriter::write_tables`]
#[derive(Debug, Clone)]
pub struct ExportedTables {
    pub yearly_temperature: PathBuf,
    pub yearly_pollutants: PathBuf,
    pub combined: PathBuf,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write all three derived tables into `dir`, creating it if needed
    pub fn write_tables(
        &self,
        yearly_temperature: &[YearlyTemperature],
        yearly_pollutants: &[YearlyPollutants],
        combined: &[CombinedRecord],
        dir: &Path,
    ) -> Result<ExportedTables> {
        std::fs::create_dir_all(dir)?;

        let exported = ExportedTables {
            yearly_temperature: dir.join(YEARLY_TEMPERATURE_FILE),
            yearly_pollutants: dir.join(YEARLY_POLLUTANTS_FILE),
            combined: dir.join(COMBINED_FILE),
        };

        self.write_yearly_temperature(yearly_temperature, &exported.yearly_temperature)?;
        self.write_yearly_pollutants(yearly_pollutants, &exported.yearly_pollutants)?;
        self.write_combined(combined, &exported.combined)?;

        Ok(exported)
    }

    pub fn write_yearly_temperature(&self, rows: &[YearlyTemperature], path: &Path) -> Result<()> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int32, false),
            Field::new("mean_temperature", DataType::Float64, false),
            Field::new("samples", DataType::UInt64, false),
        ]));

        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int32Array::from(
                rows.iter().map(|r| r.year).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.mean_temperature).collect::<Vec<_>>(),
            )),
            Arc::new(UInt64Array::from(
                rows.iter().map(|r| r.samples).collect::<Vec<_>>(),
            )),
        ];

        self.write_batch(schema, columns, rows.len(), path)
    }

    pub fn write_yearly_pollutants(&self, rows: &[YearlyPollutants], path: &Path) -> Result<()> {
        let mut fields = vec![Field::new("year", DataType::Int32, false)];
        fields.extend(pollutant_fields());
        let schema = Arc::new(Schema::new(fields));

        let mut columns: Vec<ArrayRef> = vec![Arc::new(Int32Array::from(
            rows.iter().map(|r| r.year).collect::<Vec<_>>(),
        ))];
        columns.extend(pollutant_columns(rows.iter().map(|r| &r.means)));

        self.write_batch(schema, columns, rows.len(), path)
    }

    pub fn write_combined(&self, rows: &[CombinedRecord], path: &Path) -> Result<()> {
        let mut fields = vec![
            Field::new("year", DataType::Int32, false),
            Field::new("mean_temperature", DataType::Float64, false),
        ];
        fields.extend(pollutant_fields());
        let schema = Arc::new(Schema::new(fields));

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(Int32Array::from(
                rows.iter().map(|r| r.year).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.mean_temperature).collect::<Vec<_>>(),
            )),
        ];
        columns.extend(pollutant_columns(rows.iter().map(|r| &r.means)));

        self.write_batch(schema, columns, rows.len(), path)
    }

    /// An empty table still produces a valid zero-row file
    fn write_batch(
        &self,
        schema: Arc<Schema>,
        columns: Vec<ArrayRef>,
        num_rows: usize,
        path: &Path,
    ) -> Result<()> {
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        if num_rows > 0 {
            let batch = RecordBatch::try_new(schema, columns)?;
            writer.write(&batch)?;
        }
        writer.close()?;

        info!("Wrote {} rows to {}", num_rows, path.display());
        Ok(())
    }

    /// Read a yearly temperature table back from Parquet
    pub fn read_yearly_temperature(&self, path: &Path) -> Result<Vec<YearlyTemperature>> {
        let mut rows = Vec::new();

        for batch in read_batches(path)? {
            let years = typed_column::<Int32Array>(&batch, "year")?;
            let means = typed_column::<Float64Array>(&batch, "mean_temperature")?;
            let samples = typed_column::<UInt64Array>(&batch, "samples")?;

            for i in 0..batch.num_rows() {
                rows.push(YearlyTemperature {
                    year: years.value(i),
                    mean_temperature: means.value(i),
                    samples: samples.value(i),
                });
            }
        }

        Ok(rows)
    }

    /// Read a combined table back from Parquet
    pub fn read_combined(&self, path: &Path) -> Result<Vec<CombinedRecord>> {
        let mut rows = Vec::new();

        for batch in read_batches(path)? {
            let years = typed_column::<Int32Array>(&batch, "year")?;
            let temperatures = typed_column::<Float64Array>(&batch, "mean_temperature")?;
            let pollutant_arrays = Pollutant::ALL
                .iter()
                .map(|p| typed_column::<Float64Array>(&batch, p.field_name()).map(|a| (*p, a)))
                .collect::<Result<Vec<_>>>()?;

            for i in 0..batch.num_rows() {
                let mut means = PollutantMeans::default();
                for (pollutant, array) in &pollutant_arrays {
                    let value = if array.is_null(i) {
                        None
                    } else {
                        Some(array.value(i))
                    };
                    means.set(*pollutant, value);
                }

                rows.push(CombinedRecord {
                    year: years.value(i),
                    mean_temperature: temperatures.value(i),
                    means,
                });
            }
        }

        Ok(rows)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();
        let columns = metadata
            .file_metadata()
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            row_group_sizes.push(metadata.row_group(i).num_rows());
        }

        let compression = (row_groups > 0 && metadata.row_group(0).num_columns() > 0)
            .then(|| metadata.row_group(0).column(0).compression());

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression,
            columns,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn pollutant_fields() -> Vec<Field> {
    Pollutant::ALL
        .iter()
        .map(|p| Field::new(p.field_name(), DataType::Float64, true))
        .collect()
}

fn pollutant_columns<'a>(means: impl Iterator<Item = &'a PollutantMeans> + Clone) -> Vec<ArrayRef> {
    Pollutant::ALL
        .iter()
        .map(|p| {
            let values: Vec<Option<f64>> = means.clone().map(|m| m.get(*p)).collect();
            Arc::new(Float64Array::from(values)) as ArrayRef
        })
        .collect()
}

fn read_batches(path: &Path) -> Result<Vec<RecordBatch>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok(batches)
}

fn typed_column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|column| column.as_any().downcast_ref::<T>())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid {} column type", name)))
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    /// Codec of the first column chunk; None for files without row groups
    pub compression: Option<Compression>,
    pub columns: Vec<String>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let compression = self
            .compression
            .map(|c| format!("{:?}", c))
            .unwrap_or_else(|| "n/a".to_string());

        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {}\n\
            - Avg rows per group: {:.0}\n\
            - Columns: {}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            compression,
            avg_rows,
            self.columns.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::{NamedTempFile, TempDir};

    fn temperature_rows() -> Vec<YearlyTemperature> {
        vec![
            YearlyTemperature {
                year: 2013,
                mean_temperature: 14.2,
                samples: 7344,
            },
            YearlyTemperature {
                year: 2014,
                mean_temperature: 13.9,
                samples: 8754,
            },
        ]
    }

    fn combined_rows() -> Vec<CombinedRecord> {
        let mut means = PollutantMeans::default();
        means.set(Pollutant::Pm25, Some(83.4));
        means.set(Pollutant::No2, Some(65.2));

        vec![CombinedRecord {
            year: 2013,
            mean_temperature: 14.2,
            means,
        }]
    }

    #[test]
    fn test_write_and_read_temperature_table() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;

        writer.write_yearly_temperature(&temperature_rows(), temp_file.path())?;
        let rows = writer.read_yearly_temperature(temp_file.path())?;

        assert_eq!(rows, temperature_rows());
        Ok(())
    }

    #[test]
    fn test_combined_table_keeps_nulls() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;

        writer.write_combined(&combined_rows(), temp_file.path())?;
        let rows = writer.read_combined(temp_file.path())?;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mean(Pollutant::Pm25), Some(83.4));
        assert_eq!(rows[0].mean(Pollutant::O3), None);
        assert_eq!(rows[0].mean(Pollutant::So2), None);
        Ok(())
    }

    #[test]
    fn test_write_empty_table() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;

        writer.write_yearly_pollutants(&[], temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 0);
        assert!(info.columns.contains(&"pm25".to_string()));
        Ok(())
    }

    #[test]
    fn test_write_tables() -> Result<()> {
        let dir = TempDir::new()?;
        let out_dir = dir.path().join("nested").join("export");
        let pollutants = vec![YearlyPollutants {
            year: 2013,
            means: combined_rows()[0].means,
        }];

        let writer = ParquetWriter::new().with_compression("zstd")?;
        let exported =
            writer.write_tables(&temperature_rows(), &pollutants, &combined_rows(), &out_dir)?;

        assert!(exported.yearly_temperature.exists());
        assert!(exported.yearly_pollutants.exists());
        assert!(exported.combined.exists());

        let info = writer.get_file_info(&exported.yearly_temperature)?;
        assert_eq!(info.total_rows, 2);
        assert!(matches!(info.compression, Some(Compression::ZSTD(_))));
        assert!(info.summary().contains("Total rows: 2"));
        Ok(())
    }

    #[test]
    fn test_row_group_size_splits_table() -> Result<()> {
        let writer = ParquetWriter::new().with_row_group_size(1);
        let temp_file = NamedTempFile::new()?;

        writer.write_yearly_temperature(&temperature_rows(), temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.row_groups, 2);
        assert_eq!(info.row_group_sizes, vec![1, 1]);
        assert_eq!(writer.read_yearly_temperature(temp_file.path())?, temperature_rows());
        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        for compression in ["snappy", "gzip", "lz4", "zstd", "none", "SNAPPY"] {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;

            let result = writer.write_yearly_temperature(&temperature_rows(), temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(matches!(
            ParquetWriter::new().with_compression("brotli-9000"),
            Err(ProcessingError::Config(_))
        ));
        Ok(())
    }
}
