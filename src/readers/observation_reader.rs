use crate::error::{ProcessingError, Result};
use crate::models::Observation;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, REQUIRED_COLUMNS};
use chrono::NaiveDateTime;
use memmap2::Mmap;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Observations parsed from one station file
#[derive(Debug, Clone, Default)]
pub struct ObservationSet {
    pub observations: Vec<Observation>,
    pub rows_read: usize,
    pub rows_skipped: usize,
    /// First non-empty station name found in the file
    pub station: Option<String>,
}

impl ObservationSet {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn distinct_years(&self) -> Vec<i32> {
        self.observations
            .iter()
            .map(|o| o.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest reading
    pub fn coverage(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut timestamps = self.observations.iter().filter_map(|o| o.timestamp());
        let first = timestamps.next()?;

        Some(timestamps.fold((first, first), |(start, end), ts| {
            (start.min(ts), end.max(ts))
        }))
    }
}

pub struct ObservationReader {
    skip_invalid: bool,
    use_mmap: bool,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            skip_invalid: false,
            use_mmap: false,
        }
    }

    /// Skip and count malformed rows instead of failing the read
    pub fn with_skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.skip_invalid = skip_invalid;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read hourly observations from a PRSA-style CSV file
    pub fn read_observations(&self, path: &Path) -> Result<ObservationSet> {
        debug!(
            "Reading observations from {} (mmap: {})",
            path.display(),
            self.use_mmap
        );

        let file = File::open(path)?;
        if self.use_mmap {
            let mmap = unsafe { Mmap::map(&file)? };
            self.read_from(&mmap[..])
        } else {
            self.read_from(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
        }
    }

    /// Read hourly observations from any CSV source with a header row
    pub fn read_from<R: Read>(&self, input: R) -> Result<ObservationSet> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(ProcessingError::MissingColumn(column.to_string()));
            }
        }

        let mut set = ObservationSet::default();

        for (index, result) in reader.deserialize::<Observation>().enumerate() {
            let record_number = index + 1;
            set.rows_read += 1;

            let parsed = result
                .map_err(ProcessingError::from)
                .and_then(|observation| observation.check().map(|_| observation));

            match parsed {
                Ok(observation) => {
                    if set.station.is_none() {
                        set.station = observation
                            .station
                            .as_ref()
                            .filter(|name| !name.is_empty())
                            .cloned();
                    }
                    set.observations.push(observation);
                }
                Err(e) if self.skip_invalid => {
                    warn!("Skipping record {}: {}", record_number, e);
                    set.rows_skipped += 1;
                }
                Err(e) => {
                    return Err(ProcessingError::InvalidFormat(format!(
                        "record {}: {}",
                        record_number, e
                    )));
                }
            }
        }

        debug!(
            "Read {} observations ({} rows, {} skipped)",
            set.len(),
            set.rows_read,
            set.rows_skipped
        );

        Ok(set)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pollutant;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station";

    fn csv_with(rows: &[&str]) -> String {
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content.push('\n');
        content
    }

    #[test]
    fn test_parse_prsa_rows() {
        let content = csv_with(&[
            "1,2013,3,1,0,8,8,6,28,400,52,-0.7,1023,-18.8,0,NNW,4.4,Wanliu",
            "2,2013,3,1,1,9,9,NA,31,400,NA,-1.1,1023.2,-18.2,0,N,4.7,Wanliu",
        ]);

        let set = ObservationReader::new().read_from(content.as_bytes()).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.rows_read, 2);
        assert_eq!(set.rows_skipped, 0);
        assert_eq!(set.station.as_deref(), Some("Wanliu"));

        let first = &set.observations[0];
        assert_eq!(first.year, 2013);
        assert_eq!(first.temperature, Some(-0.7));
        assert_eq!(first.pollutant(Pollutant::Pm25), Some(8.0));
        assert_eq!(first.pollutant(Pollutant::O3), Some(52.0));

        let second = &set.observations[1];
        assert_eq!(second.pollutant(Pollutant::So2), None);
        assert_eq!(second.pollutant(Pollutant::O3), None);
        assert_eq!(second.pollutant(Pollutant::No2), Some(31.0));
    }

    #[test]
    fn test_missing_temperature_is_none() {
        let content = csv_with(&["1,2014,6,1,5,8,8,6,28,400,52,NA,1023,-18.8,0,NNW,4.4,Wanliu"]);

        let set = ObservationReader::new().read_from(content.as_bytes()).unwrap();
        assert_eq!(set.observations[0].temperature, None);
    }

    #[test]
    fn test_missing_required_column() {
        let content = "year,month,day,hour,PM2.5,PM10,SO2,NO2,O3\n2013,3,1,0,8,8,6,28,52\n";

        let result = ObservationReader::new().read_from(content.as_bytes());
        match result {
            Err(ProcessingError::MissingColumn(column)) => assert_eq!(column, "TEMP"),
            other => panic!("expected missing TEMP column, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_row_rejected() {
        let content = csv_with(&[
            "1,2013,3,1,0,8,8,6,28,400,52,-0.7,1023,-18.8,0,NNW,4.4,Wanliu",
            "2,twenty,3,1,1,9,9,6,31,400,50,-1.1,1023.2,-18.2,0,N,4.7,Wanliu",
        ]);

        let result = ObservationReader::new().read_from(content.as_bytes());
        match result {
            Err(ProcessingError::InvalidFormat(message)) => assert!(message.contains("record 2")),
            other => panic!("expected invalid format, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_invalid_rows() {
        let content = csv_with(&[
            "1,2013,3,1,0,8,8,6,28,400,52,-0.7,1023,-18.8,0,NNW,4.4,Wanliu",
            "2,2013,3,1,1,abc,9,6,31,400,50,-1.1,1023.2,-18.2,0,N,4.7,Wanliu",
            "3,2013,3,1,2,7,7,5,30,400,-4,-1.1,1023.2,-18.2,0,N,4.7,Wanliu",
            "4,2013,2,30,3,7,7,5,30,400,40,-1.1,1023.2,-18.2,0,N,4.7,Wanliu",
            "5,2013,3,1,4,6,6,5,29,400,41,-1.4,1023.2,-18.2,0,N,4.7,Wanliu",
        ]);

        let set = ObservationReader::new()
            .with_skip_invalid(true)
            .read_from(content.as_bytes())
            .unwrap();

        assert_eq!(set.rows_read, 5);
        assert_eq!(set.rows_skipped, 3);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_station_column_optional() {
        let content = "year,month,day,hour,PM2.5,PM10,SO2,NO2,O3,TEMP\n2015,1,1,0,8,8,6,28,52,1.5\n";

        let set = ObservationReader::new().read_from(content.as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.station, None);
    }

    #[test]
    fn test_read_file_buffered_and_mmap() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(
            temp_file,
            "{}",
            csv_with(&[
                "1,2013,3,1,0,8,8,6,28,400,52,-0.7,1023,-18.8,0,NNW,4.4,Wanliu",
                "2,2014,12,31,23,9,9,7,31,400,50,-3.1,1023.2,-18.2,0,N,4.7,Wanliu",
            ])
        )?;

        let buffered = ObservationReader::new().read_observations(temp_file.path())?;
        let mapped = ObservationReader::new()
            .with_mmap(true)
            .read_observations(temp_file.path())?;

        assert_eq!(buffered.observations, mapped.observations);
        assert_eq!(buffered.distinct_years(), vec![2013, 2014]);

        let (start, end) = buffered.coverage().unwrap();
        assert_eq!(start.to_string(), "2013-03-01 00:00:00");
        assert_eq!(end.to_string(), "2014-12-31 23:00:00");

        Ok(())
    }

    #[test]
    fn test_empty_file_with_header() {
        let set = ObservationReader::new()
            .read_from(csv_with(&[]).as_bytes())
            .unwrap();

        assert!(set.is_empty());
        assert_eq!(set.coverage(), None);
        assert!(set.distinct_years().is_empty());
    }
}
