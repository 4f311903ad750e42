//! CSV report writer and reader.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::{flatten, ReportRow, ReportSummary, Reporter};
use crate::domain::Fleet;
use crate::error::ReportError;

/// Report columns, in order.
pub const CSV_HEADER: [&str; 5] = [
    "device_serial",
    "device_hostname",
    "interface",
    "transceiver_serial",
    "sku",
];

const LINE_TERMINATOR: &str = "\r\n";

/// Writes the fleet report as CSV, replacing any existing file.
pub struct CsvReporter {
    path: PathBuf,
}

impl CsvReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_rows(&self, rows: &[ReportRow]) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        write!(out, "{}{}", CSV_HEADER.join(","), LINE_TERMINATOR)?;
        for row in rows {
            write!(out, "{}{}", row.to_csv_line(), LINE_TERMINATOR)?;
        }
        out.flush()
    }
}

impl Reporter for CsvReporter {
    fn write(&self, fleet: &Fleet) -> Result<ReportSummary, ReportError> {
        let rows = flatten(fleet);
        self.write_rows(&rows).map_err(|source| ReportError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!("Wrote {} rows to {:?}", rows.len(), self.path);
        Ok(ReportSummary {
            path: self.path.clone(),
            rows: rows.len(),
        })
    }
}

impl ReportRow {
    /// Encode as one CSV record without the line terminator.
    pub fn to_csv_line(&self) -> String {
        [
            self.device_serial.as_str(),
            self.device_hostname.as_deref().unwrap_or(""),
            self.interface.as_str(),
            self.transceiver_serial.as_str(),
            self.sku.as_deref().unwrap_or(""),
        ]
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",")
    }

    /// Build a row from the five fields of a record. Empty hostname and
    /// sku fields read back as `None`.
    pub fn from_fields(fields: Vec<String>, line: usize) -> Result<Self, ReportError> {
        let [device_serial, device_hostname, interface, transceiver_serial, sku]: [String; 5] = fields
            .try_into()
            .map_err(|f: Vec<String>| ReportError::InvalidLine {
                line,
                fields: f.len(),
            })?;

        Ok(Self {
            device_serial,
            device_hostname: non_empty(device_hostname),
            interface,
            transceiver_serial,
            sku: non_empty(sku),
        })
    }
}

/// Read a report written by `CsvReporter` back into rows.
pub fn read_report(path: &Path) -> Result<Vec<ReportRow>, ReportError> {
    let text = fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = parse_records(&text).into_iter();
    match records.next() {
        Some(header) if header == CSV_HEADER => {}
        Some(header) => return Err(ReportError::InvalidHeader(header.join(","))),
        None => return Err(ReportError::InvalidHeader(String::new())),
    }

    records
        .enumerate()
        .map(|(i, fields)| ReportRow::from_fields(fields, i + 2))
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Quote a field if it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split CSV text into records, honouring quoted fields. Blank lines are
/// skipped.
fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if !record.is_empty() || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
            }
            _ => field.push(c),
        }
    }

    if !record.is_empty() || !field.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DecodeOutcome, Device, DeviceTransceivers, SerialEvents, TransceiverEvent, TransceiverState,
    };
    use tempfile::TempDir;

    fn row(hostname: Option<&str>, sku: Option<&str>) -> ReportRow {
        ReportRow {
            device_serial: "JPE1".to_string(),
            device_hostname: hostname.map(str::to_string),
            interface: "Ethernet1/1".to_string(),
            transceiver_serial: "SN1".to_string(),
            sku: sku.map(str::to_string),
        }
    }

    fn fleet() -> Fleet {
        let mut serials = SerialEvents::new();
        serials.insert(
            "SN1".to_string(),
            vec![TransceiverEvent::new(TransceiverState::inserted("QSFP-100G", "SN1"), 100)],
        );
        let mut transceivers = DeviceTransceivers::new();
        transceivers.insert("Ethernet1".to_string(), serials);

        let mut fleet = Fleet::new();
        fleet.insert(Device {
            serial: "JPE1".to_string(),
            hostname: Some("leaf,1".to_string()),
            outcome: DecodeOutcome::Decoded(transceivers),
        });
        fleet
    }

    mod encoding_tests {
        use super::*;

        #[test]
        fn plain_fields_are_unquoted() {
            assert_eq!(
                row(Some("leaf1"), Some("ABC")).to_csv_line(),
                "JPE1,leaf1,Ethernet1/1,SN1,ABC"
            );
        }

        #[test]
        fn missing_values_are_empty() {
            assert_eq!(row(None, None).to_csv_line(), "JPE1,,Ethernet1/1,SN1,");
        }

        #[test]
        fn special_characters_are_quoted() {
            assert_eq!(escape_field("a,b"), "\"a,b\"");
            assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
            assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        }

        #[test]
        fn from_fields_wrong_count() {
            let err = ReportRow::from_fields(vec!["a".into(), "b".into()], 7).unwrap_err();
            assert!(matches!(err, ReportError::InvalidLine { line: 7, fields: 2 }));
        }
    }

    mod parsing_tests {
        use super::*;

        #[test]
        fn parses_quoted_fields() {
            let records = parse_records("a,\"b,c\",\"d \"\"e\"\"\"\r\nf,,g\r\n");
            assert_eq!(
                records,
                vec![
                    vec!["a".to_string(), "b,c".to_string(), "d \"e\"".to_string()],
                    vec!["f".to_string(), String::new(), "g".to_string()],
                ]
            );
        }

        #[test]
        fn quoted_line_breaks_stay_in_field() {
            let records = parse_records("\"x\r\ny\",z\n");
            assert_eq!(records, vec![vec!["x\r\ny".to_string(), "z".to_string()]]);
        }

        #[test]
        fn trailing_record_without_terminator() {
            assert_eq!(parse_records("a,b"), vec![vec!["a".to_string(), "b".to_string()]]);
        }
    }

    mod file_io_tests {
        use super::*;

        #[test]
        fn writes_header_and_rows() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("out.csv");

            let summary = CsvReporter::new(&path).write(&fleet()).unwrap();
            assert_eq!(summary.rows, 1);
            assert_eq!(summary.path, path);

            let text = fs::read_to_string(&path).unwrap();
            assert_eq!(
                text,
                "device_serial,device_hostname,interface,transceiver_serial,sku\r\n\
                 JPE1,\"leaf,1\",Ethernet1,SN1,QSFP-100G\r\n"
            );
        }

        #[test]
        fn empty_fleet_writes_header_only() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("empty.csv");

            let summary = CsvReporter::new(&path).write(&Fleet::new()).unwrap();
            assert_eq!(summary.rows, 0);
            assert_eq!(
                fs::read_to_string(&path).unwrap(),
                "device_serial,device_hostname,interface,transceiver_serial,sku\r\n"
            );
        }

        #[test]
        fn existing_file_is_overwritten() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("out.csv");
            fs::write(&path, "stale contents that are much longer than the new report\n".repeat(10))
                .unwrap();

            CsvReporter::new(&path).write(&Fleet::new()).unwrap();
            assert_eq!(read_report(&path).unwrap(), Vec::new());
        }

        #[test]
        fn read_back_matches_written_rows() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("out.csv");
            let fleet = fleet();

            CsvReporter::new(&path).write(&fleet).unwrap();
            assert_eq!(read_report(&path).unwrap(), flatten(&fleet));
        }

        #[test]
        fn unwritable_path_is_an_error() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("missing").join("out.csv");
            assert!(matches!(
                CsvReporter::new(&path).write(&Fleet::new()),
                Err(ReportError::Write { .. })
            ));
        }

        #[test]
        fn wrong_header_is_rejected() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("bad.csv");
            fs::write(&path, "a,b,c\r\n").unwrap();
            assert!(matches!(read_report(&path), Err(ReportError::InvalidHeader(_))));
        }
    }
}
