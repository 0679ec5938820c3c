//! Append-only samples log.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use tracing::{debug, instrument};

use crate::SampleRecord;

use super::error::StoreResult;

/// The newline-delimited JSON log of observations.
///
/// Records are appended in chronological order and never mutated. Reads are
/// lazy line-by-line scans; pruning rewrites the file through a temp sibling
/// and an atomic rename, so a concurrent or crashed reader never observes a
/// half-written file.
#[derive(Debug, Clone)]
pub struct SampleStore {
    path: PathBuf,
}

impl SampleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line. The line is written with one
    /// `write_all` call so a failure never leaves a partial record followed
    /// by more appends.
    #[instrument(skip_all)]
    pub fn append(&self, record: &SampleRecord) -> StoreResult<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    /// Lazily iterate the records whose timestamp falls on `date` (UTC), in
    /// append order. Malformed or unreadable lines are skipped; a missing
    /// file yields an empty sequence.
    pub fn samples_for_date(
        &self,
        date: NaiveDate,
    ) -> StoreResult<impl Iterator<Item = SampleRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => Some(file),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(file
            .map(BufReader::new)
            .into_iter()
            .flat_map(|reader| reader.lines())
            .filter_map(|line| line.ok())
            .filter_map(|line| serde_json::from_str::<SampleRecord>(&line).ok())
            .filter(move |record| record.resources.timestamp.date_naive() == date))
    }

    /// Drop every record older than `today - retention_days`, keeping the
    /// survivors byte-for-byte in their original order. Unparseable lines do
    /// not survive the rewrite. Returns the number of dropped lines.
    #[instrument(skip(self))]
    pub fn prune(&self, today: NaiveDate, retention_days: u32) -> StoreResult<usize> {
        let cutoff = today - Duration::days(retention_days as i64);

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let tmp_path = tmp_sibling(&self.path);
        let mut kept = 0usize;
        let mut dropped = 0usize;

        {
            let mut out = BufWriter::new(File::create(&tmp_path)?);

            for line in BufReader::new(file).lines() {
                let line = line?;
                match serde_json::from_str::<SampleRecord>(&line) {
                    Ok(record) if record.resources.timestamp.date_naive() >= cutoff => {
                        out.write_all(line.as_bytes())?;
                        out.write_all(b"\n")?;
                        kept += 1;
                    }
                    _ => dropped += 1,
                }
            }

            out.flush()?;
        }

        fs::rename(&tmp_path, &self.path)?;
        debug!("retained {kept} samples, removed {dropped}");

        Ok(dropped)
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
