//! Reference dataset loading.
//!
//! Reads comma-separated files with one header row and six columns:
//! `city_code, province_code, country_code, city_name, province_name, country_name`.
//! Gzipped files (`.csv.gz`) are decompressed on the fly, and a directory is
//! walked recursively for reference files.

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::LocationRecord;

const FIELD_COUNT: usize = 6;

/// Load reference records from a file or a directory of files.
pub fn load_reference<P: AsRef<Path>>(path: P) -> Result<Vec<LocationRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("Reference path not found: {}", path.display());
    }

    let files = if path.is_dir() {
        reference_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    if files.is_empty() {
        warn!("No reference files found under {}", path.display());
    }

    let mut records = Vec::new();
    for file in &files {
        let loaded = load_file(file)?;
        debug!("Loaded {} records from {}", loaded.len(), file.display());
        records.extend(loaded);
    }

    info!(
        "Loaded {} reference records from {} file(s)",
        records.len(),
        files.len()
    );
    Ok(records)
}

/// Parse reference records from any reader. The first row is a header.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<LocationRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if record.len() != FIELD_COUNT {
            let line = record.position().map_or(0, |p| p.line());
            bail!(
                "Line {}: expected {} fields, found {}",
                line,
                FIELD_COUNT,
                record.len()
            );
        }

        records.push(LocationRecord::new(
            &record[0], &record[1], &record[2], &record[3], &record[4], &record[5],
        ));
    }

    Ok(records)
}

fn load_file(path: &Path) -> Result<Vec<LocationRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open reference file: {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    read_records(reader)
        .with_context(|| format!("Failed to read reference file: {}", path.display()))
}

fn reference_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.ends_with(".csv") || file_name.ends_with(".csv.gz") {
                files.push(path.to_path_buf());
            }
        }
    }
    Ok(files)
}
