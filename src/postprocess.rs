//! Post-processing of the merged delta: identity/length filtering,
//! coordinate-table extraction, and optional SNP extraction.
//!
//! Each stage wraps one external tool call and is independently failable;
//! a nonzero exit from any of them is fatal to the request. The coordinate
//! rewrite is done in memory and lands through a persisted temp file so a
//! failure mid-rewrite never leaves a half-written table behind.

use crate::config::Config;
use crate::error::{AlignError, Result};
use crate::report::Reporter;
use crate::request::{with_suffix, ArtifactPaths};
use crate::tools::AlignerTools;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Runs delta-filter with the configured identity/length thresholds and
/// replaces the merged delta with the filtered one. Returns false (after
/// logging) when the tool exits nonzero.
pub fn filter_delta(
    tools: &dyn AlignerTools,
    config: &Config,
    paths: &ArtifactPaths,
    reporter: &Reporter,
    contigs_label: &str,
) -> Result<bool> {
    let exit = tools.delta_filter(config, &paths.delta, &paths.filtered_delta, &paths.log_err)?;
    if exit != 0 {
        reporter.note_err(&format!("Delta filter failed for {contigs_label}"));
        return Ok(false);
    }
    fs::rename(&paths.filtered_delta, &paths.delta)?;
    Ok(true)
}

/// Runs show-coords and rewrites its output into the canonical coordinate
/// table. Returns false (after logging) when the tool exits nonzero.
pub fn extract_coords(
    tools: &dyn AlignerTools,
    paths: &ArtifactPaths,
    reporter: &Reporter,
    contigs_label: &str,
) -> Result<bool> {
    let tmp_coords = with_suffix(&paths.coords, "_tmp");
    let exit = tools.show_coords(&paths.delta, &tmp_coords, &paths.log_err)?;
    if exit != 0 {
        reporter.note_err(&format!("Show-coords failed for {contigs_label}"));
        return Ok(false);
    }
    rewrite_coords(&tmp_coords, &paths.coords)?;
    let _ = fs::remove_file(&tmp_coords);
    Ok(true)
}

/// Strips the tool banner from a raw show-coords dump, keeping the two
/// lines immediately preceding the first `=====` separator (the column
/// header and the separator itself) followed by every data row.
fn rewrite_coords(raw: &Path, coords: &Path) -> Result<()> {
    let text = fs::read_to_string(raw)?;
    let mut header: Vec<&str> = Vec::new();
    let mut lines = text.lines();
    for line in lines.by_ref() {
        header.push(line);
        if line.starts_with("=====") {
            break;
        }
    }

    let dir = match coords.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut out = tempfile::NamedTempFile::new_in(dir)?;
    if header.len() >= 2 {
        writeln!(out, "{}", header[header.len() - 2])?;
        writeln!(out, "{}", header[header.len() - 1])?;
    }
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    out.persist(coords)?;
    Ok(())
}

/// Feeds the headless coordinate table to show-snps against the filtered
/// delta, producing the SNP table. Returns false (after logging) when the
/// tool exits nonzero.
pub fn extract_variants(
    tools: &dyn AlignerTools,
    paths: &ArtifactPaths,
    reporter: &Reporter,
    contigs_label: &str,
) -> Result<bool> {
    let headless = with_suffix(&paths.coords, ".headless");
    write_headless_coords(&paths.coords, &headless)?;
    let exit = tools.show_snps(&paths.delta, &headless, &paths.all_snps, &paths.log_err)?;
    if exit != 0 {
        reporter.note_err(&format!("Show-snps failed for {contigs_label}"));
        return Ok(false);
    }
    Ok(true)
}

/// Copies the coordinate table minus its two header lines.
fn write_headless_coords(coords: &Path, headless: &Path) -> Result<()> {
    let text = fs::read_to_string(coords)?;
    let mut out = fs::File::create(headless)?;
    for line in text.lines().skip(2) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// One parsed coordinate row.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordsRow {
    pub ref_start: u64,
    pub ref_end: u64,
    pub query_start: u64,
    pub query_end: u64,
    pub ref_len: u64,
    pub query_len: u64,
    pub identity: f64,
    pub ref_name: String,
    pub query_name: String,
}

impl CoordsRow {
    /// Parses one whitespace-separated data row, `|` separators included.
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().filter(|f| *f != "|").collect();
        if fields.len() < 9 {
            return Err(AlignError::CoordsParseError(line.to_string()));
        }
        let num = |i: usize| -> Result<u64> {
            fields[i]
                .parse()
                .map_err(|_| AlignError::CoordsParseError(line.to_string()))
        };
        Ok(CoordsRow {
            ref_start: num(0)?,
            ref_end: num(1)?,
            query_start: num(2)?,
            query_end: num(3)?,
            ref_len: num(4)?,
            query_len: num(5)?,
            identity: fields[6]
                .parse()
                .map_err(|_| AlignError::CoordsParseError(line.to_string()))?,
            ref_name: fields[7].to_string(),
            query_name: fields[8].to_string(),
        })
    }
}

/// Loads every data row of a rewritten coordinate table.
pub fn read_coords(coords: &Path) -> Result<Vec<CoordsRow>> {
    let text = fs::read_to_string(coords)?;
    text.lines()
        .skip(2)
        .filter(|l| !l.trim().is_empty())
        .map(CoordsRow::parse)
        .collect()
}
