use crate::generator::exemplar::ExemplarSet;
use anyhow::Context;
use cpfskcore::frame::SampleFrame;
use num_complex::Complex32;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct ExemplarReport<'a> {
    mod_name: &'a str,
    snr_db: Option<f32>,
    rows: usize,
    columns: usize,
    offsets: &'a [usize],
    data: Vec<Vec<f32>>,
}

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Raw interleaved little-endian `f32` I/Q.
pub fn write_cf32(path: &Path, samples: &[Complex32]) -> anyhow::Result<()> {
    let mut writer = create(path)?;
    for sample in samples {
        writer.write_all(&sample.re.to_le_bytes())?;
        writer.write_all(&sample.im.to_le_bytes())?;
    }
    writer
        .flush()
        .with_context(|| format!("writing samples to {}", path.display()))
}

pub fn write_frames(path: &Path, frames: &[SampleFrame]) -> anyhow::Result<()> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, frames)
        .with_context(|| format!("serializing frames to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

pub fn write_exemplars(path: &Path, set: &ExemplarSet) -> anyhow::Result<()> {
    let (rows, columns) = set.matrix.dim();
    let report = ExemplarReport {
        mod_name: &set.mod_name,
        snr_db: set.snr_db,
        rows,
        columns,
        offsets: &set.offsets,
        data: set.matrix.rows().into_iter().map(|row| row.to_vec()).collect(),
    };
    let mut writer = create(path)?;
    serde_json::to_writer(&mut writer, &report)
        .with_context(|| format!("serializing exemplars to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Appends one summary line, creating the file on first use.
pub fn append_report(path: &Path, line: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    writeln!(file, "{}", line)?;
    Ok(())
}
