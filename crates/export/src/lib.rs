//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod trajectory {
    use std::io;
    use std::path::Path;

    use binsim_stream::StreamTrajectory;
    use serde::{Deserialize, Serialize};

    use super::writer_for_path;

    /// CSV row emitted by the trajectory exporter.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Row {
        pub index: usize,
        pub x: f64,
        pub y: f64,
        pub time_s: f64,
        pub arc_length: f64,
    }

    /// Flatten a trajectory into CSV rows with cumulative path length.
    pub fn rows(trajectory: &StreamTrajectory) -> Vec<Row> {
        trajectory
            .points
            .iter()
            .zip(&trajectory.times_s)
            .zip(trajectory.arc_lengths())
            .enumerate()
            .map(|(index, ((point, &time_s), arc_length))| Row {
                index,
                x: point[0],
                y: point[1],
                time_s,
                arc_length,
            })
            .collect()
    }

    /// Write `index,x,y,time_s,arc_length` rows to `path` (`-` for stdout).
    pub fn write_csv(path: &Path, trajectory: &StreamTrajectory) -> io::Result<()> {
        let mut writer = csv::Writer::from_writer(writer_for_path(path)?);
        for row in rows(trajectory) {
            writer.serialize(row)?;
        }
        writer.flush()
    }

    /// Read rows back from a CSV written by [`write_csv`].
    pub fn read_csv(path: &Path) -> io::Result<Vec<Row>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize::<Row>() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

pub mod surface {
    use std::io;
    use std::path::Path;

    use binsim_core::surface::SurfaceSample;
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::writer_for_path;

    #[derive(Serialize)]
    struct SurfaceSidecar<'a> {
        component: &'a str,
        count: usize,
        samples: &'a [SurfaceSample],
    }

    /// Write labelled surface samples as pretty JSON to `path` (`-` for
    /// stdout), creating parent directories as needed.
    pub fn write_json(path: &Path, component: &str, samples: &[SurfaceSample]) -> io::Result<()> {
        let mut writer = writer_for_path(path)?;
        let sidecar = SurfaceSidecar {
            component,
            count: samples.len(),
            samples,
        };
        to_writer_pretty(&mut writer, &sidecar)?;
        writer.flush()
    }
}
