//! Gameplay capture for offline training: one row per simulated frame,
//! the seven feature columns plus the human action label. Rows accumulate
//! in memory during play and are appended to a CSV file on save, keeping
//! any data already present.

use crate::policy::Features;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CSV_HEADER: &str =
    "bird_y,top_pipe_y,bottom_pipe_y,pipe_x,distance_to_pipe,gap_center,gap_size,action";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRow {
    pub features: Features,
    /// 1 iff a jump command was issued this frame.
    pub action: u8,
}

impl FrameRow {
    fn to_csv(self) -> String {
        let f = self.features;
        format!(
            "{},{},{},{},{},{},{},{}",
            f.bird_y,
            f.gap_top,
            f.gap_bottom,
            f.pipe_x,
            f.distance_to_pipe,
            f.gap_center,
            f.gap_size,
            self.action
        )
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    rows: Vec<FrameRow>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, features: Features, jumped: bool) {
        self.rows.push(FrameRow {
            features,
            action: jumped as u8,
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append all captured rows to `path`, writing the header only when
    /// the destination holds no data yet. Returns the number of rows
    /// written.
    pub fn save(&self, path: &Path) -> Result<usize> {
        let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let mut out = BufWriter::new(file);
        if needs_header {
            writeln!(out, "{CSV_HEADER}")?;
        }
        for row in &self.rows {
            writeln!(out, "{}", row.to_csv())?;
        }
        out.flush()?;
        Ok(self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(bird_y: f64, jumped: bool) -> (Features, bool) {
        (Features::new(bird_y, 60.0, 210.0, 400.0, 50.0), jumped)
    }

    #[test]
    fn rows_serialize_in_column_order() {
        let (features, jumped) = sample_row(300.5, true);
        let row = FrameRow {
            features,
            action: jumped as u8,
        };
        assert_eq!(row.to_csv(), "300.5,60,210,400,350,135,150,1");
    }

    #[test]
    fn save_writes_header_once_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.csv");

        let mut recorder = Recorder::new();
        let (f, j) = sample_row(300.0, false);
        recorder.capture(f, j);
        let (f, j) = sample_row(293.0, true);
        recorder.capture(f, j);
        assert_eq!(recorder.save(&path).unwrap(), 2);

        let mut second = Recorder::new();
        let (f, j) = sample_row(288.0, false);
        second.capture(f, j);
        second.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].ends_with(",0"));
        assert!(lines[2].ends_with(",1"));
        // No second header in the appended block.
        assert!(!lines[1..].contains(&CSV_HEADER));
    }

    #[test]
    fn empty_file_still_receives_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();

        let mut recorder = Recorder::new();
        let (f, j) = sample_row(300.0, false);
        recorder.capture(f, j);
        recorder.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(CSV_HEADER));
    }
}
