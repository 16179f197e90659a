use anyhow::{Context, Result};
use evo_types::GenerationSummary;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const STATS_HEADER: &str = "Gen,AvgPredFit,MaxPredFit,AvgPreyFit,MaxPreyFit,PreyEaten";

/// Appends one CSV row per generation. The header is flushed on its own
/// before the first row, so a failed row never repeats it.
pub struct StatsRecorder {
    path: PathBuf,
    wrote_header: bool,
}

impl StatsRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            wrote_header: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&mut self, summary: &GenerationSummary) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open stats file {}", self.path.display()))?;
        let mut csv = BufWriter::new(file);
        self.write_summary(&mut csv, summary)
            .with_context(|| format!("failed to write stats file {}", self.path.display()))
    }

    fn write_summary<W: Write>(&mut self, out: &mut W, summary: &GenerationSummary) -> Result<()> {
        if !self.wrote_header {
            writeln!(out, "{STATS_HEADER}")?;
            out.flush()?;
            self.wrote_header = true;
        }
        writeln!(
            out,
            "{generation},{avg_pred},{max_pred},{avg_prey},{max_prey},{eaten}",
            generation = summary.generation,
            avg_pred = summary.avg_predator_fitness,
            max_pred = summary.max_predator_fitness,
            avg_prey = summary.avg_prey_fitness,
            max_prey = summary.max_prey_fitness,
            eaten = summary.prey_eaten,
        )?;
        out.flush()?;
        Ok(())
    }
}
