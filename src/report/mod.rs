mod json;
mod plain;
mod terminal;

pub use json::JsonReporter;
pub use plain::PlainReporter;
pub use terminal::TerminalReporter;

use crate::analysis::{DeadCycle, DeadReport};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One import path per line
    #[default]
    Plain,
    Terminal,
    Json,
}

/// Reporter for outputting dead package analysis results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self { format, output_path }
    }

    /// Write the report to the output file, or stdout when none was given
    pub fn report(&self, report: &DeadReport, cycles: &[DeadCycle]) -> Result<()> {
        match &self.output_path {
            Some(path) => {
                let file = File::create(path)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to create output file: {}", path.display()))?;
                let mut out = BufWriter::new(file);
                self.write(report, cycles, &mut out).into_diagnostic()?;
                out.flush().into_diagnostic()
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                self.write(report, cycles, &mut out).into_diagnostic()?;
                out.flush().into_diagnostic()
            }
        }
    }

    pub fn write(&self, report: &DeadReport, cycles: &[DeadCycle], out: &mut dyn Write) -> io::Result<()> {
        match &self.format {
            ReportFormat::Plain => PlainReporter::new().write(report, out),
            ReportFormat::Terminal => TerminalReporter::new().write(report, cycles, out),
            ReportFormat::Json => JsonReporter::new().write(report, cycles, out),
        }
    }
}
