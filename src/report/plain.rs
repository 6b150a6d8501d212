use crate::analysis::DeadReport;
use std::io::{self, Write};

/// One import path per line, nothing else
pub struct PlainReporter;

impl PlainReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, report: &DeadReport, out: &mut dyn Write) -> io::Result<()> {
        for package in report.packages() {
            writeln!(out, "{}", package.import_path)?;
        }
        Ok(())
    }
}

impl Default for PlainReporter {
    fn default() -> Self {
        Self::new()
    }
}
