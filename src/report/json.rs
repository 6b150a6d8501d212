use crate::analysis::{DeadCycle, DeadReport};
use serde::Serialize;
use std::io::{self, Write};

/// JSON reporter for programmatic output
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, report: &DeadReport, cycles: &[DeadCycle], out: &mut dyn Write) -> io::Result<()> {
        let json_report = JsonReport::from_report(report, cycles);
        serde_json::to_writer_pretty(&mut *out, &json_report)?;
        writeln!(out)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    total_dead: usize,
    packages: Vec<JsonPackage<'a>>,
    cycles: &'a [DeadCycle],
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonPackage<'a> {
    import_path: &'a str,
    name: &'a str,
    dir: String,
    standard: bool,
}

#[derive(Serialize)]
struct JsonSummary {
    standard: usize,
    user: usize,
    cycles: usize,
}

impl<'a> JsonReport<'a> {
    fn from_report(report: &'a DeadReport, cycles: &'a [DeadCycle]) -> Self {
        let packages: Vec<JsonPackage<'a>> = report
            .packages()
            .iter()
            .map(|p| JsonPackage {
                import_path: &p.import_path,
                name: &p.name,
                dir: p.dir.to_string_lossy().to_string(),
                standard: p.is_standard,
            })
            .collect();

        let standard = report.standard_count();
        Self {
            version: "1.0",
            total_dead: report.len(),
            packages,
            cycles,
            summary: JsonSummary {
                standard,
                user: report.len() - standard,
                cycles: cycles.len(),
            },
        }
    }
}
