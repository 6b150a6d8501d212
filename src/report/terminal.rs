use crate::analysis::{DeadCycle, DeadPackage, DeadReport};
use colored::Colorize;
use std::io::{self, Write};

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Show the directory of each package
    show_dirs: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { show_dirs: true }
    }

    pub fn with_dirs(mut self, show: bool) -> Self {
        self.show_dirs = show;
        self
    }

    pub fn write(&self, report: &DeadReport, cycles: &[DeadCycle], out: &mut dyn Write) -> io::Result<()> {
        if report.is_empty() {
            writeln!(out, "{}", "No dead packages found!".green().bold())?;
            return Ok(());
        }

        writeln!(out)?;
        writeln!(
            out,
            "{}",
            format!("Found {} dead packages:", report.len()).yellow().bold()
        )?;
        writeln!(out)?;

        let (standard, user): (Vec<&DeadPackage>, Vec<&DeadPackage>) =
            report.packages().iter().partition(|p| p.is_standard);

        if !user.is_empty() {
            writeln!(out, "{}", "Packages".cyan().bold())?;
            for package in &user {
                self.write_package(package, out)?;
            }
            writeln!(out)?;
        }

        if !standard.is_empty() {
            writeln!(out, "{}", "Standard library".cyan().bold())?;
            for package in &standard {
                self.write_package(package, out)?;
            }
            writeln!(out)?;
        }

        if !cycles.is_empty() {
            self.write_cycles(cycles, out)?;
        }

        writeln!(out, "{}", "─".repeat(60).dimmed())?;
        writeln!(
            out,
            "Summary: {} dead ({} standard, {} user)",
            report.len(),
            standard.len(),
            user.len()
        )?;
        Ok(())
    }

    fn write_package(&self, package: &DeadPackage, out: &mut dyn Write) -> io::Result<()> {
        if self.show_dirs && !package.dir.as_os_str().is_empty() {
            writeln!(
                out,
                "  {} {} {}",
                "○".yellow(),
                package.import_path.white(),
                package.dir.display().to_string().dimmed()
            )
        } else {
            writeln!(out, "  {} {}", "○".yellow(), package.import_path.white())
        }
    }

    fn write_cycles(&self, cycles: &[DeadCycle], out: &mut dyn Write) -> io::Result<()> {
        let total: usize = cycles.iter().map(DeadCycle::size).sum();
        writeln!(
            out,
            "{}",
            format!("Dead import cycles: {} ({} packages)", cycles.len(), total)
                .yellow()
                .bold()
        )?;

        for (i, cycle) in cycles.iter().take(5).enumerate() {
            writeln!(
                out,
                "  {}",
                format!("Cycle #{} ({} packages):", i + 1, cycle.size()).dimmed()
            )?;
            for member in cycle.members.iter().take(5) {
                writeln!(out, "    • {}", member)?;
            }
            if cycle.members.len() > 5 {
                writeln!(out, "    ... and {} more", cycle.members.len() - 5)?;
            }
        }
        if cycles.len() > 5 {
            writeln!(out, "  ... and {} more cycles", cycles.len() - 5)?;
        }
        writeln!(out)
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
