use clap::Parser;
use colored::Colorize;
use deadpkg::analysis::{CycleDetector, DeadCycle, EntryPointDetector, LivenessAnalyzer};
use deadpkg::baseline::Baseline;
use deadpkg::{
    list_source_roots, BuildContext, Config, Diagnostics, GoOracle, ImportGraph,
    ParallelRegistryBuilder, RegistryBuilder, Reporter, UnresolvedPolicy, VisitOrder,
};
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// deadpkg - find Go packages that no command imports
#[derive(Parser, Debug)]
#[command(name = "deadpkg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Report unused standard library packages too
    #[arg(long)]
    std: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Go installation root (overrides $GOROOT)
    #[arg(long, value_name = "DIR")]
    goroot: Option<PathBuf>,

    /// GOPATH entry (can be specified multiple times, overrides $GOPATH)
    #[arg(long, value_name = "DIR")]
    gopath: Vec<PathBuf>,

    /// Extra source directory scanned like GOPATH/src (can be specified multiple times)
    #[arg(long = "src-dir", value_name = "DIR")]
    src_dir: Vec<PathBuf>,

    /// Directory patterns to skip, relative to each source root (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Import path pattern treated as an entry point (can be specified multiple times)
    #[arg(long = "entry-point", value_name = "PATTERN")]
    entry_point: Vec<String>,

    /// Extra build tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Target operating system (overrides $GOOS)
    #[arg(long)]
    goos: Option<String>,

    /// Target architecture (overrides $GOARCH)
    #[arg(long)]
    goarch: Option<String>,

    /// Treat cgo as disabled: files importing "C" are skipped
    #[arg(long)]
    no_cgo: bool,

    /// How imports of missing packages are reported
    #[arg(long, value_enum)]
    unresolved: Option<UnresolvedArg>,

    /// When a package is marked live during the walk
    #[arg(long, value_enum)]
    visit_order: Option<VisitOrderArg>,

    /// Also follow imports of external test packages (package foo_test)
    #[arg(long)]
    xtests: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Resolve directories in parallel
    #[arg(long)]
    parallel: bool,

    /// Detect and report import cycles made only of dead packages
    #[arg(long)]
    detect_cycles: bool,

    /// Baseline file; packages listed in it are not reported
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Generate a baseline file from current results
    #[arg(long, value_name = "FILE")]
    generate_baseline: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Plain,
    Terminal,
    Json,
}

impl From<OutputFormat> for deadpkg::ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Plain => deadpkg::ReportFormat::Plain,
            OutputFormat::Terminal => deadpkg::ReportFormat::Terminal,
            OutputFormat::Json => deadpkg::ReportFormat::Json,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum UnresolvedArg {
    /// Stay silent for pseudo-imports such as "C"
    SuppressPseudo,
    /// Report every import with no package
    ReportAll,
}

impl From<UnresolvedArg> for UnresolvedPolicy {
    fn from(arg: UnresolvedArg) -> Self {
        match arg {
            UnresolvedArg::SuppressPseudo => UnresolvedPolicy::SuppressPseudo,
            UnresolvedArg::ReportAll => UnresolvedPolicy::ReportAll,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum VisitOrderArg {
    Preorder,
    Postorder,
}

impl From<VisitOrderArg> for VisitOrder {
    fn from(arg: VisitOrderArg) -> Self {
        match arg {
            VisitOrderArg::Preorder => VisitOrder::Preorder,
            VisitOrderArg::Postorder => VisitOrder::Postorder,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("deadpkg v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    run_analysis(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        let cwd = std::env::current_dir().into_diagnostic()?;
        Config::from_default_locations(&cwd)?
    };

    // Override with CLI arguments
    if cli.goroot.is_some() {
        config.source.goroot = cli.goroot.clone();
    }
    if !cli.gopath.is_empty() {
        config.source.gopath = cli.gopath.clone();
    }
    config.source.src_dirs.extend(cli.src_dir.iter().cloned());
    config.exclude.extend(cli.exclude.iter().cloned());
    config.analysis.entry_points.extend(cli.entry_point.iter().cloned());
    config.build.tags.extend(cli.tags.iter().filter(|t| !t.is_empty()).cloned());

    if cli.goos.is_some() {
        config.build.goos = cli.goos.clone();
    }
    if cli.goarch.is_some() {
        config.build.goarch = cli.goarch.clone();
    }
    if cli.no_cgo {
        config.build.cgo_enabled = false;
    }
    if cli.std {
        config.analysis.report_std = true;
    }
    if let Some(policy) = cli.unresolved {
        config.analysis.unresolved = policy.into();
    }
    if let Some(order) = cli.visit_order {
        config.analysis.visit_order = order.into();
    }
    if cli.xtests {
        config.analysis.include_external_tests = true;
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Source roots
    let roots = list_source_roots(config);
    if roots.is_empty() {
        warn!("No source roots found; set GOROOT/GOPATH or pass --src-dir");
    }

    // Step 2: Build the package registry
    info!("Scanning {} source roots...", roots.len());
    let oracle = GoOracle::new(BuildContext::from_config(&config.build));
    let mut diagnostics = Diagnostics::new();

    let progress = scan_progress(cli.quiet);
    let registry = if cli.parallel {
        ParallelRegistryBuilder::new(&oracle, config)
            .with_progress(progress.clone())
            .build(&roots, &mut diagnostics)
    } else {
        RegistryBuilder::new(&oracle, config)
            .with_progress(progress.clone())
            .build(&roots, &mut diagnostics)
    };
    progress.finish_and_clear();

    // Step 3: Entry points
    let entry_points = EntryPointDetector::new(config).detect(&registry);

    // Step 4: Liveness
    let analyzer = LivenessAnalyzer::from_config(config);
    let (mut report, live) = analyzer.find_dead_with_live(&registry, &entry_points, &mut diagnostics);

    info!(
        "Liveness: {} live, {} registered, {} reported dead",
        live.len(),
        registry.len(),
        report.len()
    );

    // Step 5: Dead import cycles
    let cycles = if cli.detect_cycles {
        let graph = ImportGraph::from_registry(&registry, config.analysis.include_external_tests);
        CycleDetector::new().find_dead_cycles(&graph, &live)
    } else {
        Vec::new()
    };

    // Step 6: Generate baseline if requested
    if let Some(ref baseline_path) = cli.generate_baseline {
        let baseline = Baseline::from_report(&report);
        match baseline.save(baseline_path) {
            Ok(_) => {
                if !cli.quiet {
                    eprintln!(
                        "{}",
                        format!(
                            "Baseline generated: {} ({} packages)",
                            baseline_path.display(),
                            baseline.packages.len()
                        )
                        .green()
                    );
                }
            }
            Err(e) => eprintln!("{}: Failed to generate baseline: {}", "Error".red(), e),
        }
    }

    // Step 7: Filter by baseline if provided
    if let Some(ref baseline_path) = cli.baseline {
        match Baseline::load(baseline_path) {
            Ok(baseline) => {
                if !cli.quiet {
                    eprintln!("{}", format!("Baseline: {}", baseline.stats(&report)).cyan());
                }
                baseline.filter_new(&mut report);
            }
            Err(e) => eprintln!("{}: Failed to load baseline: {}", "Warning".yellow(), e),
        }
    }

    // Step 8: Diagnostics go to stderr
    if !cli.quiet {
        for diagnostic in diagnostics.iter() {
            eprintln!("{}", diagnostic);
        }
    }

    // Step 9: Report results
    let reporter = Reporter::new(cli.format.clone().into(), cli.output.clone());
    reporter.report(&report, &cycles)?;

    if cli.format == OutputFormat::Plain && !cli.quiet {
        print_cycles(&cycles);
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

fn scan_progress(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} directories scanned")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

/// Plain output keeps stdout to import paths, so cycles go to stderr
fn print_cycles(cycles: &[DeadCycle]) {
    for cycle in cycles {
        eprintln!(
            "{} {}",
            "dead import cycle:".yellow(),
            cycle.members.join(" -> ")
        );
    }
}
