use crate::analysis::{UnresolvedPolicy, VisitOrder};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Configuration for a deadpkg run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where packages are looked up
    pub source: SourceConfig,

    /// Target platform used when deciding which files are buildable
    pub build: BuildConfig,

    /// Liveness analysis policies
    pub analysis: AnalysisConfig,

    /// Directory patterns to skip while walking source roots
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Go installation root; falls back to `$GOROOT`
    pub goroot: Option<PathBuf>,

    /// Workspace roots; falls back to `$GOPATH`, then `$HOME/go`
    pub gopath: Vec<PathBuf>,

    /// Additional source directories, treated like `GOPATH/src`
    pub src_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Target operating system; falls back to `$GOOS`, then the host
    pub goos: Option<String>,

    /// Target architecture; falls back to `$GOARCH`, then the host
    pub goarch: Option<String>,

    /// Extra build tags considered satisfied
    pub tags: Vec<String>,

    /// Whether files importing "C" take part in the build
    pub cgo_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Report unused standard library packages too
    pub report_std: bool,

    /// How imports with no matching package are reported
    pub unresolved: UnresolvedPolicy,

    /// When a package joins the live set during the walk
    pub visit_order: VisitOrder,

    /// Imports that never resolve to a package by design
    pub pseudo_imports: Vec<String>,

    /// Follow imports of external test packages (`package foo_test`)
    pub include_external_tests: bool,

    /// Import path patterns treated as roots in addition to commands
    pub entry_points: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            goos: None,
            goarch: None,
            tags: vec![],
            cgo_enabled: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            report_std: false,
            unresolved: UnresolvedPolicy::default(),
            visit_order: VisitOrder::default(),
            pseudo_imports: vec!["C".to_string()],
            include_external_tests: false,
            entry_points: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(dir: &Path) -> Result<Self> {
        let default_names = [
            ".deadpkg.yml",
            ".deadpkg.yaml",
            ".deadpkg.toml",
            "deadpkg.yml",
            "deadpkg.yaml",
            "deadpkg.toml",
        ];

        for name in &default_names {
            let path = dir.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// The Go installation root: configured, then `$GOROOT`, then whatever
    /// the `go` tool on `PATH` reports
    pub fn goroot(&self) -> Option<PathBuf> {
        self.source
            .goroot
            .clone()
            .or_else(|| non_empty_env("GOROOT").map(PathBuf::from))
            .or_else(goroot_from_go_tool)
    }

    /// The GOPATH entries, in lookup order
    pub fn gopath(&self) -> Vec<PathBuf> {
        if !self.source.gopath.is_empty() {
            return self.source.gopath.clone();
        }

        if let Some(value) = std::env::var_os("GOPATH").filter(|v| !v.is_empty()) {
            return std::env::split_paths(&value).collect();
        }

        std::env::var_os("HOME")
            .filter(|v| !v.is_empty())
            .map(|home| vec![PathBuf::from(home).join("go")])
            .unwrap_or_default()
    }

    /// Check whether a directory, given relative to its source root, is excluded
    pub fn should_exclude(&self, relative: &str) -> bool {
        if self.exclude.is_empty() {
            return false;
        }

        // "dir/" lets patterns ending in "/**" match the directory itself
        let as_dir = format!("{}/", relative);
        self.exclude
            .iter()
            .any(|pattern| glob_match(pattern, relative) || glob_match(pattern, &as_dir))
    }

    /// Check whether an import path is a configured extra root
    pub fn is_configured_entry_point(&self, import_path: &str) -> bool {
        self.analysis
            .entry_points
            .iter()
            .any(|pattern| glob_match(pattern, import_path))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn goroot_from_go_tool() -> Option<PathBuf> {
    let output = match Command::new("go").args(["env", "GOROOT"]).output() {
        Ok(output) => output,
        Err(e) => {
            debug!("Could not run `go env GOROOT`: {}", e);
            return None;
        }
    };

    if !output.status.success() {
        debug!(
            "`go env GOROOT` failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let goroot = parse_go_env_output(&output.stdout);
    if goroot.is_none() {
        debug!("`go env GOROOT` printed nothing");
    }
    goroot
}

/// First non-empty line of `go env` output
fn parse_go_env_output(stdout: &[u8]) -> Option<PathBuf> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}

/// Glob matching over '/'-separated paths.
///
/// `*` matches within one path element, `**` matches across elements and
/// `?` matches a single character.
fn glob_match(pattern: &str, text: &str) -> bool {
    match_bytes(pattern.as_bytes(), text.as_bytes())
}

fn match_bytes(pattern: &[u8], text: &[u8]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((b'*', rest)) => {
            if let Some(rest) = rest.strip_prefix(b"*") {
                // "**/" may also stand for no directories at all
                if let Some(after) = rest.strip_prefix(b"/") {
                    if match_bytes(after, text) {
                        return true;
                    }
                }
                (0..=text.len()).any(|i| match_bytes(rest, &text[i..]))
            } else {
                for i in 0..=text.len() {
                    if match_bytes(rest, &text[i..]) {
                        return true;
                    }
                    if i < text.len() && text[i] == b'/' {
                        break;
                    }
                }
                false
            }
        }
        Some((b'?', rest)) => match text.split_first() {
            Some((&c, tail)) if c != b'/' => match_bytes(rest, tail),
            _ => false,
        },
        Some((&c, rest)) => match text.split_first() {
            Some((&t, tail)) if t == c => match_bytes(rest, tail),
            _ => false,
        },
    }
}
