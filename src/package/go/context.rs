use super::constraint::{parse_go_build, parse_plus_build, ConstraintError};
use super::header::FileHeader;
use crate::config::BuildConfig;
use tracing::trace;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// The target a package is resolved for: decides which files are buildable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
    pub cgo_enabled: bool,
    /// Extra satisfied tags
    pub tags: Vec<String>,
}

impl BuildContext {
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            cgo_enabled: true,
            tags: Vec::new(),
        }
    }

    /// The host platform, spelled the way Go spells it
    pub fn host() -> Self {
        let goos = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        let goarch = match std::env::consts::ARCH {
            "x86_64" => "amd64",
            "x86" => "386",
            "aarch64" => "arm64",
            "powerpc64" => "ppc64",
            "loongarch64" => "loong64",
            "wasm32" => "wasm",
            other => other,
        };
        Self::new(goos, goarch)
    }

    /// Build from configuration, with `$GOOS` / `$GOARCH` and then the host as fallbacks
    pub fn from_config(config: &BuildConfig) -> Self {
        let host = Self::host();
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        Self {
            goos: config.goos.clone().or_else(|| env("GOOS")).unwrap_or(host.goos),
            goarch: config.goarch.clone().or_else(|| env("GOARCH")).unwrap_or(host.goarch),
            cgo_enabled: config.cgo_enabled,
            tags: config.tags.clone(),
        }
    }

    pub fn with_cgo(mut self, enabled: bool) -> Self {
        self.cgo_enabled = enabled;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a single build tag is satisfied
    pub fn matches_tag(&self, tag: &str) -> bool {
        if tag == self.goos || tag == self.goarch {
            return true;
        }

        match tag {
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "linux" => self.goos == "android",
            "solaris" => self.goos == "illumos",
            "darwin" => self.goos == "ios",
            "cgo" => self.cgo_enabled,
            "gc" => true,
            _ if is_release_tag(tag) => true,
            _ => self.tags.iter().any(|t| t == tag),
        }
    }

    /// Check the `_GOOS`, `_GOARCH` and `_GOOS_GOARCH` file name suffixes
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.split('.').next().unwrap_or(file_name);

        // Everything before the first '_' is ignored
        let Some(first) = stem.find('_') else {
            return true;
        };
        let mut parts: Vec<&str> = stem[first..].split('_').collect();
        if parts.last() == Some(&"test") {
            parts.pop();
        }

        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.matches_tag(parts[n - 2]) && self.matches_tag(parts[n - 1]);
        }
        if n >= 1 && (KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1])) {
            return self.matches_tag(parts[n - 1]);
        }
        true
    }

    /// Evaluate a file's header constraints; `//go:build` wins over `// +build`
    pub fn matches_header(&self, header: &FileHeader) -> Result<bool, ConstraintError> {
        let has_tag = |tag: &str| self.matches_tag(tag);

        if let Some(expr) = &header.go_build {
            return Ok(parse_go_build(expr)?.eval(&has_tag));
        }

        for line in &header.plus_build {
            match parse_plus_build(line) {
                Ok(Some(expr)) if !expr.eval(&has_tag) => return Ok(false),
                Ok(_) => {}
                // go/build ignores +build lines it cannot parse
                Err(e) => trace!("Ignoring +build line {:?}: {}", line, e),
            }
        }
        Ok(true)
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::host()
    }
}

/// `go1.N` release tags; every release is assumed to be available
fn is_release_tag(tag: &str) -> bool {
    tag.strip_prefix("go1.")
        .map(|minor| !minor.is_empty() && minor.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}
