mod loader;

pub use loader::{AnalysisConfig, BuildConfig, Config, SourceConfig};
