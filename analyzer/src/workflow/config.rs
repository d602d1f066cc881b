use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thrustcore::SummaryOptions;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub valid_only: bool,
    /// Load cells mounted in compression report thrust as negative values.
    pub use_absolute: bool,
    pub show_invalid: bool,
    pub host: String,
    pub port: u16,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            valid_only: false,
            use_absolute: true,
            show_invalid: false,
            host: "127.0.0.1".into(),
            port: 8050,
        }
    }
}

impl AnalyzerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading analyzer config {}", path_ref.display()))?;
        let config: AnalyzerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing analyzer config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions::new(self.valid_only, self.use_absolute)
    }

    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}
