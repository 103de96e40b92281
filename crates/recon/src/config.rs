use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub trim: TrimConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

// ---------------------------------------------------------------------------
// Sources + trimming
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SourcesConfig {
    pub primary: SourceConfig,
    pub secondary: SourceConfig,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    pub file: String,
}

/// Rows stripped from each source before classification (collaborator-side
/// header/footer trimming).
#[derive(Debug, Clone, Deserialize)]
pub struct TrimConfig {
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
    #[serde(default = "default_footer_rows")]
    pub footer_rows: usize,
}

fn default_header_rows() -> usize {
    1
}

fn default_footer_rows() -> usize {
    2
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self { header_rows: default_header_rows(), footer_rows: default_footer_rows() }
    }
}

// ---------------------------------------------------------------------------
// Report + throttle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_sheet_title")]
    pub sheet_title: String,
    #[serde(default)]
    pub show_matches: bool,
    /// Slack rows added when a fresh report worksheet is created.
    #[serde(default = "default_extra_rows")]
    pub extra_rows: u32,
}

fn default_sheet_title() -> String {
    "Report results".into()
}

fn default_extra_rows() -> u32 {
    150
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sheet_title: default_sheet_title(),
            show_matches: false,
            extra_rows: default_extra_rows(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_quota")]
    pub quota: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_quota() -> u32 {
    60
}

fn default_window_secs() -> u64 {
    60
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { quota: default_quota(), window_secs: default_window_secs() }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }
        if self.sources.primary.file.is_empty() {
            return Err(ReconError::ConfigValidation(
                "sources.primary.file must not be empty".into(),
            ));
        }
        if self.sources.secondary.file.is_empty() {
            return Err(ReconError::ConfigValidation(
                "sources.secondary.file must not be empty".into(),
            ));
        }
        if self.report.sheet_title.is_empty() {
            return Err(ReconError::ConfigValidation(
                "report.sheet_title must not be empty".into(),
            ));
        }
        if self.throttle.quota == 0 {
            return Err(ReconError::ConfigValidation("throttle.quota must be nonzero".into()));
        }
        if self.throttle.window_secs == 0 {
            return Err(ReconError::ConfigValidation(
                "throttle.window_secs must be nonzero".into(),
            ));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn for_tests(name: &str) -> Self {
        Self {
            name: name.into(),
            sources: SourcesConfig {
                primary: SourceConfig { file: "primary.csv".into() },
                secondary: SourceConfig { file: "secondary.csv".into() },
            },
            trim: TrimConfig::default(),
            report: ReportConfig::default(),
            throttle: ThrottleConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
