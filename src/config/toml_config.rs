use crate::utils::error::{PlacerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "placer.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerConfig {
    pub layout: LayoutConfig,
    pub selection: SelectionConfig,
}

/// 目錄中各檔案的命名規則
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub roster: String,
    pub placement_extension: String,
    pub extra_extension: String,
    pub sequence_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            roster: "places".to_string(),
            placement_extension: "placement".to_string(),
            extra_extension: "extra".to_string(),
            sequence_width: 6,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub seed: Option<u64>,
}

impl PlacerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                PlacerError::not_found(format!("config file {}", path.as_ref().display()))
            }
            _ => PlacerError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PlacerError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Loads `placer.toml` from `dir` when present, defaults otherwise.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let candidate = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!("Loading configuration from {}", candidate.display());
            Self::from_file(candidate)
        } else {
            Ok(Self::default())
        }
    }
}

impl Validate for PlacerConfig {
    fn validate(&self) -> Result<()> {
        self.layout.validate()
    }
}

impl Validate for LayoutConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_file_name("layout.roster", &self.roster)?;
        validation::validate_extension("layout.placement_extension", &self.placement_extension)?;
        validation::validate_extension("layout.extra_extension", &self.extra_extension)?;
        validation::validate_range("layout.sequence_width", self.sequence_width, 1, 18)?;

        if self.placement_extension == self.extra_extension {
            return Err(PlacerError::ConfigError {
                field: "layout.extra_extension".to_string(),
                message: "placement and extra records need different extensions".to_string(),
            });
        }

        // 名單檔不能被當成紀錄檔列出
        let roster_ext = Path::new(&self.roster)
            .extension()
            .and_then(|ext| ext.to_str());
        if roster_ext == Some(self.placement_extension.as_str())
            || roster_ext == Some(self.extra_extension.as_str())
        {
            return Err(PlacerError::ConfigError {
                field: "layout.roster".to_string(),
                message: format!("`{}` would be listed as a record file", self.roster),
            });
        }

        Ok(())
    }
}
