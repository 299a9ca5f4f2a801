use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub display: DisplayConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Leaf row height in display units
    pub row_height: u16,

    /// Group row height per nesting level; the last entry repeats for
    /// deeper levels. Within a level, height is always uniform.
    pub group_row_heights: Vec<u16>,

    /// Rows materialized beyond the visible window on each end
    pub overscan_rows: usize,

    /// Columns materialized beyond the visible window on each side
    pub overscan_cols: usize,

    /// Reserve column 0 for the checkbox selection column
    pub show_select_column: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Cell selection style for the bundled terminal renderer
    pub cell_selection_style: CellSelectionStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CellSelectionStyle {
    /// Foreground color for the selected cell (e.g. "yellow", "cyan")
    pub foreground: String,

    /// Whether to use a background color
    pub use_background: bool,

    /// Background color if use_background is true
    pub background: String,

    /// Whether to bold the text
    pub bold: bool,

    /// Whether to render the selected cell in inverse video
    pub reversed: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            row_height: 1,
            group_row_heights: vec![1],
            overscan_rows: 4,
            overscan_cols: 2,
            show_select_column: true,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            cell_selection_style: CellSelectionStyle::default(),
        }
    }
}

impl Default for CellSelectionStyle {
    fn default() -> Self {
        Self {
            foreground: "yellow".to_string(),
            use_background: false,
            background: "cyan".to_string(),
            bold: true,
            reversed: true,
        }
    }
}

impl DisplayConfig {
    /// Height of a group row at the given nesting level
    pub fn group_row_height(&self, level: usize) -> u16 {
        self.group_row_heights
            .get(level)
            .or(self.group_row_heights.last())
            .copied()
            .unwrap_or(self.row_height)
    }
}

impl GridConfig {
    /// Load config from the default location, creating it on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config at {}", config_path.display()))?;
        let config: GridConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", config_path.display()))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config at {}", config_path.display()))?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("data-grid").join("config.toml"))
    }
}
