use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Viewport spacing, jump and marker settings
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Syntax and highlight colors
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Viewer behavior configuration, in terminal cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Margin kept between a jump target and the viewport edge
    #[serde(default = "default_jump_padding")]
    pub jump_padding: f32,

    /// Smallest height of a scrollbar match marker
    #[serde(default = "default_min_marker_height")]
    pub min_marker_height: f32,

    /// Gap between the marker track and the scrollbar edges
    #[serde(default)]
    pub marker_inset: f32,

    /// Glyph advance ratio used for width estimates. Unset means the
    /// terminal's own ratio (1.0 for cells).
    #[serde(default)]
    pub heuristic_ratio: Option<f32>,

    /// Gap between the gutter and the code
    #[serde(default = "default_code_left_pad")]
    pub code_left_pad: f32,

    #[serde(default)]
    pub gutter_left_pad: f32,

    #[serde(default = "default_gutter_right_pad")]
    pub gutter_right_pad: f32,

    /// Draw the copy button in the corner of the viewport
    #[serde(default = "default_false")]
    pub show_copy_affordance: bool,
}

fn default_jump_padding() -> f32 {
    2.0
}

fn default_min_marker_height() -> f32 {
    1.0
}

fn default_code_left_pad() -> f32 {
    1.0
}

fn default_gutter_right_pad() -> f32 {
    1.0
}

fn default_false() -> bool {
    false
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            jump_padding: default_jump_padding(),
            min_marker_height: default_min_marker_height(),
            marker_inset: 0.0,
            heuristic_ratio: None,
            code_left_pad: default_code_left_pad(),
            gutter_left_pad: 0.0,
            gutter_right_pad: default_gutter_right_pad(),
            show_copy_affordance: default_false(),
        }
    }
}

/// Colors as RGB triples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_tag_name")]
    pub tag_name: [u8; 3],
    #[serde(default = "default_attr_name")]
    pub attr_name: [u8; 3],
    #[serde(default = "default_attr_value")]
    pub attr_value: [u8; 3],
    #[serde(default = "default_text")]
    pub text: [u8; 3],
    #[serde(default = "default_comment")]
    pub comment: [u8; 3],
    #[serde(default = "default_punctuation")]
    pub punctuation: [u8; 3],

    /// Base color of search highlights and scrollbar markers
    #[serde(default = "default_match_color")]
    pub match_color: [u8; 3],

    /// Alpha of match fills, 0.0 to 1.0
    #[serde(default = "default_fill_ratio")]
    pub fill_ratio: f32,

    /// Alpha of the active match border, 0.0 to 1.0
    #[serde(default = "default_border_ratio")]
    pub border_ratio: f32,

    #[serde(default = "default_background")]
    pub background: [u8; 3],
    #[serde(default = "default_gutter_background")]
    pub gutter_background: [u8; 3],
    #[serde(default = "default_gutter_separator")]
    pub gutter_separator: [u8; 3],
    #[serde(default = "default_line_number")]
    pub line_number: [u8; 3],
}

fn default_tag_name() -> [u8; 3] {
    [51, 153, 255]
}

fn default_attr_name() -> [u8; 3] {
    [156, 220, 254]
}

fn default_attr_value() -> [u8; 3] {
    [206, 145, 120]
}

fn default_text() -> [u8; 3] {
    [255, 255, 255]
}

fn default_comment() -> [u8; 3] {
    [106, 153, 85]
}

fn default_punctuation() -> [u8; 3] {
    [166, 166, 166]
}

fn default_match_color() -> [u8; 3] {
    [255, 215, 0]
}

fn default_fill_ratio() -> f32 {
    0.35
}

fn default_border_ratio() -> f32 {
    0.7
}

fn default_background() -> [u8; 3] {
    [30, 30, 30]
}

fn default_gutter_background() -> [u8; 3] {
    [37, 37, 38]
}

fn default_gutter_separator() -> [u8; 3] {
    [60, 60, 60]
}

fn default_line_number() -> [u8; 3] {
    [102, 102, 102]
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            tag_name: default_tag_name(),
            attr_name: default_attr_name(),
            attr_value: default_attr_value(),
            text: default_text(),
            comment: default_comment(),
            punctuation: default_punctuation(),
            match_color: default_match_color(),
            fill_ratio: default_fill_ratio(),
            border_ratio: default_border_ratio(),
            background: default_background(),
            gutter_background: default_gutter_background(),
            gutter_separator: default_gutter_separator(),
            line_number: default_line_number(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Load `config.json` from `config_dir`, falling back to defaults when the
    /// file is absent or unusable
    pub fn load_or_default(config_dir: &Path) -> Self {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = self.to_json()?;
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Pretty-printed JSON of the effective configuration
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let viewer = &self.viewer;
        let non_negative = [
            ("jump_padding", viewer.jump_padding),
            ("marker_inset", viewer.marker_inset),
            ("code_left_pad", viewer.code_left_pad),
            ("gutter_left_pad", viewer.gutter_left_pad),
            ("gutter_right_pad", viewer.gutter_right_pad),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be >= 0"
                )));
            }
        }

        if viewer.min_marker_height.is_nan() || viewer.min_marker_height <= 0.0 {
            return Err(ConfigError::ValidationError(
                "min_marker_height must be greater than 0".to_string(),
            ));
        }

        if let Some(ratio) = viewer.heuristic_ratio {
            if ratio.is_nan() || ratio <= 0.0 {
                return Err(ConfigError::ValidationError(
                    "heuristic_ratio must be greater than 0".to_string(),
                ));
            }
        }

        for (name, value) in [
            ("fill_ratio", self.theme.fill_ratio),
            ("border_ratio", self.theme.border_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0 and 1"
                )));
            }
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Directories the viewer reads from and writes to
///
/// Only `main` should build this from the system directories; everything else
/// receives it by parameter so tests can point it at a temp directory.
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// e.g. ~/.config/xmlview on Linux
    pub config_dir: PathBuf,

    /// Where the log file goes unless `--log-file` says otherwise
    pub log_dir: PathBuf,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    #[cfg(feature = "runtime")]
    pub fn from_system() -> std::io::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("xmlview");

        Ok(Self {
            config_dir,
            log_dir: std::env::temp_dir(),
        })
    }

    /// All paths point inside `temp_dir`
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            config_dir: temp_dir.join("config"),
            log_dir: temp_dir.join("log"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join("xmlview.log")
    }
}
