use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::linking::{LinkThresholds, ScoringWeights, TieBreak};

/// The four scoring weights must sum to 1.0 within this tolerance.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Absorbs float rounding so sums such as 0.39 + 0.3 + 0.2 + 0.1 sit inside the bound.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Recommended range for `linking.related_tools_per_page`.
pub const RELATED_TOOLS_PER_PAGE_RANGE: std::ops::RangeInclusive<usize> = 3..=6;

/// Every environment key read by [`AppConfig::load`].
pub const ENV_KEYS: &[&str] = &[
    "LINKWISE_CATALOG_ITEMS_PATH",
    "LINKWISE_CATALOG_RELATIONSHIPS_PATH",
    "LINKWISE_CATALOG_EDITORIAL_PATH",
    "LINKWISE_RELATED_TOOLS_PER_PAGE",
    "LINKWISE_MIN_LINKS_PER_TOOL",
    "LINKWISE_MAX_LINKS_PER_TOOL",
    "LINKWISE_TIE_BREAK",
    "LINKWISE_LOGGING_LEVEL",
    "LINKWISE_LOGGING_FORMAT",
    "LINKWISE_LOG_LEVEL",
    "LINKWISE_LOG_FORMAT",
];

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub linking: LinkingConfig,
    pub logging: LoggingConfig,
}

/// Input locations. Unset item and relationship paths select the built-in demo catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    pub items_path: Option<PathBuf>,
    pub relationships_path: Option<PathBuf>,
    pub editorial_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkingConfig {
    pub weights: ScoringWeights,
    pub thresholds: LinkThresholds,
    pub min_links_per_tool: u32,
    pub max_links_per_tool: u32,
    pub related_tools_per_page: usize,
    /// Standard deviation of inbound counts at or above which the audit warns.
    pub variance_warning: f64,
    pub tie_break: TieBreak,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub items_path: Option<PathBuf>,
    pub relationships_path: Option<PathBuf>,
    pub editorial_path: Option<PathBuf>,
    pub related_tools_per_page: Option<usize>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Non-fatal configuration findings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigWarning {
    RelatedToolsPerPageOutOfRange { value: usize },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelatedToolsPerPageOutOfRange { value } => write!(
                f,
                "linking.related_tools_per_page = {value} is outside the recommended range {}..={}",
                RELATED_TOOLS_PER_PAGE_RANGE.start(),
                RELATED_TOOLS_PER_PAGE_RANGE.end()
            ),
        }
    }
}

/// Linking configuration that passed validation. Engines only accept this type.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedLinking {
    config: LinkingConfig,
    warnings: Vec<ConfigWarning>,
}

impl ValidatedLinking {
    pub fn config(&self) -> &LinkingConfig {
        &self.config
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.config.weights
    }

    pub fn thresholds(&self) -> &LinkThresholds {
        &self.config.thresholds
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            thresholds: LinkThresholds::default(),
            min_links_per_tool: 3,
            max_links_per_tool: 15,
            related_tools_per_page: 4,
            variance_warning: 3.0,
            tie_break: TieBreak::CatalogOrder,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl std::str::FromStr for TieBreak {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "catalog_order" => Ok(Self::CatalogOrder),
            "item_id" => Ok(Self::ItemId),
            other => Err(ConfigError::Validation(format!(
                "unsupported tie break `{other}` (expected catalog_order|item_id)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("linkwise.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(items_path) = catalog.items_path {
                self.catalog.items_path = Some(items_path);
            }
            if let Some(relationships_path) = catalog.relationships_path {
                self.catalog.relationships_path = Some(relationships_path);
            }
            if let Some(editorial_path) = catalog.editorial_path {
                self.catalog.editorial_path = Some(editorial_path);
            }
        }

        if let Some(linking) = patch.linking {
            if let Some(weights) = linking.weights {
                if let Some(same_category) = weights.same_category {
                    self.linking.weights.same_category = same_category;
                }
                if let Some(workflow) = weights.workflow {
                    self.linking.weights.workflow = workflow;
                }
                if let Some(underlinked) = weights.underlinked {
                    self.linking.weights.underlinked = underlinked;
                }
                if let Some(popular) = weights.popular {
                    self.linking.weights.popular = popular;
                }
            }
            if let Some(thresholds) = linking.thresholds {
                if let Some(orphan) = thresholds.orphan {
                    self.linking.thresholds.orphan = orphan;
                }
                if let Some(underlinked) = thresholds.underlinked {
                    self.linking.thresholds.underlinked = underlinked;
                }
                if let Some(well_linked) = thresholds.well_linked {
                    self.linking.thresholds.well_linked = well_linked;
                }
                if let Some(overlinked) = thresholds.overlinked {
                    self.linking.thresholds.overlinked = overlinked;
                }
            }
            if let Some(min_links_per_tool) = linking.min_links_per_tool {
                self.linking.min_links_per_tool = min_links_per_tool;
            }
            if let Some(max_links_per_tool) = linking.max_links_per_tool {
                self.linking.max_links_per_tool = max_links_per_tool;
            }
            if let Some(related_tools_per_page) = linking.related_tools_per_page {
                self.linking.related_tools_per_page = related_tools_per_page;
            }
            if let Some(variance_warning) = linking.variance_warning {
                self.linking.variance_warning = variance_warning;
            }
            if let Some(tie_break) = linking.tie_break {
                self.linking.tie_break = tie_break;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LINKWISE_CATALOG_ITEMS_PATH") {
            self.catalog.items_path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("LINKWISE_CATALOG_RELATIONSHIPS_PATH") {
            self.catalog.relationships_path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("LINKWISE_CATALOG_EDITORIAL_PATH") {
            self.catalog.editorial_path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("LINKWISE_RELATED_TOOLS_PER_PAGE") {
            self.linking.related_tools_per_page =
                parse_usize("LINKWISE_RELATED_TOOLS_PER_PAGE", &value)?;
        }
        if let Some(value) = read_env("LINKWISE_MIN_LINKS_PER_TOOL") {
            self.linking.min_links_per_tool = parse_u32("LINKWISE_MIN_LINKS_PER_TOOL", &value)?;
        }
        if let Some(value) = read_env("LINKWISE_MAX_LINKS_PER_TOOL") {
            self.linking.max_links_per_tool = parse_u32("LINKWISE_MAX_LINKS_PER_TOOL", &value)?;
        }
        if let Some(value) = read_env("LINKWISE_TIE_BREAK") {
            self.linking.tie_break = value.parse()?;
        }

        let log_level =
            read_env("LINKWISE_LOGGING_LEVEL").or_else(|| read_env("LINKWISE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LINKWISE_LOGGING_FORMAT").or_else(|| read_env("LINKWISE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(items_path) = overrides.items_path {
            self.catalog.items_path = Some(items_path);
        }
        if let Some(relationships_path) = overrides.relationships_path {
            self.catalog.relationships_path = Some(relationships_path);
        }
        if let Some(editorial_path) = overrides.editorial_path {
            self.catalog.editorial_path = Some(editorial_path);
        }
        if let Some(related_tools_per_page) = overrides.related_tools_per_page {
            self.linking.related_tools_per_page = related_tools_per_page;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        check_linking(&self.linking)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

impl LinkingConfig {
    /// Fail-fast validation; warnings are logged and kept on the result.
    pub fn validate(&self) -> Result<ValidatedLinking, ConfigError> {
        let warnings = check_linking(self)?;
        for warning in &warnings {
            warn!(event_name = "config.linking.warning", warning = %warning, "linking config warning");
        }
        Ok(ValidatedLinking { config: self.clone(), warnings })
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("linkwise.toml"), PathBuf::from("config/linkwise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.items_path.is_some() != catalog.relationships_path.is_some() {
        return Err(ConfigError::Validation(
            "catalog.items_path and catalog.relationships_path must be set together".to_string(),
        ));
    }
    Ok(())
}

fn check_linking(linking: &LinkingConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let weights = &linking.weights;
    for (name, value) in weights.named() {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "linking.weights.{name} must be a non-negative finite number (got {value})"
            )));
        }
    }

    let sum = weights.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE + WEIGHT_SUM_EPSILON {
        return Err(ConfigError::Validation(format!(
            "linking.weights must sum to 1.0 (±0.01), got {sum:.4}"
        )));
    }

    let thresholds = &linking.thresholds;
    let ordered = thresholds.orphan < thresholds.underlinked
        && thresholds.underlinked <= thresholds.well_linked
        && thresholds.well_linked < thresholds.overlinked;
    if !ordered {
        return Err(ConfigError::Validation(format!(
            "linking.thresholds must satisfy orphan < underlinked <= well_linked < overlinked \
             (got {}/{}/{}/{})",
            thresholds.orphan, thresholds.underlinked, thresholds.well_linked, thresholds.overlinked
        )));
    }

    if linking.min_links_per_tool >= linking.max_links_per_tool {
        return Err(ConfigError::Validation(format!(
            "linking.min_links_per_tool ({}) must be lower than linking.max_links_per_tool ({})",
            linking.min_links_per_tool, linking.max_links_per_tool
        )));
    }

    if !linking.variance_warning.is_finite() || linking.variance_warning < 0.0 {
        return Err(ConfigError::Validation(
            "linking.variance_warning must be a non-negative finite number".to_string(),
        ));
    }

    let mut warnings = Vec::new();
    if !RELATED_TOOLS_PER_PAGE_RANGE.contains(&linking.related_tools_per_page) {
        warnings.push(ConfigWarning::RelatedToolsPerPageOutOfRange {
            value: linking.related_tools_per_page,
        });
    }

    Ok(warnings)
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    linking: Option<LinkingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogPatch {
    items_path: Option<PathBuf>,
    relationships_path: Option<PathBuf>,
    editorial_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkingPatch {
    weights: Option<WeightsPatch>,
    thresholds: Option<ThresholdsPatch>,
    min_links_per_tool: Option<u32>,
    max_links_per_tool: Option<u32>,
    related_tools_per_page: Option<usize>,
    variance_warning: Option<f64>,
    tie_break: Option<TieBreak>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WeightsPatch {
    same_category: Option<f64>,
    workflow: Option<f64>,
    underlinked: Option<f64>,
    popular: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdsPatch {
    orphan: Option<u32>,
    underlinked: Option<u32>,
    well_linked: Option<u32>,
    overlinked: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
