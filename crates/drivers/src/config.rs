//! Layered TOML configuration.
//!
//! Priority (lowest to highest):
//! 1. built-in defaults
//! 2. XDG config: `~/.config/vehicle-inspect/config.toml`
//! 3. project config: `.vehicle-inspect.toml` (searched up from cwd)
//! 4. `--config <file>`
//! 5. CLI flags

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};
use vehicle_inspect_adapters::{BoxUnits, HttpDetectorConfig, DEFAULT_DETECTOR_ENDPOINT};
use vehicle_inspect_application::ServiceSettings;
use vehicle_inspect_domain::{
    AnnotationScope, AnnotationSettings, CostModel, OverlayShape, PairingPolicy, StrokeStyle,
};

const PROJECT_CONFIG_NAME: &str = ".vehicle-inspect.toml";
const DEFAULT_CATALOG_PATH: &str = "inspections.sqlite3";
const DEFAULT_TOKEN_ENV: &str = "HF_TOKEN";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const MAX_LINE_WIDTH: u32 = 64;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub detector: DetectorConfig,
    pub pricing: PricingConfig,
    pub pairing: PairingConfig,
    pub annotation: AnnotationConfig,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite database file.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    Http,
    Fixture,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub kind: Option<DetectorKind>,
    pub endpoint: Option<String>,
    /// Environment variable holding the bearer token.
    pub token_env: Option<String>,
    pub timeout_ms: Option<u64>,
    pub box_units: Option<BoxUnits>,
    /// JSON detections file, used when `kind = "fixture"`.
    pub fixture_path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub default_base_cost: Option<u32>,
    /// Per-label base costs, merged label by label across layers.
    pub base_costs: BTreeMap<String, u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    pub policy: Option<PairingPolicy>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub scope: Option<AnnotationScope>,
    pub shape: Option<OverlayShape>,
    /// `#rrggbb` or `#rrggbbaa`.
    pub color: Option<String>,
    pub line_width: Option<u32>,
}

/// Detector adapter chosen by configuration.
#[derive(Debug, Clone)]
pub enum DetectorChoice {
    Http(HttpDetectorConfig),
    Fixture(PathBuf),
}

/// Fully merged and validated settings, ready to wire the service.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub catalog_path: PathBuf,
    pub detector: DetectorChoice,
    pub service: ServiceSettings,
}

impl AppConfig {
    /// Loads XDG and project configs, then the explicit `--config` file.
    ///
    /// Missing or unreadable implicit files are skipped with a warning. An
    /// explicit file that cannot be read or parsed is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!(path = %xdg_path.display(), "loading XDG config");
                if let Some(xdg_config) = load_optional(&xdg_path) {
                    config.merge(xdg_config);
                }
            } else {
                debug!(path = %xdg_path.display(), "XDG config not found");
            }
        }

        if let Some(project_path) = find_project_config() {
            info!(path = %project_path.display(), "loading project config");
            if let Some(project_config) = load_optional(&project_path) {
                config.merge(project_config);
            }
        }

        if let Some(path) = explicit {
            info!(path = %path.display(), "loading config");
            config.merge(load_file(path)?);
        }

        Ok(config)
    }

    /// Values from `other` override values in `self` when present.
    pub fn merge(&mut self, other: Self) {
        self.catalog.path = other.catalog.path.or_else(|| self.catalog.path.take());

        self.detector.kind = other.detector.kind.or(self.detector.kind);
        self.detector.endpoint = other
            .detector
            .endpoint
            .or_else(|| self.detector.endpoint.take());
        self.detector.token_env = other
            .detector
            .token_env
            .or_else(|| self.detector.token_env.take());
        self.detector.timeout_ms = other.detector.timeout_ms.or(self.detector.timeout_ms);
        self.detector.box_units = other.detector.box_units.or(self.detector.box_units);
        self.detector.fixture_path = other
            .detector
            .fixture_path
            .or_else(|| self.detector.fixture_path.take());

        self.pricing.default_base_cost = other
            .pricing
            .default_base_cost
            .or(self.pricing.default_base_cost);
        self.pricing.base_costs.extend(other.pricing.base_costs);

        self.pairing.policy = other.pairing.policy.or(self.pairing.policy);

        self.annotation.scope = other.annotation.scope.or(self.annotation.scope);
        self.annotation.shape = other.annotation.shape.or(self.annotation.shape);
        self.annotation.color = other
            .annotation
            .color
            .or_else(|| self.annotation.color.take());
        self.annotation.line_width = other.annotation.line_width.or(self.annotation.line_width);
    }

    pub fn apply_cli_overrides(&mut self, catalog: Option<PathBuf>) {
        if let Some(path) = catalog {
            self.catalog.path = Some(path);
        }
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(ms) = self.detector.timeout_ms {
            if ms == 0 {
                return Err("detector.timeout_ms must be greater than 0".to_string());
            }
        }
        if self.detector.kind == Some(DetectorKind::Fixture) && self.detector.fixture_path.is_none()
        {
            return Err("detector.fixture_path is required when detector.kind = 'fixture'".to_string());
        }
        if let Some(endpoint) = &self.detector.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!(
                    "detector.endpoint must be an http(s) url, got '{endpoint}'"
                ));
            }
        }
        if let Some(width) = self.annotation.line_width {
            if width == 0 || width > MAX_LINE_WIDTH {
                return Err(format!(
                    "annotation.line_width must be 1-{MAX_LINE_WIDTH}, got {width}"
                ));
            }
        }
        if let Some(color) = &self.annotation.color {
            parse_hex_color(color)?;
        }
        Ok(())
    }

    /// Validates the merged layers and converts them into adapter and domain
    /// settings.
    pub fn resolve(self) -> Result<ResolvedConfig> {
        if let Err(message) = self.validate() {
            bail!("invalid configuration: {message}");
        }

        let mut cost_model = CostModel::default();
        if let Some(cost) = self.pricing.default_base_cost {
            cost_model.default_base_cost = cost;
        }
        for (label, cost) in self.pricing.base_costs {
            cost_model = cost_model.with_base_cost(label, cost);
        }
        cost_model
            .validate()
            .context("invalid configuration: pricing")?;

        let defaults = StrokeStyle::default();
        let color = match &self.annotation.color {
            Some(color) => parse_hex_color(color).map_err(anyhow::Error::msg)?,
            None => defaults.color,
        };
        let annotation = AnnotationSettings {
            scope: self.annotation.scope.unwrap_or_default(),
            shape: self.annotation.shape.unwrap_or_default(),
            stroke: StrokeStyle {
                color,
                line_width: self.annotation.line_width.unwrap_or(defaults.line_width),
            },
        };

        let detector = match self.detector.kind.unwrap_or(DetectorKind::Http) {
            DetectorKind::Fixture => match self.detector.fixture_path {
                Some(path) => DetectorChoice::Fixture(path),
                None => bail!("invalid configuration: detector.fixture_path is required"),
            },
            DetectorKind::Http => {
                let token_env = self
                    .detector
                    .token_env
                    .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());
                let token = std::env::var(&token_env)
                    .ok()
                    .filter(|token| !token.trim().is_empty());
                if token.is_none() {
                    warn!(env = %token_env, "detector token not set, calling endpoint unauthenticated");
                }
                DetectorChoice::Http(HttpDetectorConfig {
                    endpoint: self
                        .detector
                        .endpoint
                        .unwrap_or_else(|| DEFAULT_DETECTOR_ENDPOINT.to_string()),
                    token,
                    timeout: Duration::from_millis(
                        self.detector.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
                    ),
                    box_units: self.detector.box_units.unwrap_or_default(),
                })
            }
        };

        Ok(ResolvedConfig {
            catalog_path: self
                .catalog
                .path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            detector,
            service: ServiceSettings {
                cost_model,
                pairing: self.pairing.policy.unwrap_or_default(),
                annotation,
            },
        })
    }
}

fn parse_hex_color(value: &str) -> Result<[u8; 4], String> {
    let invalid = || format!("annotation.color must be '#rrggbb' or '#rrggbbaa', got '{value}'");
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
}

fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vehicle-inspect").join("config.toml"))
}

fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_NAME))
        .find(|path| path.exists())
}

fn load_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn load_optional(path: &Path) -> Option<AppConfig> {
    match load_file(path) {
        Ok(config) => Some(config),
        Err(error) => {
            warn!("{error:#}");
            None
        }
    }
}
