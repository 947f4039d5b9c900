//! Configuration types for painel.
//!
//! [`Config::load`] layers, in order: the embedded defaults below, the user
//! file `$XDG_CONFIG_HOME/painel/config.toml` (optional), an explicit file
//! passed on the command line, and `PAINEL__SECTION__KEY` environment
//! variables. [`Config::defaults`] returns the embedded defaults without
//! touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r##"
[server]
bind = "127.0.0.1:3000"

[store]
path          = "posts.json"
seed_examples = true

[admin]
password = "changeme"

[normalizer]
row_label_fields   = ["label", "city"]
point_label_fields = ["city", "label"]
unknown_label      = "Unknown"
months = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
]

[render]
palette               = ["#0ea5e9", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#6366f1"]
bar_value_label       = "Quantidade"
line_value_label      = "Valor"
pie_percent_threshold = 0.05

[ui]
topic_pane_width_pct = 25
post_pane_width_pct  = 30
"##;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub normalizer: NormalizerSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:3000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON document holding every post. Falls back to memory when unusable.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Seed the two example indicators when the store starts empty.
    #[serde(default = "default_seed_examples")]
    pub seed_examples: bool,
}

fn default_store_path() -> PathBuf { PathBuf::from("posts.json") }
fn default_seed_examples() -> bool { true }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            seed_examples: default_seed_examples(),
        }
    }
}

/// `[admin]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Shared password required on mutating API routes.
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_password() -> String { "changeme".to_string() }

impl Default for AdminConfig {
    fn default() -> Self {
        Self { password: default_password() }
    }
}

/// `[normalizer]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NormalizerSettings {
    /// Fields holding the category label of a flat row, in lookup order.
    #[serde(default = "default_row_label_fields")]
    pub row_label_fields: Vec<String>,
    /// Fields identifying the category of a nested-values point, in lookup order.
    #[serde(default = "default_point_label_fields")]
    pub point_label_fields: Vec<String>,
    /// Placeholder for flat rows that carry no label at all.
    #[serde(default = "default_unknown_label")]
    pub unknown_label: String,
    /// Calendar month names, January first, used to repair legacy month order.
    #[serde(default = "default_months")]
    pub months: Vec<String>,
}

fn default_row_label_fields() -> Vec<String> { vec!["label".to_string(), "city".to_string()] }
fn default_point_label_fields() -> Vec<String> { vec!["city".to_string(), "label".to_string()] }
fn default_unknown_label() -> String { "Unknown".to_string() }
fn default_months() -> Vec<String> {
    [
        "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto",
        "Setembro", "Outubro", "Novembro", "Dezembro",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            row_label_fields: default_row_label_fields(),
            point_label_fields: default_point_label_fields(),
            unknown_label: default_unknown_label(),
            months: default_months(),
        }
    }
}

/// `[render]` section. Injected into every render surface; there is no
/// module-level palette.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    /// Display name of a bar series keyed `value`.
    #[serde(default = "default_bar_value_label")]
    pub bar_value_label: String,
    /// Display name of a line series keyed `value`.
    #[serde(default = "default_line_value_label")]
    pub line_value_label: String,
    /// Pie slices at or below this share of the total get no percentage label.
    #[serde(default = "default_pie_percent_threshold")]
    pub pie_percent_threshold: f64,
}

fn default_palette() -> Vec<String> {
    ["#0ea5e9", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#6366f1"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}
fn default_bar_value_label() -> String { "Quantidade".to_string() }
fn default_line_value_label() -> String { "Valor".to_string() }
fn default_pie_percent_threshold() -> f64 { 0.05 }

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            bar_value_label: default_bar_value_label(),
            line_value_label: default_line_value_label(),
            pie_percent_threshold: default_pie_percent_threshold(),
        }
    }
}

/// `[ui]` section of the terminal viewer.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_topic_pane_width_pct")]
    pub topic_pane_width_pct: u16,
    #[serde(default = "default_post_pane_width_pct")]
    pub post_pane_width_pct: u16,
}

fn default_topic_pane_width_pct() -> u16 { 25 }
fn default_post_pane_width_pct() -> u16 { 30 }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            topic_pane_width_pct: default_topic_pane_width_pct(),
            post_pane_width_pct: default_post_pane_width_pct(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. `explicit` is a file named on the
    /// command line; unlike the user file it must exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(user_config_path().as_path()).required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                config::Environment::with_prefix("PAINEL")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn user_config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("painel")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
