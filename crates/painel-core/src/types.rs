//! Core types for painel-core.
//!
//! This module defines the data structures shared across every layer: the
//! operator-authored [`ChartConfig`], the stored [`Post`] record, and the
//! fixed topic catalogue ([`TopicId`], [`TopicDef`], [`TOPICS`]).
//!
//! `ChartConfig` deliberately keeps `data`, `series` and `options` as raw
//! [`serde_json::Value`]s: the payload is hand-written JSON of unknown shape
//! and only the [normalizer](crate::normalizer) decides what it means.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Render strategy selected by the operator. Independent of the data shape.
///
/// Deserializing is lenient: stored charts may carry a type from an older
/// editor (`"area"`, `null`, a number), and those draw as bars. The admin
/// form rejects them up front through [`ChartType::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartType {
    /// Parse the wire spelling (`bar`, `line`, `pie`). Case-sensitive, like
    /// the stored JSON.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bar" => Some(ChartType::Bar),
            "line" => Some(ChartType::Line),
            "pie" => Some(ChartType::Pie),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ChartType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match raw.as_str().and_then(ChartType::parse) {
            Some(chart_type) => chart_type,
            None => {
                tracing::debug!(chart_type = %raw, "unknown chart type; drawing as bar");
                ChartType::Bar
            }
        })
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartType::Bar => write!(f, "bar"),
            ChartType::Line => write!(f, "line"),
            ChartType::Pie => write!(f, "pie"),
        }
    }
}

/// A chart definition as authored by the operator.
///
/// Constructed once per saved indicator and never mutated afterwards; edits
/// replace the whole value. Unknown top-level keys are kept in `extra` so the
/// config round-trips through JSON unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type", default)]
    pub chart_type: ChartType,
    #[serde(default)]
    pub title: String,
    /// Single hex colour, only honoured when exactly one series is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Flat rows, nested-values series, or a composite `{labels, series}` object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Legacy `[{name, data: [{label, value}]}]` series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChartConfig {
    pub fn new(chart_type: ChartType, title: impl Into<String>) -> Self {
        Self {
            chart_type,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_series(mut self, series: Value) -> Self {
        self.series = Some(series);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Deserialize a config from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Fixed topical categories indicators are published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TopicId {
    #[serde(rename = "saude")]
    Saude,
    #[serde(rename = "educacao")]
    Educacao,
    #[serde(rename = "social")]
    DesenvolvimentoSocial,
    #[serde(rename = "financas")]
    Financas,
    #[serde(rename = "esporte")]
    EsporteCulturaLazer,
    #[serde(rename = "agricultura")]
    Agricultura,
    #[serde(rename = "infraestrutura")]
    Infraestrutura,
    #[serde(rename = "planejamento")]
    Planejamento,
}

impl TopicId {
    /// Wire identifier, e.g. `"saude"`.
    pub fn as_str(self) -> &'static str {
        match self {
            TopicId::Saude => "saude",
            TopicId::Educacao => "educacao",
            TopicId::DesenvolvimentoSocial => "social",
            TopicId::Financas => "financas",
            TopicId::EsporteCulturaLazer => "esporte",
            TopicId::Agricultura => "agricultura",
            TopicId::Infraestrutura => "infraestrutura",
            TopicId::Planejamento => "planejamento",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        TOPICS.iter().map(|t| t.id).find(|id| id.as_str() == s)
    }

    /// Catalogue entry for this topic.
    pub fn def(self) -> &'static TopicDef {
        // TOPICS is declared in enum order.
        &TOPICS[self as usize]
    }
}

impl std::fmt::Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogue entry describing one topic card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDef {
    pub id: TopicId,
    pub label: &'static str,
    pub icon_name: &'static str,
    /// Accent colour as a hex string.
    pub color: &'static str,
    pub description: &'static str,
}

/// The topic catalogue, in display order.
pub static TOPICS: [TopicDef; 8] = [
    TopicDef {
        id: TopicId::Saude,
        label: "Saúde",
        icon_name: "HeartPulse",
        color: "#10b981",
        description: "Indicadores de saúde pública, campanhas e atendimentos.",
    },
    TopicDef {
        id: TopicId::Educacao,
        label: "Educação",
        icon_name: "GraduationCap",
        color: "#0ea5e9",
        description: "Dados sobre escolas, alunos, desempenho e infraestrutura escolar.",
    },
    TopicDef {
        id: TopicId::DesenvolvimentoSocial,
        label: "Desenvolvimento Social",
        icon_name: "Users",
        color: "#fbbf24",
        description: "Programas sociais, assistência e inclusão comunitária.",
    },
    TopicDef {
        id: TopicId::Financas,
        label: "Finanças",
        icon_name: "BadgeDollarSign",
        color: "#059669",
        description: "Orçamento, arrecadação e despesas municipais.",
    },
    TopicDef {
        id: TopicId::EsporteCulturaLazer,
        label: "Esporte, Cultura e Lazer",
        icon_name: "Trophy",
        color: "#f59e0b",
        description: "Eventos esportivos, culturais e áreas de lazer.",
    },
    TopicDef {
        id: TopicId::Agricultura,
        label: "Agricultura",
        icon_name: "Sprout",
        color: "#16a34a",
        description: "Produção rural, apoio ao agricultor e safras.",
    },
    TopicDef {
        id: TopicId::Infraestrutura,
        label: "Infraestrutura",
        icon_name: "HardHat",
        color: "#0891b2",
        description: "Obras, pavimentação e manutenção urbana.",
    },
    TopicDef {
        id: TopicId::Planejamento,
        label: "Planejamento",
        icon_name: "ClipboardList",
        color: "#0284c7",
        description: "Metas, diretrizes e projetos futuros.",
    },
];

/// One published indicator: a chart plus the operator's analysis text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub topic_id: TopicId,
    pub description: String,
    pub chart_config: ChartConfig,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
}

/// Body of an edit: everything except identity and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    pub topic_id: TopicId,
    pub description: String,
    pub chart_config: ChartConfig,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn topics_are_in_enum_order() {
        for (i, topic) in TOPICS.iter().enumerate() {
            assert_eq!(topic.id as usize, i, "{} out of order", topic.id);
            assert_eq!(topic.id.def().label, topic.label);
        }
    }

    #[test]
    fn topic_ids_round_trip_through_wire_names() {
        for topic in &TOPICS {
            let wire = serde_json::to_value(topic.id).unwrap();
            assert_eq!(wire, json!(topic.id.as_str()));
            assert_eq!(TopicId::parse(topic.id.as_str()), Some(topic.id));
        }
        assert_eq!(TopicId::parse("esportes"), None);
    }

    #[test]
    fn stored_unknown_types_draw_as_bars() {
        for raw in [json!("area"), json!(null), json!(3), json!("Line")] {
            let config = ChartConfig::from_value(json!({"type": raw, "title": "T"})).unwrap();
            assert_eq!(config.chart_type, ChartType::Bar, "{raw}");
        }
        let config = ChartConfig::from_value(json!({"type": "pie"})).unwrap();
        assert_eq!(config.chart_type, ChartType::Pie);
    }

    #[test]
    fn chart_config_preserves_unknown_keys() {
        let raw = json!({
            "type": "line",
            "title": "Matrículas",
            "data": [{"label": "2023", "value": 10}],
            "source": "Censo Escolar"
        });
        let config = ChartConfig::from_value(raw.clone()).unwrap();
        assert_eq!(config.chart_type, ChartType::Line);
        assert_eq!(config.extra.get("source"), Some(&json!("Censo Escolar")));
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }

    #[test]
    fn missing_type_defaults_to_bar() {
        let config = ChartConfig::from_value(json!({"title": "T"})).unwrap();
        assert_eq!(config.chart_type, ChartType::Bar);
        assert!(config.data.is_none());
    }

    #[test]
    fn post_uses_camel_case_on_the_wire() {
        let post = Post {
            id: "1".into(),
            topic_id: TopicId::Saude,
            description: "d".into(),
            chart_config: ChartConfig::new(ChartType::Pie, "t"),
            created_at: 1_700_000_000_000,
        };
        let v = serde_json::to_value(&post).unwrap();
        assert_eq!(v["topicId"], json!("saude"));
        assert_eq!(v["chartConfig"]["type"], json!("pie"));
        assert_eq!(v["createdAt"], json!(1_700_000_000_000i64));
    }
}
