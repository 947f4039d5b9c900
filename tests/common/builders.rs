//! Test builders: compact constructors for chart payloads and posts.
//!
//! These are written for readability in test bodies, not for production use.

use painel_core::{ChartConfig, ChartType, Post, TopicId};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Chart payload pieces
// ---------------------------------------------------------------------------

/// One legacy series: `{name, data: [{label, value}]}`.
pub fn legacy_series(name: &str, points: &[(&str, f64)]) -> Value {
    let data: Vec<Value> = points
        .iter()
        .map(|(label, value)| json!({"label": label, "value": value}))
        .collect();
    json!({"name": name, "data": data})
}

/// One nested-values series: `{label, values: [{city, value}]}`.
pub fn nested_series(label: &str, points: &[(&str, f64)]) -> Value {
    let values: Vec<Value> = points
        .iter()
        .map(|(city, value)| json!({"city": city, "value": value}))
        .collect();
    json!({"label": label, "values": values})
}

/// Composite `data` object with parallel arrays.
pub fn composite_data(labels: &[&str], series: Vec<Value>) -> Value {
    json!({"labels": labels, "series": series})
}

// ---------------------------------------------------------------------------
// ChartBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`ChartConfig`] fixtures.
///
/// ```rust
/// let chart = ChartBuilder::line("Casos")
///     .series(json!([legacy_series("2024", &[("Janeiro", 3.0)])]))
///     .build();
/// ```
pub struct ChartBuilder {
    config: ChartConfig,
}

impl ChartBuilder {
    pub fn new(chart_type: ChartType, title: &str) -> Self {
        Self {
            config: ChartConfig::new(chart_type, title),
        }
    }

    pub fn bar(title: &str) -> Self {
        Self::new(ChartType::Bar, title)
    }

    pub fn line(title: &str) -> Self {
        Self::new(ChartType::Line, title)
    }

    pub fn pie(title: &str) -> Self {
        Self::new(ChartType::Pie, title)
    }

    pub fn data(mut self, data: Value) -> Self {
        self.config = self.config.with_data(data);
        self
    }

    pub fn series(mut self, series: Value) -> Self {
        self.config = self.config.with_series(series);
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.config = self.config.with_color(color);
        self
    }

    pub fn options(mut self, options: Value) -> Self {
        self.config = self.config.with_options(options);
        self
    }

    pub fn build(self) -> ChartConfig {
        self.config
    }

    /// The config as the JSON an operator would paste into the admin form.
    pub fn to_json(self) -> Value {
        serde_json::to_value(self.config).expect("chart config serializes")
    }
}

// ---------------------------------------------------------------------------
// PostBuilder
// ---------------------------------------------------------------------------

pub struct PostBuilder {
    post: Post,
}

impl PostBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            post: Post {
                id: id.to_string(),
                topic_id: TopicId::Saude,
                description: String::new(),
                chart_config: ChartBuilder::bar("Indicador").build(),
                created_at: 1_700_000_000_000,
            },
        }
    }

    pub fn topic(mut self, topic: TopicId) -> Self {
        self.post.topic_id = topic;
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.post.description = text.to_string();
        self
    }

    pub fn chart(mut self, chart: ChartConfig) -> Self {
        self.post.chart_config = chart;
        self
    }

    pub fn created_at(mut self, ms: i64) -> Self {
        self.post.created_at = ms;
        self
    }

    pub fn build(self) -> Post {
        self.post
    }
}
