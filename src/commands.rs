//! Command implementations behind the `painel` subcommands.

use anyhow::Context;
use painel_core::{
    config::Config, open_with_fallback, validate_submission, ChartConfig, NormalizationError,
    NormalizedTable, Normalizer, RenderPlan, SubmissionForm,
};
use serde_json::Value;
use std::fmt;
use std::io::Write;
use std::path::Path;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Read a JSON document from `path`.
pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Pull the chart config out of the three accepted document forms: a bare
/// config, a `{"chart": …}` wrapper, or a stored post (`chartConfig`).
pub fn chart_from_value(value: Value) -> anyhow::Result<ChartConfig> {
    let inner = match value {
        Value::Object(mut obj) => {
            if let Some(chart) = obj.remove("chartConfig").filter(|v| !v.is_null()) {
                chart
            } else if let Some(chart) = obj.remove("chart").filter(|v| !v.is_null()) {
                chart
            } else {
                Value::Object(obj)
            }
        }
        other => anyhow::bail!("expected a JSON object, found {}", json_kind(&other)),
    };
    ChartConfig::from_value(inner).context("not a chart config")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

/// Everything `painel render` prints for one chart.
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub table: NormalizedTable,
    pub plan: RenderPlan,
}

impl RenderReport {
    /// Strict: malformed data is an error here, not an empty chart.
    pub fn build(chart: &ChartConfig, config: &Config) -> Result<Self, NormalizationError> {
        let table = Normalizer::new(config.normalizer.clone()).normalize(chart)?;
        let plan = RenderPlan::build(chart, &table, &config.render);
        Ok(Self { table, plan })
    }
}

impl fmt::Display for RenderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "shape: {}", self.table.shape)?;
        writeln!(f, "keys:  {}", self.table.keys.join(", "))?;
        writeln!(f)?;
        if self.table.rows.is_empty() {
            writeln!(f, "(no rows)")?;
        } else {
            write!(f, "{}", self.table)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}

pub fn render(path: &Path, config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let chart = chart_from_value(read_json(path)?)?;
    let report = RenderReport::build(&chart, config)?;
    tracing::debug!(shape = %report.table.shape, rows = report.table.rows.len(), "rendered");
    write!(out, "{report}")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

/// Run the submission checks on the file at `path`. On success the accepted
/// config is printed as pretty JSON and returned.
pub fn check(path: &Path, form: &SubmissionForm, out: &mut impl Write) -> anyhow::Result<ChartConfig> {
    let raw = read_json(path)?;
    let chart = validate_submission(&raw, form)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&chart)?)?;
    Ok(chart)
}

// ---------------------------------------------------------------------------
// serve
// ---------------------------------------------------------------------------

pub async fn serve(config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let store = open_with_fallback(&config.store);
    if config.admin.password.trim().is_empty() {
        tracing::warn!("admin password is empty; mutating routes are locked");
    }
    let state = painel_server::AppState::new(store, config.admin.password.as_str());
    let addr = bind.unwrap_or(&config.server.bind);
    painel_server::serve(addr, state)
        .await
        .with_context(|| format!("serving on {addr}"))
}

// ---------------------------------------------------------------------------
// tui
// ---------------------------------------------------------------------------

pub fn tui(config: Config) -> anyhow::Result<()> {
    let store = open_with_fallback(&config.store);
    painel_tui::run(config, store)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use painel_core::ChartType;
    use serde_json::json;

    #[test]
    fn accepts_bare_config() {
        let chart = chart_from_value(json!({"type": "line", "title": "T", "data": []})).unwrap();
        assert_eq!(chart.chart_type, ChartType::Line);
    }

    #[test]
    fn unwraps_chart_wrapper_and_post() {
        let wrapped = chart_from_value(json!({"chart": {"type": "pie", "title": "W"}})).unwrap();
        assert_eq!(wrapped.title, "W");

        let post = json!({
            "id": "1",
            "topicId": "saude",
            "description": "",
            "chartConfig": {"type": "bar", "title": "P"},
            "createdAt": 0
        });
        assert_eq!(chart_from_value(post).unwrap().title, "P");
    }

    #[test]
    fn rejects_non_objects() {
        let err = chart_from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn report_lists_shape_and_keys() {
        let chart = ChartConfig::new(ChartType::Bar, "T")
            .with_data(json!([{"label": "A", "x": 1, "y": 2}]));
        let report = RenderReport::build(&chart, &Config::defaults()).unwrap();
        let text = report.to_string();
        assert!(text.starts_with("shape: flat-rows\nkeys:  x, y\n"));
    }

    #[test]
    fn report_marks_empty_tables() {
        let chart = ChartConfig::new(ChartType::Bar, "T");
        let report = RenderReport::build(&chart, &Config::defaults()).unwrap();
        assert!(report.to_string().contains("(no rows)"));
    }
}
