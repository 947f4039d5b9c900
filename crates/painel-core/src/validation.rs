//! Submission-time hygiene for operator-authored chart JSON.
//!
//! This is stricter than the [normalizer](crate::normalizer): a config that
//! fails here is never stored. Configs that were stored before these checks
//! existed still have to render, which is why the normalizer does not rely on
//! anything validated here.

use crate::types::{ChartConfig, ChartType};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex colour pattern is valid"));

/// Form fields that sit next to the JSON editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    /// Title typed by the operator; blank means "take it from the JSON".
    pub title: String,
    /// Colour picked by the operator, overriding the JSON's own `color`.
    pub color: Option<String>,
}

impl SubmissionForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Why a submission was refused. Messages are shown to the operator as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("O JSON deve ser um objeto.")]
    NotAnObject,

    #[error("Por favor, adicione um título ao gráfico (no campo acima ou no JSON).")]
    MissingTitle,

    #[error("O JSON deve conter a propriedade 'type'.")]
    MissingType,

    #[error("Tipo de gráfico desconhecido: '{0}' (use bar, line ou pie).")]
    UnknownType(String),

    #[error("O JSON deve conter dados (propriedade 'data' ou 'series').")]
    MissingData,

    #[error("Formato inválido: 'values' deve ser um array.")]
    ValuesNotArray,

    #[error("Cor inválida: '{0}' (use o formato #rrggbb).")]
    InvalidColor(String),

    #[error("JSON inválido: {0}")]
    Malformed(String),
}

/// Validate `raw` (the parsed editor contents) together with the form fields
/// and return the config that would be stored.
pub fn validate_submission(raw: &Value, form: &SubmissionForm) -> Result<ChartConfig, SubmissionError> {
    let config = match raw.get("chart") {
        Some(inner) if !inner.is_null() => inner,
        _ => raw,
    };
    let obj = config.as_object().ok_or(SubmissionError::NotAnObject)?;

    let title = resolve_title(form, obj.get("data"), obj.get("title"))?;

    let chart_type = match obj.get("type") {
        None | Some(Value::Null) => return Err(SubmissionError::MissingType),
        Some(Value::String(s)) if s.is_empty() => return Err(SubmissionError::MissingType),
        Some(Value::String(s)) => ChartType::parse(s).ok_or_else(|| SubmissionError::UnknownType(s.clone()))?,
        Some(other) => return Err(SubmissionError::UnknownType(other.to_string())),
    };

    let data = obj.get("data");
    let has_data = matches!(data, Some(Value::Array(_) | Value::Object(_)));
    let has_series = matches!(obj.get("series"), Some(Value::Array(_)));
    if !has_data && !has_series {
        return Err(SubmissionError::MissingData);
    }

    if let Some(Value::Array(items)) = data {
        if let Some(values) = items.first().and_then(|first| first.get("values")) {
            if !values.is_array() {
                return Err(SubmissionError::ValuesNotArray);
            }
        }
    }

    let color = match (&form.color, obj.get("color")) {
        (Some(picked), _) => Some(picked.clone()),
        (None, Some(Value::String(own))) => Some(own.clone()),
        (None, _) => None,
    };
    if let Some(color) = &color {
        if !HEX_COLOR.is_match(color) {
            return Err(SubmissionError::InvalidColor(color.clone()));
        }
    }

    let mut typed = ChartConfig::from_value(config.clone())
        .map_err(|err| SubmissionError::Malformed(err.to_string()))?;
    typed.chart_type = chart_type;
    typed.title = title;
    typed.color = color;
    Ok(typed)
}

/// Form title, then `data.title` of a composite object, then `title`.
fn resolve_title(
    form: &SubmissionForm,
    data: Option<&Value>,
    own: Option<&Value>,
) -> Result<String, SubmissionError> {
    let typed = form.title.trim();
    if !typed.is_empty() {
        return Ok(typed.to_string());
    }
    let from_data = data
        .filter(|d| d.is_object())
        .and_then(|d| d.get("title"))
        .and_then(Value::as_str);
    from_data
        .or_else(|| own.and_then(Value::as_str))
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .ok_or(SubmissionError::MissingTitle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
