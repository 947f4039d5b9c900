//! Render plan: the visual decisions a chart surface needs, derived from a
//! config, its normalized table and the injected [`RenderSettings`].
//!
//! The plan is surface-agnostic. The terminal viewer draws from it, and a web
//! front end could serialize it next to [`NormalizedTable::to_json_rows`].

use crate::config::RenderSettings;
use crate::normalizer::{AxisSide, NormalizedTable, SeriesMark, YAxes};
use crate::types::{ChartConfig, ChartType};
use std::fmt;

/// Which chart family draws the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// Mixed bars and lines on up to two value axes (composite tables only).
    Composed,
    Bar,
    Line,
    Pie,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanKind::Composed => write!(f, "composed"),
            PlanKind::Bar => write!(f, "bar"),
            PlanKind::Line => write!(f, "line"),
            PlanKind::Pie => write!(f, "pie"),
        }
    }
}

/// Cyclic colour source built from `[render] palette`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette<'a> {
    colors: &'a [String],
}

impl<'a> Palette<'a> {
    pub fn new(colors: &'a [String]) -> Self {
        Self { colors }
    }

    /// Colour for position `index`, wrapping around. `None` for an empty palette.
    pub fn color(&self, index: usize) -> Option<&'a str> {
        if self.colors.is_empty() {
            return None;
        }
        Some(self.colors[index % self.colors.len()].as_str())
    }
}

/// How one series is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesStyle {
    /// Column of the normalized table.
    pub key: String,
    /// Legend name.
    pub name: String,
    pub color: Option<String>,
    pub mark: SeriesMark,
    pub axis: AxisSide,
}

/// One pie slice per table row.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Option<String>,
    /// Share of the total in `0.0..=1.0`.
    pub percent: f64,
    /// Small slices get no percentage label.
    pub show_percent: bool,
}

impl PieSlice {
    /// `"42%"`, rounded to whole percent.
    pub fn percent_label(&self) -> String {
        format!("{:.0}%", self.percent * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub kind: PlanKind,
    pub title: String,
    /// Empty for pie charts.
    pub series: Vec<SeriesStyle>,
    /// Empty unless `kind` is [`PlanKind::Pie`].
    pub slices: Vec<PieSlice>,
    pub y_axes: YAxes,
}

impl RenderPlan {
    pub fn build(config: &ChartConfig, table: &NormalizedTable, settings: &RenderSettings) -> Self {
        let palette = Palette::new(&settings.palette);

        if let Some(meta) = &table.composite {
            let series = meta
                .series
                .iter()
                .enumerate()
                .map(|(i, s)| SeriesStyle {
                    key: s.key.clone(),
                    name: s.key.clone(),
                    color: s.color.clone().or_else(|| palette.color(i).map(str::to_string)),
                    mark: s.mark,
                    axis: s.axis,
                })
                .collect();
            return Self {
                kind: PlanKind::Composed,
                title: config.title.clone(),
                series,
                slices: Vec::new(),
                y_axes: meta.y_axes.clone(),
            };
        }

        match config.chart_type {
            ChartType::Bar => {
                let single = table.keys.len() == 1;
                let series = table
                    .keys
                    .iter()
                    .enumerate()
                    .map(|(i, key)| {
                        let color = match (&config.color, single) {
                            (Some(main), true) => Some(main.clone()),
                            _ => palette.color(i).map(str::to_string),
                        };
                        styled(key, &settings.bar_value_label, color, SeriesMark::Bar)
                    })
                    .collect();
                Self::simple(PlanKind::Bar, config, series)
            }
            ChartType::Line => {
                let series = table
                    .keys
                    .iter()
                    .enumerate()
                    .map(|(i, key)| {
                        let color = palette.color(i).map(str::to_string);
                        styled(key, &settings.line_value_label, color, SeriesMark::Line)
                    })
                    .collect();
                Self::simple(PlanKind::Line, config, series)
            }
            ChartType::Pie => {
                let mut plan = Self::simple(PlanKind::Pie, config, Vec::new());
                plan.slices = pie_slices(table, &palette, settings.pie_percent_threshold);
                plan
            }
        }
    }

    fn simple(kind: PlanKind, config: &ChartConfig, series: Vec<SeriesStyle>) -> Self {
        Self {
            kind,
            title: config.title.clone(),
            series,
            slices: Vec::new(),
            y_axes: YAxes::default(),
        }
    }

    /// Whether any series is plotted against the right-hand axis.
    pub fn uses_right_axis(&self) -> bool {
        self.series.iter().any(|s| s.axis == AxisSide::Right)
    }
}

fn styled(key: &str, value_alias: &str, color: Option<String>, mark: SeriesMark) -> SeriesStyle {
    let name = if key == "value" { value_alias } else { key };
    SeriesStyle {
        key: key.to_string(),
        name: name.to_string(),
        color,
        mark,
        axis: AxisSide::Left,
    }
}

fn pie_slices(table: &NormalizedTable, palette: &Palette<'_>, threshold: f64) -> Vec<PieSlice> {
    let value_key = table.keys.first().map_or("value", String::as_str);
    let values: Vec<f64> = table
        .rows
        .iter()
        .map(|row| row.get(value_key).unwrap_or(0.0).max(0.0))
        .collect();
    let total: f64 = values.iter().sum();

    table
        .rows
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (row, value))| {
            let percent = if total > 0.0 { value / total } else { 0.0 };
            PieSlice {
                label: row.label.clone(),
                value,
                color: palette.color(i).map(str::to_string),
                percent,
                show_percent: percent > threshold,
            }
        })
        .collect()
}

impl fmt::Display for RenderPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} chart: {}", self.kind, self.title)?;
        for s in &self.series {
            let mark = match s.mark {
                SeriesMark::Bar => "bar",
                SeriesMark::Line => "line",
            };
            let axis = match s.axis {
                AxisSide::Left => "left",
                AxisSide::Right => "right",
            };
            writeln!(
                f,
                "  {} [{}] {} {mark} {axis}",
                s.name,
                s.key,
                s.color.as_deref().unwrap_or("-")
            )?;
        }
        for slice in &self.slices {
            let pct = if slice.show_percent { slice.percent_label() } else { String::new() };
            writeln!(
                f,
                "  {} {} {} {pct}",
                slice.label,
                slice.value,
                slice.color.as_deref().unwrap_or("-")
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
