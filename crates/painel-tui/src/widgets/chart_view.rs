//! Chart pane: draws the selected post from its normalized table and render
//! plan, followed by a legend and the operator's description.
//!
//! | Plan       | Drawn as |
//! |------------|----------|
//! | `Bar`      | grouped bar chart, one group per category |
//! | `Line`     | braille line chart, x = category index |
//! | `Pie`      | one proportional bar per slice with its share |
//! | `Composed` | bar series on top, line series below |

use crate::app::ChartSlot;
use crate::theme::Theme;
use painel_core::normalizer::{AxisSide, NormalizedTable, SeriesMark};
use painel_core::render::{PieSlice, PlanKind, SeriesStyle};
use painel_core::Post;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType, Paragraph, Widget, Wrap,
    },
};

/// Cell values are scaled before they become bar heights so fractional
/// values still get visible bars.
const BAR_SCALE: f64 = 100.0;
const MAX_BAR_WIDTH: u16 = 9;
const DESCRIPTION_HEIGHT: u16 = 6;

pub struct ChartView<'a> {
    post: Option<&'a Post>,
    slot: Option<&'a ChartSlot>,
    scroll: u16,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ChartView<'a> {
    pub fn new(
        post: Option<&'a Post>,
        slot: Option<&'a ChartSlot>,
        scroll: u16,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { post, slot, scroll, focused, theme }
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = self
            .post
            .map(|p| format!(" {} ", p.chart_config.title))
            .unwrap_or_else(|| " Gráfico ".to_string());
        let block = Block::bordered()
            .title(Span::styled(title, self.theme.title))
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let (Some(post), Some(slot)) = (self.post, self.slot) else {
            placeholder("Selecione um indicador.", inner, buf, self.theme);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(DESCRIPTION_HEIGHT),
            ])
            .split(inner);

        if slot.table.rows.is_empty() {
            placeholder("Sem dados para exibir.", rows[0], buf, self.theme);
        } else {
            render_plan(slot, rows[0], buf, self.theme);
            legend(&slot.plan.series, self.theme).render(rows[1], buf);
        }

        Paragraph::new(post.description.as_str())
            .style(self.theme.description)
            .wrap(Wrap { trim: true })
            .scroll((self.scroll, 0))
            .render(rows[2], buf);
    }
}

fn render_plan(slot: &ChartSlot, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let table = &slot.table;
    let plan = &slot.plan;
    let all: Vec<&SeriesStyle> = plan.series.iter().collect();

    match plan.kind {
        PlanKind::Bar => bars(table, &all, area, buf, theme),
        PlanKind::Line => lines(table, &all, None, area, buf, theme),
        PlanKind::Pie => pie(&plan.slices, area, buf, theme),
        PlanKind::Composed => {
            let (bar_series, line_series): (Vec<&SeriesStyle>, Vec<&SeriesStyle>) =
                all.iter().copied().partition(|s| s.mark == SeriesMark::Bar);

            let axis_title = |side: AxisSide| {
                let axis = match side {
                    AxisSide::Left => plan.y_axes.left.as_ref(),
                    AxisSide::Right => plan.y_axes.right.as_ref(),
                };
                axis.and_then(|a| a.title.as_deref())
            };
            let line_side = if line_series.iter().all(|s| s.axis == AxisSide::Right) {
                AxisSide::Right
            } else {
                AxisSide::Left
            };

            match (bar_series.is_empty(), line_series.is_empty()) {
                (false, false) => {
                    let halves = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .split(area);
                    bars(table, &bar_series, halves[0], buf, theme);
                    lines(table, &line_series, axis_title(line_side), halves[1], buf, theme);
                }
                (false, true) => bars(table, &bar_series, area, buf, theme),
                (true, false) => lines(table, &line_series, axis_title(line_side), area, buf, theme),
                (true, true) => placeholder("Sem séries declaradas.", area, buf, theme),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// Widest bar that fits `groups` groups of `per_group` bars into `width`
/// columns, between 1 and [`MAX_BAR_WIDTH`].
fn bar_width(groups: usize, per_group: usize, width: u16) -> u16 {
    let groups = groups.max(1);
    let per_group = per_group.max(1);
    let gaps = (groups - 1)
        .saturating_mul(2)
        .saturating_add(groups.saturating_mul(per_group - 1));
    let bars = groups.saturating_mul(per_group);
    let fit = usize::from(width).saturating_sub(gaps) / bars;
    fit.clamp(1, usize::from(MAX_BAR_WIDTH)) as u16
}

fn bars(table: &NormalizedTable, series: &[&SeriesStyle], area: Rect, buf: &mut Buffer, theme: &Theme) {
    let bar_width = bar_width(table.rows.len(), series.len(), area.width);

    let mut chart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(1)
        .group_gap(2)
        .label_style(theme.axis);

    for row in &table.rows {
        let group_bars: Vec<Bar> = series
            .iter()
            .map(|s| {
                let value = row.get(&s.key);
                Bar::default()
                    .value(scaled(value))
                    .text_value(value.map_or_else(|| "-".to_string(), |v| v.to_string()))
                    .style(theme.series_style(s.color.as_deref()))
                    .value_style(theme.label.add_modifier(Modifier::REVERSED))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(row.label.clone()))
                .bars(&group_bars),
        );
    }

    chart.render(area, buf);
}

fn scaled(value: Option<f64>) -> u64 {
    (value.unwrap_or(0.0).max(0.0) * BAR_SCALE).round() as u64
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

fn lines(
    table: &NormalizedTable,
    series: &[&SeriesStyle],
    y_title: Option<&str>,
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
) {
    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            table
                .rows
                .iter()
                .enumerate()
                .filter_map(|(i, row)| row.get(&s.key).map(|v| (i as f64, v)))
                .collect()
        })
        .collect();

    let (lo, hi) = value_bounds(points.iter().flatten().map(|(_, y)| *y));

    let datasets: Vec<Dataset> = series
        .iter()
        .zip(&points)
        .map(|(s, data)| {
            Dataset::default()
                .name(s.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.series_style(s.color.as_deref()))
                .data(data)
        })
        .collect();

    let last = table.rows.len().saturating_sub(1);
    let x_labels: Vec<Line> = match (table.rows.first(), table.rows.last()) {
        (Some(first), Some(end)) if last > 0 => {
            vec![Line::from(first.label.clone()), Line::from(end.label.clone())]
        }
        (Some(only), _) => vec![Line::from(only.label.clone())],
        _ => Vec::new(),
    };

    let mut y_axis = Axis::default()
        .style(theme.axis)
        .bounds([lo, hi])
        .labels(vec![Line::from(lo.to_string()), Line::from(hi.to_string())]);
    if let Some(title) = y_title {
        y_axis = y_axis.title(Line::from(title.to_string()));
    }

    Chart::new(datasets)
        .legend_position(None)
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, last.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(y_axis)
        .render(area, buf);
}

/// Y bounds that always include zero and never collapse to a point.
fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((0.0_f64, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi <= lo {
        (lo, lo + 1.0)
    } else {
        (lo, hi)
    }
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

fn pie(slices: &[PieSlice], area: Rect, buf: &mut Buffer, theme: &Theme) {
    let label_width = slices
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    let bar_room = (area.width as usize).saturating_sub(label_width + 8);

    let rows: Vec<Line> = slices
        .iter()
        .map(|slice| {
            let filled = (slice.percent * bar_room as f64).round() as usize;
            let pct = if slice.show_percent { slice.percent_label() } else { String::new() };
            Line::from(vec![
                Span::styled(format!("{:<label_width$} ", truncate(&slice.label, label_width)), theme.label),
                Span::styled("█".repeat(filled), theme.series_style(slice.color.as_deref())),
                Span::styled(format!(" {pct}"), theme.axis),
            ])
        })
        .collect();

    Paragraph::new(rows).render(area, buf);
}

fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

// ---------------------------------------------------------------------------
// Legend and placeholders
// ---------------------------------------------------------------------------

fn legend<'a>(series: &'a [SeriesStyle], theme: &Theme) -> Line<'a> {
    let spans: Vec<Span> = series
        .iter()
        .flat_map(|s| {
            [
                Span::styled("■ ", theme.series_style(s.color.as_deref())),
                Span::styled(s.name.as_str(), theme.label),
                Span::raw("  "),
            ]
        })
        .collect();
    Line::from(spans)
}

fn placeholder(text: &str, area: Rect, buf: &mut Buffer, theme: &Theme) {
    Paragraph::new(Span::styled(text.to_string(), theme.placeholder))
        .style(Style::default())
        .render(area, buf);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
