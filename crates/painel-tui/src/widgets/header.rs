//! One-line header: selected topic on the left, key hints on the right.

use crate::theme::{parse_color, Theme};
use painel_core::TopicDef;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub struct Header<'a> {
    topic: &'a TopicDef,
    post_count: usize,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(topic: &'a TopicDef, post_count: usize, theme: &'a Theme) -> Self {
        Self { topic, post_count, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = parse_color(self.topic.color)
            .map(|c| Style::default().fg(c).add_modifier(Modifier::BOLD))
            .unwrap_or(self.theme.title);

        let line = Line::from(vec![
            Span::styled(" painel ", self.theme.title),
            Span::styled("│ ", self.theme.list_muted),
            Span::styled(self.topic.label, accent),
            Span::styled(format!("  {} indicador(es)", self.post_count), self.theme.list_muted),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);

        let hint = " q:sair  tab:painel  ?:ajuda ";
        let hint_x = area.right().saturating_sub(hint.chars().count() as u16);
        buf.set_string(hint_x, area.y, hint, Style::default().add_modifier(Modifier::DIM));
    }
}
