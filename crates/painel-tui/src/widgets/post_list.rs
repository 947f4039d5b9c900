//! Post list: indicators published under the selected topic, newest first.

use crate::theme::Theme;
use chrono::{DateTime, Utc};
use painel_core::Post;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

pub struct PostList<'a> {
    posts: &'a [&'a Post],
    cursor: usize,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> PostList<'a> {
    pub fn new(posts: &'a [&'a Post], cursor: usize, focused: bool, theme: &'a Theme) -> Self {
        Self { posts, cursor, focused, theme }
    }
}

/// `dd/mm/yyyy` of a Unix-millisecond timestamp.
pub(crate) fn format_date(created_at_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(created_at_ms)
        .map(|ts| ts.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "--/--/----".to_string())
}

impl Widget for PostList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Indicadores ")
            .border_style(self.theme.border(self.focused));

        if self.posts.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(Span::styled("Nenhum indicador publicado.", self.theme.placeholder))
                .render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .posts
            .iter()
            .map(|post| {
                ListItem::new(vec![
                    Line::from(post.chart_config.title.clone()),
                    Line::from(Span::styled(
                        format!("  {} · {}", format_date(post.created_at), post.chart_config.chart_type),
                        self.theme.list_muted,
                    )),
                ])
            })
            .collect();

        let highlight = if self.focused {
            self.theme.list_selected
        } else {
            self.theme.title
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("▸ ");

        let mut list_state = ListState::default().with_selected(Some(self.cursor));
        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_day_first() {
        // 2025-03-01T12:00:00Z
        assert_eq!(format_date(1_740_830_400_000), "01/03/2025");
    }

    #[test]
    fn out_of_range_timestamps_do_not_panic() {
        assert_eq!(format_date(i64::MAX), "--/--/----");
    }
}
