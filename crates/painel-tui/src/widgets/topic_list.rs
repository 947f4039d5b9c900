//! Topic list: the fixed catalogue in the left pane, with a post count per
//! topic and the topic's accent colour.

use crate::app::AppState;
use crate::theme::{parse_color, Theme};
use painel_core::TOPICS;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};

pub struct TopicList<'a> {
    state: &'a AppState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> TopicList<'a> {
    pub fn new(state: &'a AppState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }
}

impl Widget for TopicList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = TOPICS
            .iter()
            .map(|topic| {
                let marker = parse_color(topic.color)
                    .map(|c| Style::default().fg(c))
                    .unwrap_or_default();
                let count = self.state.post_count(topic.id);
                ListItem::new(Line::from(vec![
                    Span::styled("● ", marker),
                    Span::raw(topic.label),
                    Span::styled(format!(" ({count})"), self.theme.list_muted),
                ]))
            })
            .collect();

        let highlight = if self.focused {
            self.theme.list_selected
        } else {
            self.theme.title
        };
        let list = List::new(items)
            .block(
                Block::bordered()
                    .title(" Tópicos ")
                    .border_style(self.theme.border(self.focused)),
            )
            .highlight_style(highlight)
            .highlight_symbol("▸ ");

        let mut list_state = ListState::default().with_selected(Some(self.state.topic_cursor));
        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}
