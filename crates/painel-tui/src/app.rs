//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.

use crate::{
    event::{self, AppEvent, Direction},
    theme::Theme,
    widgets::{chart_view::ChartView, header::Header, help::HelpPopup, post_list::PostList, topic_list::TopicList},
};
use crossterm::{
    event::{self as ct_event, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use painel_core::{config::Config, NormalizedTable, Normalizer, Post, RenderPlan, TopicId, TOPICS};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout},
    Frame, Terminal,
};
use std::{io, time::Duration};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Topics,
    Posts,
    Chart,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Topics => Focus::Posts,
            Focus::Posts => Focus::Chart,
            Focus::Chart => Focus::Topics,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Topics => Focus::Chart,
            Focus::Posts => Focus::Topics,
            Focus::Chart => Focus::Posts,
        }
    }
}

/// Normalized table and render plan of the selected post, rebuilt whenever
/// the selection changes.
#[derive(Debug, Clone)]
pub struct ChartSlot {
    pub table: NormalizedTable,
    pub plan: RenderPlan,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    /// Every post, newest first.
    pub posts: Vec<Post>,
    /// Index into [`TOPICS`].
    pub topic_cursor: usize,
    /// Index into the posts of the selected topic.
    pub post_cursor: usize,
    /// First visible line of the description in the chart pane.
    pub description_scroll: u16,
    pub focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub normalizer: Normalizer,
    pub chart: Option<ChartSlot>,
    pub show_help: bool,
    pub quit: bool,
}

impl AppState {
    pub fn topic(&self) -> TopicId {
        TOPICS[self.topic_cursor].id
    }

    pub fn topic_posts(&self) -> Vec<&Post> {
        let topic = self.topic();
        self.posts.iter().filter(|p| p.topic_id == topic).collect()
    }

    pub fn post_count(&self, topic: TopicId) -> usize {
        self.posts.iter().filter(|p| p.topic_id == topic).count()
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.topic_posts().get(self.post_cursor).copied()
    }

    fn refresh_chart(&mut self) {
        self.description_scroll = 0;
        self.chart = self.selected_post().map(|post| {
            let table = self.normalizer.normalize_lenient(&post.chart_config);
            let plan = RenderPlan::build(&post.chart_config, &table, &self.config.render);
            tracing::debug!(
                post = %post.id,
                shape = %table.shape,
                rows = table.rows.len(),
                "chart prepared"
            );
            ChartSlot { table, plan }
        });
    }

    fn move_topic(&mut self, dir: Direction) {
        let before = self.topic_cursor;
        self.topic_cursor = step(self.topic_cursor, TOPICS.len(), dir);
        if before != self.topic_cursor {
            self.post_cursor = 0;
            self.refresh_chart();
        }
    }

    fn move_post(&mut self, dir: Direction) {
        let before = self.post_cursor;
        self.post_cursor = step(self.post_cursor, self.topic_posts().len(), dir);
        if before != self.post_cursor {
            self.refresh_chart();
        }
    }

    fn scroll_description(&mut self, dir: Direction) {
        self.description_scroll = match dir {
            Direction::Up => self.description_scroll.saturating_sub(1),
            Direction::Down => self.description_scroll.saturating_add(1),
            Direction::First => 0,
            Direction::Last => self.description_scroll,
        };
    }
}

/// Move a list cursor within `0..len`, clamping at both ends.
fn step(cursor: usize, len: usize, dir: Direction) -> usize {
    if len == 0 {
        return 0;
    }
    match dir {
        Direction::Up => cursor.saturating_sub(1),
        Direction::Down => (cursor + 1).min(len - 1),
        Direction::First => 0,
        Direction::Last => len - 1,
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(posts: Vec<Post>, config: Config, theme: Theme) -> Self {
        let normalizer = Normalizer::new(config.normalizer.clone());
        // Start on the first topic that has something to show.
        let topic_cursor = TOPICS
            .iter()
            .position(|t| posts.iter().any(|p| p.topic_id == t.id))
            .unwrap_or(0);

        let mut state = AppState {
            posts,
            topic_cursor,
            post_cursor: 0,
            description_scroll: 0,
            focus: Focus::Topics,
            theme,
            config,
            normalizer,
            chart: None,
            show_help: false,
            quit: false,
        };
        state.refresh_chart();
        App { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(50))? {
                let raw = ct_event::read()?;
                if let Event::Key(key) = &raw {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                }
                if let Some(ev) = event::to_app_event(raw) {
                    tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                    self.handle(ev);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn handle(&mut self, event: AppEvent) {
        let s = &mut self.state;

        // Help popup intercepts all events; only close keys pass through.
        if s.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                s.show_help = false;
            }
            return;
        }

        match event {
            AppEvent::Quit => {
                tracing::debug!("quit");
                s.quit = true;
            }
            AppEvent::Char('?') => {
                tracing::debug!("help popup opened");
                s.show_help = true;
            }
            AppEvent::FocusNext => s.focus = s.focus.next(),
            AppEvent::FocusPrev => s.focus = s.focus.prev(),
            AppEvent::Enter => {
                if s.focus != Focus::Chart {
                    s.focus = s.focus.next();
                }
            }
            AppEvent::Escape => {
                if s.focus != Focus::Topics {
                    s.focus = s.focus.prev();
                }
            }
            AppEvent::Nav(dir) => match s.focus {
                Focus::Topics => s.move_topic(dir),
                Focus::Posts => s.move_post(dir),
                Focus::Chart => s.scroll_description(dir),
            },
            AppEvent::Char(_) | AppEvent::Resize(_, _) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([Constraint::Length(1), Constraint::Fill(1)])
        .split(area);

    let horiz = Layout::default()
        .direction(LayoutDir::Horizontal)
        .constraints([
            Constraint::Percentage(state.config.ui.topic_pane_width_pct),
            Constraint::Percentage(state.config.ui.post_pane_width_pct),
            Constraint::Fill(1),
        ])
        .split(vert[1]);

    let topic = state.topic().def();
    let posts = state.topic_posts();

    frame.render_widget(Header::new(topic, posts.len(), &state.theme), vert[0]);
    frame.render_widget(
        TopicList::new(state, state.focus == Focus::Topics, &state.theme),
        horiz[0],
    );
    frame.render_widget(
        PostList::new(&posts, state.post_cursor, state.focus == Focus::Posts, &state.theme),
        horiz[1],
    );
    frame.render_widget(
        ChartView::new(
            state.selected_post(),
            state.chart.as_ref(),
            state.description_scroll,
            state.focus == Focus::Chart,
            &state.theme,
        ),
        horiz[2],
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
