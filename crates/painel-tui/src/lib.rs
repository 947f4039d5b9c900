//! painel TUI: read-only terminal viewer for published indicator posts.

pub mod app;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use painel_core::{config::Config, PostStore};
use std::sync::Arc;

/// Load every post from `store` and run the viewer until the user quits.
pub fn run(config: Config, store: Arc<dyn PostStore>) -> anyhow::Result<()> {
    let posts = store.list()?;
    tracing::info!(posts = posts.len(), backend = store.backend(), "starting viewer");
    App::new(posts, config, theme::Theme::load_default()).run()
}
