//! Ratatui widgets for the painel viewer.

pub mod chart_view;
pub mod header;
pub mod help;
pub mod post_list;
pub mod topic_list;
