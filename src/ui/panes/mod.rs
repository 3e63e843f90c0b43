//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source text with highlighting driven by the lexer's categories
//! - [`tree`]: Indented listing of the syntax tree, or the compile error
//! - [`status`]: Status bar with counts and keybindings
//!
//! Each pane module exports a primary `render_*` function that takes the
//! frame, its area, the data to show and, for scrollable panes, the focus flag
//! and a scroll offset it clamps in place.

pub mod source;
pub mod status;
pub mod tree;

pub use source::render_source_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use tree::render_tree_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `offset` so the last page stays full.
fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}
