//! Syntax tree pane rendering

use super::{border_style, clamp_scroll};
use crate::parser::ast::Node;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::ParseError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

fn node_style(kind: TokenKind) -> Style {
    use TokenKind::*;
    match kind {
        Prog | Block | Expr | BoolExpr | LogicExpr => Style::default().fg(DEFAULT_THEME.structure),
        CharLit | StrLit => Style::default().fg(DEFAULT_THEME.string),
        k if k.is_literal() => Style::default().fg(DEFAULT_THEME.number),
        k if k.is_variable() => Style::default().fg(DEFAULT_THEME.fg),
        k if k.is_data_type() => Style::default().fg(DEFAULT_THEME.type_name),
        k if k.is_function() => Style::default().fg(DEFAULT_THEME.function),
        k if k.is_arithmetic_operator() || k.is_comparison() || k.is_logical() => {
            Style::default().fg(DEFAULT_THEME.primary)
        }
        _ => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
    }
}

/// One line per node, indented by depth, with its source line in grey.
pub(crate) fn tree_lines(root: &Node) -> Vec<Line<'static>> {
    root.walk()
        .into_iter()
        .map(|(depth, node)| {
            Line::from(vec![
                Span::raw("  ".repeat(depth)),
                Span::styled(node.label(), node_style(node.kind())),
                Span::styled(
                    format!("  :{}", node.line()),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ])
        })
        .collect()
}

/// Render the tree pane, or the compile error when there is no tree.
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    outcome: Result<&Node, &ParseError>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Syntax Tree ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let root = match outcome {
        Ok(root) => root,
        Err(error) => {
            let paragraph = Paragraph::new(error.to_string())
                .block(block.padding(Padding::new(1, 1, 0, 0)))
                .style(Style::default().fg(DEFAULT_THEME.error))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let lines = tree_lines(root);
    // Account for borders, min 1
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(ListItem::new)
        .collect();
    let list = List::new(items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}
