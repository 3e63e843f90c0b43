//! Source code pane rendering with syntax highlighting
//!
//! Words are classified with the lexer's own matcher, so the colors always
//! agree with how the compiler reads the program. Words the lexer rejects are
//! underlined in the error color.

use super::{border_style, clamp_scroll};
use crate::parser::lexer::{classify_word, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn word_style(word: &str) -> Style {
    let kind = match classify_word(word) {
        Some(kind) => kind,
        None => {
            return Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::UNDERLINED)
        }
    };
    match kind {
        k if k.is_data_type() => Style::default().fg(DEFAULT_THEME.type_name),
        k if k.is_function() => Style::default().fg(DEFAULT_THEME.function),
        k if k.is_variable() => Style::default().fg(DEFAULT_THEME.fg),
        TokenKind::CharLit | TokenKind::StrLit => Style::default().fg(DEFAULT_THEME.string),
        k if k.is_literal() => Style::default().fg(DEFAULT_THEME.number),
        k if k.is_arithmetic_operator() || k.is_comparison() || k == TokenKind::Assign => {
            Style::default().fg(DEFAULT_THEME.primary)
        }
        _ => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
    }
}

fn flush<'a>(line: &'a str, spans: &mut Vec<Span<'a>>, start: &mut Option<usize>, end: usize) {
    if let Some(s) = start.take() {
        spans.push(Span::styled(&line[s..end], word_style(&line[s..end])));
    }
}

/// Highlight one source line.
pub(crate) fn highlight_line(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut word_start = None;

    let mut chars = line.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '#' => {
                flush(line, &mut spans, &mut word_start, i);
                spans.push(Span::styled(&line[i..], Style::default().fg(DEFAULT_THEME.comment)));
                return Line::from(spans);
            }
            '"' => {
                flush(line, &mut spans, &mut word_start, i);
                let end = chars
                    .by_ref()
                    .find(|(_, c)| *c == '"')
                    .map(|(j, _)| j + 1)
                    .unwrap_or(line.len());
                spans.push(Span::styled(&line[i..end], Style::default().fg(DEFAULT_THEME.string)));
            }
            '(' | ')' | ',' => {
                flush(line, &mut spans, &mut word_start, i);
                let style = Style::default().fg(DEFAULT_THEME.primary);
                spans.push(Span::styled(&line[i..i + 1], style));
            }
            c if c.is_whitespace() => {
                flush(line, &mut spans, &mut word_start, i);
                spans.push(Span::raw(&line[i..i + c.len_utf8()]));
            }
            _ => {
                if word_start.is_none() {
                    word_start = Some(i);
                }
            }
        }
    }
    flush(line, &mut spans, &mut word_start, line.len());
    Line::from(spans)
}

/// Render the source code pane
///
/// `error_line` (1-based) is drawn on a highlighted background.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    error_line: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let lines: Vec<&str> = source_code.lines().collect();
    // Account for borders (2), min 1
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_error = error_line == Some(line_num);
            let num_style = if is_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content = highlight_line(line);
            if is_error {
                for span in &mut content.spans {
                    span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                }
                content
                    .spans
                    .push(Span::styled(" ◀", Style::default().fg(DEFAULT_THEME.error)));
            }

            let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = if visible_lines.is_empty() {
        Paragraph::new("(empty program)").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(visible_lines)
    };
    frame.render_widget(paragraph.block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line<'_>) -> Vec<String> {
        line.spans
            .iter()
            .filter(|s| !s.content.trim().is_empty())
            .map(|s| s.content.to_string())
            .collect()
    }

    #[test]
    fn test_words_and_delimiters_split() {
        let line = highlight_line("C -> SIN(1) # note");
        assert_eq!(texts(&line), vec!["C", "->", "SIN", "(", "1", ")", "# note"]);
    }

    #[test]
    fn test_string_kept_whole() {
        let line = highlight_line("DISPSTR \"a # b\"");
        assert_eq!(texts(&line), vec!["DISPSTR", "\"a # b\""]);
        assert_eq!(line.spans[2].style.fg, Some(DEFAULT_THEME.string));
    }

    #[test]
    fn test_categories_pick_colors() {
        assert_eq!(word_style("int32").fg, Some(DEFAULT_THEME.type_name));
        assert_eq!(word_style("0x1F").fg, Some(DEFAULT_THEME.number));
        assert_eq!(word_style("==").fg, Some(DEFAULT_THEME.primary));
        assert_eq!(word_style("then").fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(word_style("1+2").fg, Some(DEFAULT_THEME.error));
    }
}
