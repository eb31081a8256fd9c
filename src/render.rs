use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::bar::MenuBar;
use crate::item::ItemKind;
use crate::screen::MenuScreen;

/// Arrow marker drawn in the right border column of submenu openers.
const SUBMENU_ARROW: char = '>';

/// Styles for every menu surface. Hosts restyle by constructing their own.
#[derive(Debug, Clone, Copy)]
pub struct MenuTheme {
    pub normal: Style,
    pub selected: Style,
    pub disabled: Style,
    pub frame: Style,
}

impl Default for MenuTheme {
    fn default() -> Self {
        let fg = Color::Green;
        Self {
            normal: Style::default().fg(fg),
            selected: Style::default()
                .fg(Color::Black)
                .bg(fg)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(fg).add_modifier(Modifier::DIM),
            frame: Style::default().fg(fg).add_modifier(Modifier::BOLD),
        }
    }
}

/// One menu body row: the label indented by one column, padded or clipped
/// to `width`, with an optional arrow marker in the second-to-last column.
fn format_menu_row(width: usize, label: &str, right_arrow: Option<char>) -> String {
    let mut row: Vec<char> = std::iter::once(' ')
        .chain(label.chars())
        .chain(std::iter::repeat(' '))
        .take(width)
        .collect();
    if let Some(arrow) = right_arrow {
        if width >= 2 {
            row[width - 2] = arrow;
        }
    }
    row.into_iter().collect()
}

/// Draw the header strip. Call `bar.layout(area)` with the same area first
/// so hit-testing and rendering agree.
pub fn draw_menu_bar(f: &mut Frame, bar: &MenuBar, theme: &MenuTheme) {
    let area = bar.area();
    if area.height == 0 || area.width == 0 {
        return;
    }
    let mut spans: Vec<Span> = Vec::new();
    let mut consumed = 0u16;
    for (i, header) in bar.headers().iter().enumerate() {
        let span = bar.header_span(i);
        if span.width == 0 {
            break;
        }
        let style = if bar.active() == Some(i) {
            theme.selected
        } else {
            theme.normal
        };
        spans.push(Span::styled(format!(" {} ", header.label()), style));
        consumed = consumed.saturating_add(span.width);
    }
    let fill = area.width.saturating_sub(consumed) as usize;
    if fill > 0 {
        spans.push(Span::styled(" ".repeat(fill), theme.normal));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw every open menu in the cascade, root first so children overlap their
/// parents the way they were opened.
pub fn draw_menus(f: &mut Frame, screen: &MenuScreen, theme: &MenuTheme) {
    for id in screen.open_chain() {
        let Ok(menu) = screen.menu(id) else {
            continue;
        };
        let Some(region) = menu.region() else {
            continue;
        };
        draw_menu_frame(f, region, theme);
        let inner_w = region.width.saturating_sub(2) as usize;
        let mut lines = Vec::new();
        for (i, item) in menu.items().iter().enumerate() {
            let line = match item.kind() {
                ItemKind::Spacer if item.label().is_empty() => {
                    Line::from(Span::styled("-".repeat(inner_w), theme.disabled))
                }
                kind => {
                    let arrow = matches!(kind, ItemKind::Submenu(_)).then_some(SUBMENU_ARROW);
                    let style = if menu.highlight() == Some(i) {
                        theme.selected
                    } else if item.is_selectable() {
                        theme.normal
                    } else {
                        theme.disabled
                    };
                    Line::from(Span::styled(
                        format_menu_row(inner_w, item.label(), arrow),
                        style,
                    ))
                }
            };
            lines.push(line);
        }
        f.render_widget(
            Paragraph::new(lines),
            Rect {
                x: region.x + 1,
                y: region.y + 1,
                width: region.width.saturating_sub(2),
                height: region.height.saturating_sub(2),
            },
        );
    }
}

fn draw_menu_frame(f: &mut Frame, region: Rect, theme: &MenuTheme) {
    f.render_widget(Clear, region);
    f.render_widget(
        Block::default().borders(Borders::ALL).style(theme.frame),
        region,
    );
}
