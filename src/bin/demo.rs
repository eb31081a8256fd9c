use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use std::io::stdout;
use std::time::Duration;

use termenu::{
    draw_menu_bar, draw_menus, ActionHost, MenuScreen, MenuSetDef, MenuTheme, NavOutcome, Point,
};

type Term = ratatui::Terminal<CrosstermBackend<std::io::Stdout>>;

const MENUS_JSON: &str = r#"{
    "bar": [
        { "label": "File", "menu": "file_menu" },
        { "label": "Edit", "menu": "edit_menu" },
        { "label": "Help", "menu": "help_menu" }
    ],
    "menus": [
        {
            "id": "file_menu",
            "items": [
                { "label": "New", "action": "file.new" },
                { "label": "Open...", "action": "file.open" },
                { "label": "Recent", "action": "menu.recent_menu" },
                { "separator": true },
                { "label": "Export", "action": "file.export", "disabled": true },
                { "label": "Quit", "action": "app.quit" }
            ]
        },
        {
            "id": "recent_menu",
            "items": [
                { "label": "notes.txt", "action": "file.recent.notes" },
                { "label": "More", "action": "menu.more_recent_menu" }
            ]
        },
        {
            "id": "more_recent_menu",
            "items": [ { "label": "(none yet)" } ]
        },
        {
            "id": "edit_menu",
            "items": [
                { "label": "Undo", "action": "edit.undo" },
                { "label": "Redo", "action": "edit.redo", "disabled": true }
            ]
        },
        {
            "id": "help_menu",
            "items": [ { "label": "About", "action": "app.about" } ]
        },
        {
            "id": "context_menu",
            "items": [
                { "label": "Inspect", "action": "ctx.inspect" },
                { "label": "Refresh", "action": "ctx.refresh" }
            ]
        }
    ]
}"#;

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(ratatui::Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// ── Demo host ─────────────────────────────────────────────────────────────────

struct DemoHost {
    status: String,
    quit: bool,
}

impl ActionHost for DemoHost {
    fn run_action(&mut self, action: &str) -> Result<()> {
        if action == "app.quit" {
            self.quit = true;
        }
        self.status = format!("action: {action}");
        Ok(())
    }
}

// ── Main loop ─────────────────────────────────────────────────────────────────

fn run(terminal: &mut Term) -> Result<()> {
    let mut screen = MenuScreen::new();
    MenuSetDef::from_json(MENUS_JSON)?.install(&mut screen)?;
    let theme = MenuTheme::default();
    let mut host = DemoHost {
        status: "F10 or click the bar; right-click for a context menu; q quits".to_string(),
        quit: false,
    };

    loop {
        terminal.draw(|f| {
            let size = f.area();
            screen.set_viewport(size);
            let bar_area = Rect {
                x: size.x,
                y: size.y,
                width: size.width,
                height: 1,
            };
            if let Some(bar) = screen.bar_mut() {
                bar.layout(bar_area);
            }
            if let Some(bar) = screen.bar() {
                draw_menu_bar(f, bar, &theme);
            }
            if size.height > 1 {
                let status = Rect {
                    x: size.x,
                    y: size.y + size.height - 1,
                    width: size.width,
                    height: 1,
                };
                f.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        format!(" {}", host.status),
                        Style::default(),
                    ))),
                    status,
                );
            }
            draw_menus(f, &screen, &theme);
        })?;

        if host.quit {
            return Ok(());
        }
        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                let outcome = screen.process_key(key.code, &mut host)?;
                if matches!(outcome, NavOutcome::Pass) {
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::F(10) => {
                            screen.activate_bar()?;
                        }
                        _ => {}
                    }
                }
            }
            Event::Mouse(mouse) => {
                use crossterm::event::{MouseButton, MouseEventKind};
                if mouse.kind == MouseEventKind::Down(MouseButton::Right) {
                    let _handle = screen
                        .context_menu("context_menu", Point::new(mouse.column, mouse.row), false)?;
                    host.status = "context menu open".to_string();
                    continue;
                }
                screen.process_mouse(mouse.kind, mouse.column, mouse.row, &mut host)?;
            }
            Event::Resize(_, _) => {}
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let mut terminal = init_terminal()?;
    let result = run(&mut terminal);
    restore_terminal(&mut terminal).ok();
    result
}
