use crossterm::event::{KeyCode, MouseButton, MouseEventKind};

use anyhow::Result;

use crate::error::MenuError;
use crate::menu::{point_in_rect, Menu};
use crate::screen::{ActionHost, MenuScreen, RootAnchor, Selection};

/// The mutually-exclusive input-handling regime. Exactly one is active
/// screen-wide at any instant; entering a new one force-closes the old
/// chain rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    #[default]
    Idle,
    /// Menu opened by mouse-down; selects on mouse-up over an item,
    /// dismisses on mouse-up elsewhere.
    ClickHold,
    /// Menu opened by a full click; stays open, hover highlights, a second
    /// click selects.
    ClickRelease,
    /// Arrow keys move the highlight, Enter/Space activates, Escape pops.
    Keyboard,
}

/// What one input event did to the engine.
#[derive(Debug, Clone)]
pub enum NavOutcome {
    /// Not for the menu system; the host should handle the event itself.
    Pass,
    /// Consumed without completing navigation.
    Handled,
    /// An actionable item was selected. The chain is already closed;
    /// deliver the selection to invoke the callback or action.
    Selected(Selection),
    /// The chain was dismissed with no selection.
    Dismissed,
}

impl MenuScreen {
    /// Keyboard entry point for the menu bar: opens the first header's menu
    /// in keyboard navigation with its first selectable item highlighted.
    pub fn activate_bar(&mut self) -> Result<(), MenuError> {
        if self.bar().is_none() {
            return Err(MenuError::NoMenuBar);
        }
        self.open_from_header(0, NavMode::Keyboard)
    }

    // ── Keyboard ──────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, code: KeyCode) -> NavOutcome {
        if !self.is_open() {
            return NavOutcome::Pass;
        }
        if self.mode() != NavMode::Keyboard {
            // Click-driven menus still capture the keyboard; Escape is the
            // only key with meaning there.
            return match code {
                KeyCode::Esc => self.escape_level(),
                _ => NavOutcome::Handled,
            };
        }

        let deepest = self.depth() - 1;
        match code {
            KeyCode::Esc => self.escape_level(),
            KeyCode::Up => {
                self.with_deepest(Menu::highlight_previous);
                NavOutcome::Handled
            }
            KeyCode::Down | KeyCode::Tab => {
                self.with_deepest(Menu::highlight_next);
                NavOutcome::Handled
            }
            KeyCode::BackTab => {
                self.with_deepest(Menu::highlight_previous);
                NavOutcome::Handled
            }
            KeyCode::Right => {
                if let Some(row) = self.deepest_highlight() {
                    let (_, opener) = self.item_flags(deepest, row);
                    if opener {
                        if let Err(err) = self.open_submenu_from(deepest, row, true) {
                            log::warn!("cascade failed to open: {err}");
                        }
                        return NavOutcome::Handled;
                    }
                }
                if matches!(self.root(), Some(RootAnchor::Header(_))) {
                    self.switch_header(1);
                }
                NavOutcome::Handled
            }
            KeyCode::Left => {
                if deepest > 0 {
                    self.pop_level();
                } else if matches!(self.root(), Some(RootAnchor::Header(_))) {
                    self.switch_header(-1);
                }
                NavOutcome::Handled
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.deepest_highlight() {
                Some(row) => match self.select_at(deepest, row) {
                    Some(selection) => NavOutcome::Selected(selection),
                    None => NavOutcome::Handled,
                },
                None => NavOutcome::Handled,
            },
            _ => NavOutcome::Handled,
        }
    }

    /// Escape pops one cascade level; at the root it dismisses the chain.
    fn escape_level(&mut self) -> NavOutcome {
        if self.depth() > 1 {
            self.pop_level();
            NavOutcome::Handled
        } else {
            self.dismiss();
            NavOutcome::Dismissed
        }
    }

    // ── Mouse ─────────────────────────────────────────────────────────────

    pub fn handle_mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) -> NavOutcome {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(column, row),
            MouseEventKind::Up(MouseButton::Left) => self.mouse_up(column, row),
            MouseEventKind::Moved => {
                if !self.is_open() {
                    return NavOutcome::Pass;
                }
                // Motion with the button released ends the press-and-hold.
                if self.mode() == NavMode::ClickHold {
                    self.set_mode(NavMode::ClickRelease);
                }
                self.hover(column, row);
                NavOutcome::Handled
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.is_open() {
                    return NavOutcome::Pass;
                }
                self.hover(column, row);
                NavOutcome::Handled
            }
            _ => {
                if self.is_open() {
                    NavOutcome::Handled
                } else {
                    NavOutcome::Pass
                }
            }
        }
    }

    fn mouse_down(&mut self, x: u16, y: u16) -> NavOutcome {
        if let Some(idx) = self.bar().and_then(|b| b.header_at(x, y)) {
            // Clicking the already-active header toggles the chain closed;
            // a sibling header is dismiss-then-reopen.
            if self.is_open() && self.root() == Some(RootAnchor::Header(idx)) {
                self.dismiss();
                return NavOutcome::Dismissed;
            }
            if let Err(err) = self.open_from_header(idx, NavMode::ClickHold) {
                log::warn!("menu bar open failed: {err}");
            }
            return NavOutcome::Handled;
        }
        if let Some((depth, row)) = self.hit_chain(x, y) {
            let (selectable, opener) = self.item_flags(depth, row);
            if selectable && opener {
                let key = self.mode() == NavMode::Keyboard;
                if let Err(err) = self.open_submenu_from(depth, row, key) {
                    log::warn!("cascade failed to open: {err}");
                }
            }
            // Selection completes on the release edge.
            return NavOutcome::Handled;
        }
        if self.is_open() {
            self.dismiss();
            return NavOutcome::Dismissed;
        }
        NavOutcome::Pass
    }

    fn mouse_up(&mut self, x: u16, y: u16) -> NavOutcome {
        if !self.is_open() {
            return NavOutcome::Pass;
        }
        if self.bar().and_then(|b| b.header_at(x, y)).is_some() {
            if self.mode() == NavMode::ClickHold {
                // Full click on the bar: the menu stays open, hover-driven.
                self.set_mode(NavMode::ClickRelease);
            }
            return NavOutcome::Handled;
        }
        if let Some((depth, row)) = self.hit_chain(x, y) {
            let (selectable, opener) = self.item_flags(depth, row);
            if opener {
                if self.mode() == NavMode::ClickHold {
                    // Releasing the hold on a cascade link closes everything.
                    self.dismiss();
                    return NavOutcome::Dismissed;
                }
                return NavOutcome::Handled;
            }
            if !selectable {
                if self.mode() == NavMode::ClickHold {
                    self.set_mode(NavMode::ClickRelease);
                }
                return NavOutcome::Handled;
            }
            return match self.select_at(depth, row) {
                Some(selection) => NavOutcome::Selected(selection),
                None => NavOutcome::Handled,
            };
        }
        if self.mode() == NavMode::ClickHold {
            self.dismiss();
            return NavOutcome::Dismissed;
        }
        // Released outside after dragging off the pressed item: the
        // selection is cancelled and the menu stays open.
        NavOutcome::Handled
    }

    /// Hover maintenance: highlight the item under the pointer and keep the
    /// cascade consistent with it. Hovering a submenu opener opens its
    /// child; hovering any other row of a menu closes the cascade below it.
    fn hover(&mut self, x: u16, y: u16) {
        let Some((depth, row)) = self.hit_chain(x, y) else {
            return;
        };
        let (selectable, opener) = self.item_flags(depth, row);
        if selectable {
            if let Some(id) = self.menu_id_at(depth).map(str::to_string) {
                if let Ok(menu) = self.menu_mut(&id) {
                    menu.set_highlight(Some(row));
                }
            }
        }
        // The opener of the currently-open child keeps its cascade alive.
        if self.depth() > depth + 1 && self.opener_of(depth + 1) == Some(row) {
            return;
        }
        if selectable && opener {
            if let Err(err) = self.open_submenu_from(depth, row, false) {
                log::warn!("cascade failed to open: {err}");
                self.truncate_below(depth);
            }
        } else {
            self.truncate_below(depth);
        }
    }

    fn switch_header(&mut self, dir: i32) {
        let Some(RootAnchor::Header(idx)) = self.root() else {
            return;
        };
        let Some(bar) = self.bar() else {
            return;
        };
        if bar.is_empty() {
            return;
        }
        let next = if dir > 0 {
            bar.next_idx(idx)
        } else {
            bar.prev_idx(idx)
        };
        if let Err(err) = self.open_from_header(next, NavMode::Keyboard) {
            log::warn!("header switch failed: {err}");
        }
    }

    // ── Shared lookups ────────────────────────────────────────────────────

    /// Deepest-first hit test across the open chain.
    fn hit_chain(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        for depth in (0..self.depth()).rev() {
            let id = self.menu_id_at(depth)?;
            if let Ok(menu) = self.menu(id) {
                if let Some(row) = menu.item_row_at(x, y) {
                    return Some((depth, row));
                }
                // Inside the frame but on a border: still this menu's turf.
                if menu.region().is_some_and(|r| point_in_rect(x, y, r)) {
                    return None;
                }
            }
        }
        None
    }

    fn item_flags(&self, depth: usize, row: usize) -> (bool, bool) {
        let Some(id) = self.menu_id_at(depth) else {
            return (false, false);
        };
        match self.menu(id) {
            Ok(menu) => menu
                .item(row)
                .map(|item| (item.is_selectable(), item.is_submenu_opener()))
                .unwrap_or((false, false)),
            Err(_) => (false, false),
        }
    }

    fn deepest_highlight(&self) -> Option<usize> {
        let id = self.menu_id_at(self.depth().checked_sub(1)?)?;
        self.menu(id).ok()?.highlight()
    }

    fn with_deepest(&mut self, f: impl FnOnce(&mut Menu)) {
        let Some(id) = self
            .depth()
            .checked_sub(1)
            .and_then(|d| self.menu_id_at(d))
            .map(str::to_string)
        else {
            return;
        };
        if let Ok(menu) = self.menu_mut(&id) {
            f(menu);
        }
    }

    // ── Convenience wrappers ──────────────────────────────────────────────

    /// Run the engine on a key event and deliver any resulting selection to
    /// the host. Callback/action failures propagate untouched; the menu
    /// state is already consistent by then.
    pub fn process_key(&mut self, code: KeyCode, host: &mut dyn ActionHost) -> Result<NavOutcome> {
        let outcome = self.handle_key(code);
        if let NavOutcome::Selected(selection) = &outcome {
            selection.clone().deliver(host)?;
        }
        Ok(outcome)
    }

    pub fn process_mouse(
        &mut self,
        kind: MouseEventKind,
        column: u16,
        row: u16,
        host: &mut dyn ActionHost,
    ) -> Result<NavOutcome> {
        let outcome = self.handle_mouse(kind, column, row);
        if let NavOutcome::Selected(selection) = &outcome {
            selection.clone().deliver(host)?;
        }
        Ok(outcome)
    }
}
