use std::collections::HashMap;

use anyhow::Result;
use ratatui::layout::Rect;

use crate::bar::MenuBar;
use crate::error::MenuError;
use crate::item::{ItemCallback, ItemKind};
use crate::menu::{place_region, Menu, Point};
use crate::nav::NavMode;
use crate::popup::{PopupHandle, PopupOutcome};

/// What anchors the root of the open chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootAnchor {
    /// Opened from a menu bar header.
    Header(usize),
    /// Opened as a pop-up at an arbitrary screen position.
    Popup(Point),
}

/// One open menu in the cascade. `opened_from` is the item index in the
/// parent menu that opened this level; `None` only at the root.
#[derive(Debug, Clone)]
struct ChainLink {
    menu_id: String,
    opened_from: Option<usize>,
}

/// What a completed selection asks the host to do. Exactly one of these
/// fires per selection, strictly after the chain has closed.
#[derive(Debug, Clone)]
pub enum Invoke {
    Action(String),
    Callback(ItemCallback),
}

/// Outcome of selecting an actionable item. By the time the caller holds
/// one of these, the menu chain is already closed.
#[derive(Debug, Clone)]
pub struct Selection {
    pub menu: String,
    pub item: String,
    pub invoke: Invoke,
}

/// The active application screen's action dispatch. Failures propagate to
/// the host event loop; the menu engine never swallows them.
pub trait ActionHost {
    fn run_action(&mut self, action: &str) -> Result<()>;
}

impl Selection {
    /// Invoke the callback or dispatch the action on the host. Callback-only
    /// items receive an empty action string.
    pub fn deliver(self, host: &mut dyn ActionHost) -> Result<()> {
        match self.invoke {
            Invoke::Callback(cb) => {
                cb.invoke(&self.item, "");
                Ok(())
            }
            Invoke::Action(path) => host.run_action(&path),
        }
    }
}

/// Per-application container owning every mounted `Menu`, the optional menu
/// bar, and the one navigation-mode state machine. All chain and mode
/// mutations go through here; menus and the bar only carry their own local
/// state.
pub struct MenuScreen {
    menus: HashMap<String, Menu>,
    bar: Option<MenuBar>,
    chain: Vec<ChainLink>,
    root: Option<RootAnchor>,
    mode: NavMode,
    viewport: Rect,
    pending: Option<PopupHandle>,
}

impl Default for MenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuScreen {
    pub fn new() -> Self {
        Self {
            menus: HashMap::new(),
            bar: None,
            chain: Vec::new(),
            root: None,
            mode: NavMode::Idle,
            viewport: Rect::new(0, 0, 80, 24),
            pending: None,
        }
    }

    // ── Registry ──────────────────────────────────────────────────────────

    /// Mount a menu. Ids are unique for the lifetime of the mount.
    pub fn register(&mut self, menu: Menu) -> Result<(), MenuError> {
        if self.menus.contains_key(menu.id()) {
            return Err(MenuError::DuplicateMenu(menu.id().to_string()));
        }
        self.menus.insert(menu.id().to_string(), menu);
        Ok(())
    }

    /// Unmount a menu. If it is part of the open chain the whole chain is
    /// dismissed first so the cascade never dangles.
    pub fn unregister(&mut self, id: &str) -> Result<Menu, MenuError> {
        if self.chain.iter().any(|link| link.menu_id == id) {
            self.dismiss();
        }
        self.menus
            .remove(id)
            .ok_or_else(|| MenuError::UnknownMenu(id.to_string()))
    }

    pub fn menu(&self, id: &str) -> Result<&Menu, MenuError> {
        self.menus
            .get(id)
            .ok_or_else(|| MenuError::UnknownMenu(id.to_string()))
    }

    pub fn menu_mut(&mut self, id: &str) -> Result<&mut Menu, MenuError> {
        self.menus
            .get_mut(id)
            .ok_or_else(|| MenuError::UnknownMenu(id.to_string()))
    }

    pub fn set_bar(&mut self, bar: MenuBar) {
        self.bar = Some(bar);
    }

    pub fn bar(&self) -> Option<&MenuBar> {
        self.bar.as_ref()
    }

    pub fn bar_mut(&mut self) -> Option<&mut MenuBar> {
        self.bar.as_mut()
    }

    /// The visible screen area menus are clamped into. Hosts refresh this on
    /// resize.
    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    // ── Open-chain state ──────────────────────────────────────────────────

    pub fn mode(&self) -> NavMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: NavMode) {
        self.mode = mode;
    }

    pub fn is_open(&self) -> bool {
        !self.chain.is_empty()
    }

    /// Menu ids from the root to the deepest open cascade level.
    pub fn open_chain(&self) -> Vec<&str> {
        self.chain.iter().map(|link| link.menu_id.as_str()).collect()
    }

    pub fn root(&self) -> Option<RootAnchor> {
        self.root
    }

    pub(crate) fn depth(&self) -> usize {
        self.chain.len()
    }

    pub(crate) fn menu_id_at(&self, depth: usize) -> Option<&str> {
        self.chain.get(depth).map(|link| link.menu_id.as_str())
    }

    pub(crate) fn opener_of(&self, depth: usize) -> Option<usize> {
        self.chain.get(depth).and_then(|link| link.opened_from)
    }

    // ── Opening ───────────────────────────────────────────────────────────

    /// Open the menu referenced by a bar header, force-closing any chain
    /// already open (including a pending pop-up, which resolves as
    /// dismissed).
    pub fn open_from_header(&mut self, idx: usize, mode: NavMode) -> Result<(), MenuError> {
        let (menu_id, span, bar_y) = {
            let bar = self.bar.as_ref().ok_or(MenuError::NoMenuBar)?;
            let header = bar.header(idx).ok_or(MenuError::UnknownHeader(idx))?;
            (header.menu_id().to_string(), bar.header_span(idx), bar.area().y)
        };
        if !self.menus.contains_key(&menu_id) {
            return Err(MenuError::UnknownMenu(menu_id));
        }
        self.force_close();

        let key = mode == NavMode::Keyboard;
        self.open_level(&menu_id, i32::from(span.x), i32::from(bar_y) + 1, None, key);
        self.root = Some(RootAnchor::Header(idx));
        self.mode = mode;
        if let Some(bar) = self.bar.as_mut() {
            bar.set_active(Some(idx));
            bar.set_key_nav(key);
        }
        Ok(())
    }

    /// Open a menu as a pop-up rooted at an arbitrary position, independent
    /// of the bar. `key` starts keyboard navigation directly; otherwise the
    /// pop-up is click-driven. The returned handle resolves exactly once.
    pub fn context_menu(
        &mut self,
        id: &str,
        at: Point,
        key: bool,
    ) -> Result<PopupHandle, MenuError> {
        if !self.menus.contains_key(id) {
            return Err(MenuError::UnknownMenu(id.to_string()));
        }
        self.force_close();

        self.open_level(id, i32::from(at.x), i32::from(at.y), None, key);
        self.root = Some(RootAnchor::Popup(at));
        self.mode = if key {
            NavMode::Keyboard
        } else {
            NavMode::ClickRelease
        };
        let handle = PopupHandle::new();
        self.pending = Some(handle.clone());
        Ok(handle)
    }

    /// Open the submenu linked by `item_idx` of the chain level `depth` as
    /// its cascade child, closing any deeper levels first. A dangling link
    /// fails only this one open; the parent stays open.
    pub(crate) fn open_submenu_from(
        &mut self,
        depth: usize,
        item_idx: usize,
        key: bool,
    ) -> Result<(), MenuError> {
        let Some(parent_id) = self.menu_id_at(depth).map(str::to_string) else {
            return Ok(());
        };
        let parent = self.menu(&parent_id)?;
        let Some(item) = parent.item(item_idx) else {
            return Ok(());
        };
        let Some(target) = item.submenu_id().map(str::to_string) else {
            return Ok(());
        };
        if !self.menus.contains_key(&target) {
            return Err(MenuError::BadSubmenuLink {
                menu: parent_id,
                item: item.label().to_string(),
                target,
            });
        }
        if self.chain.iter().any(|link| link.menu_id == target) {
            return Err(MenuError::AlreadyOpen(target));
        }

        self.truncate_below(depth);
        let Some(parent_region) = self
            .menus
            .get(&parent_id)
            .and_then(Menu::region)
        else {
            return Ok(());
        };
        if let Some(parent) = self.menus.get_mut(&parent_id) {
            parent.set_highlight(Some(item_idx));
        }
        // Child's first row lines up with the opener row, anchored at the
        // parent's right border.
        let x = i32::from(parent_region.x) + i32::from(parent_region.width) - 1;
        let y = i32::from(parent_region.y) + item_idx as i32;
        self.open_level(&target, x, y, Some(item_idx), key);
        Ok(())
    }

    fn open_level(&mut self, id: &str, x: i32, y: i32, opened_from: Option<usize>, key: bool) {
        let Some(menu) = self.menus.get_mut(id) else {
            return;
        };
        let (w, h) = menu.frame_size();
        let region = place_region(x, y, w, h, self.viewport);
        menu.open_at(region);
        if key {
            let first = menu.first_selectable();
            menu.set_highlight(first);
        }
        self.chain.push(ChainLink {
            menu_id: id.to_string(),
            opened_from,
        });
    }

    // ── Closing ───────────────────────────────────────────────────────────

    /// Close every level deeper than `depth`, deepest first.
    pub(crate) fn truncate_below(&mut self, depth: usize) {
        while self.chain.len() > depth + 1 {
            if let Some(link) = self.chain.pop() {
                if let Some(menu) = self.menus.get_mut(&link.menu_id) {
                    menu.close();
                }
            }
        }
    }

    /// Close only the deepest cascade level. In keyboard navigation the
    /// highlight returns to the parent item that opened it.
    pub(crate) fn pop_level(&mut self) {
        if self.chain.len() <= 1 {
            return;
        }
        let Some(link) = self.chain.pop() else {
            return;
        };
        if let Some(menu) = self.menus.get_mut(&link.menu_id) {
            menu.close();
        }
        if self.mode == NavMode::Keyboard {
            if let Some(opener) = link.opened_from {
                if let Some(parent_id) = self.chain.last().map(|l| l.menu_id.clone()) {
                    if let Some(parent) = self.menus.get_mut(&parent_id) {
                        parent.set_highlight(Some(opener));
                    }
                }
            }
        }
    }

    /// Close the whole chain and return to idle. Dismissing an idle engine
    /// is a no-op. A pending pop-up resolves as dismissed.
    pub fn dismiss(&mut self) {
        if self.chain.is_empty() && self.mode == NavMode::Idle && self.pending.is_none() {
            return;
        }
        self.force_close();
    }

    /// Unconditional close, resolving a pending pop-up as dismissed.
    fn force_close(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.resolve(PopupOutcome::Dismissed);
        }
        self.close_chain();
    }

    fn close_chain(&mut self) {
        while let Some(link) = self.chain.pop() {
            if let Some(menu) = self.menus.get_mut(&link.menu_id) {
                menu.close();
            }
        }
        self.root = None;
        self.mode = NavMode::Idle;
        if let Some(bar) = self.bar.as_mut() {
            bar.set_active(None);
            bar.set_key_nav(false);
        }
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Activate the item at `(depth, item_idx)`. Disabled rows are a defined
    /// no-op, submenu openers cascade, and actionable items close the whole
    /// chain before the returned `Selection` is delivered. A pending pop-up
    /// resolves with the selected item's identity.
    pub(crate) fn select_at(&mut self, depth: usize, item_idx: usize) -> Option<Selection> {
        let menu_id = self.menu_id_at(depth)?.to_string();
        let (label, kind) = {
            let item = self.menus.get(&menu_id)?.item(item_idx)?;
            if !item.is_selectable() {
                return None;
            }
            (item.label().to_string(), item.kind().clone())
        };
        let invoke = match kind {
            ItemKind::Submenu(_) => {
                let key = self.mode == NavMode::Keyboard;
                if let Err(err) = self.open_submenu_from(depth, item_idx, key) {
                    log::warn!("cascade failed to open: {err}");
                }
                return None;
            }
            ItemKind::Spacer => return None,
            ItemKind::Action(path) => Invoke::Action(path),
            ItemKind::Callback(cb) => Invoke::Callback(cb),
        };
        let selection = Selection {
            menu: menu_id,
            item: label,
            invoke,
        };
        if let Some(handle) = self.pending.take() {
            handle.resolve(PopupOutcome::Selected {
                menu: selection.menu.clone(),
                item: selection.item.clone(),
            });
        }
        self.close_chain();
        Some(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::MenuHeader;
    use crate::item::MenuItem;

    fn screen_with_cascade() -> MenuScreen {
        let mut screen = MenuScreen::new();
        screen.set_viewport(Rect::new(0, 0, 80, 24));
        screen
            .register(Menu::new(
                "app_menu",
                vec![
                    MenuItem::action("About", "screen.about"),
                    MenuItem::submenu("More...", "more_menu"),
                    MenuItem::action("Quit", "screen.quit"),
                ],
            ))
            .unwrap();
        screen
            .register(Menu::new(
                "more_menu",
                vec![MenuItem::action("Extra", "screen.extra")],
            ))
            .unwrap();
        let mut bar = MenuBar::new(vec![MenuHeader::new("App", "app_menu")]);
        bar.layout(Rect::new(0, 0, 80, 1));
        screen.set_bar(bar);
        screen
    }

    fn assert_chain_consistent(screen: &MenuScreen) {
        let open_ids: Vec<String> = screen
            .open_chain()
            .iter()
            .map(|s| s.to_string())
            .collect();
        for id in &open_ids {
            assert!(screen.menu(id).unwrap().is_open());
        }
        // Every menu outside the chain is closed: the open set is exactly
        // the one connected chain.
        for (id, menu) in &screen.menus {
            assert_eq!(menu.is_open(), open_ids.contains(id), "menu {id}");
        }
        // Every non-root level records the parent item that opened it.
        for depth in 1..screen.depth() {
            assert!(screen.opener_of(depth).is_some());
        }
    }

    #[test]
    fn register_rejects_duplicates_and_lookup_reports_missing() {
        let mut screen = MenuScreen::new();
        screen.register(Menu::new("m", vec![])).unwrap();
        assert!(matches!(
            screen.register(Menu::new("m", vec![])),
            Err(MenuError::DuplicateMenu(_))
        ));
        assert!(matches!(screen.menu("nope"), Err(MenuError::UnknownMenu(_))));
        assert!(matches!(
            screen.unregister("nope"),
            Err(MenuError::UnknownMenu(_))
        ));
    }

    #[test]
    fn open_chain_stays_connected_through_cascade_ops() {
        let mut screen = screen_with_cascade();
        screen.open_from_header(0, NavMode::Keyboard).unwrap();
        assert_chain_consistent(&screen);

        screen.open_submenu_from(0, 1, true).unwrap();
        assert_eq!(screen.open_chain(), vec!["app_menu", "more_menu"]);
        assert_chain_consistent(&screen);

        screen.pop_level();
        assert_eq!(screen.open_chain(), vec!["app_menu"]);
        // Keyboard highlight returned to the opener item.
        assert_eq!(screen.menu("app_menu").unwrap().highlight(), Some(1));
        assert_chain_consistent(&screen);

        screen.dismiss();
        assert!(!screen.is_open());
        assert_eq!(screen.mode(), NavMode::Idle);
        assert_chain_consistent(&screen);
    }

    #[test]
    fn dismissing_idle_engine_is_a_no_op() {
        let mut screen = screen_with_cascade();
        screen.dismiss();
        screen.dismiss();
        assert!(!screen.is_open());
        assert_eq!(screen.mode(), NavMode::Idle);
    }

    #[test]
    fn opening_a_new_root_force_closes_the_old_chain() {
        let mut screen = screen_with_cascade();
        screen.open_from_header(0, NavMode::ClickHold).unwrap();
        screen.open_submenu_from(0, 1, false).unwrap();

        let handle = screen
            .context_menu("more_menu", Point::new(10, 10), false)
            .unwrap();
        assert_eq!(screen.open_chain(), vec!["more_menu"]);
        assert_eq!(screen.mode(), NavMode::ClickRelease);
        assert!(!handle.is_resolved());
        assert_chain_consistent(&screen);

        // And the pop-up in turn resolves as dismissed when a header opens.
        screen.open_from_header(0, NavMode::ClickHold).unwrap();
        assert_eq!(handle.try_take(), Some(PopupOutcome::Dismissed));
    }

    #[test]
    fn dangling_submenu_link_leaves_parent_open() {
        let mut screen = MenuScreen::new();
        screen
            .register(Menu::new(
                "root",
                vec![MenuItem::submenu("Ghost", "missing_menu")],
            ))
            .unwrap();
        let handle = screen.context_menu("root", Point::new(2, 2), true).unwrap();
        let err = screen.open_submenu_from(0, 0, true).unwrap_err();
        assert!(matches!(err, MenuError::BadSubmenuLink { .. }));
        assert_eq!(screen.open_chain(), vec!["root"]);
        assert!(!handle.is_resolved());
    }

    #[test]
    fn cascade_cycles_are_refused() {
        let mut screen = MenuScreen::new();
        screen
            .register(Menu::new("a", vec![MenuItem::submenu("B", "b")]))
            .unwrap();
        screen
            .register(Menu::new("b", vec![MenuItem::submenu("A", "a")]))
            .unwrap();
        screen.context_menu("a", Point::new(0, 0), true).unwrap();
        screen.open_submenu_from(0, 0, true).unwrap();
        let err = screen.open_submenu_from(1, 0, true).unwrap_err();
        assert!(matches!(err, MenuError::AlreadyOpen(_)));
        assert_eq!(screen.open_chain(), vec!["a", "b"]);
    }

    #[test]
    fn unregistering_an_open_menu_dismisses_the_chain() {
        let mut screen = screen_with_cascade();
        screen.open_from_header(0, NavMode::Keyboard).unwrap();
        screen.open_submenu_from(0, 1, true).unwrap();
        screen.unregister("more_menu").unwrap();
        assert!(!screen.is_open());
        assert!(matches!(
            screen.menu("more_menu"),
            Err(MenuError::UnknownMenu(_))
        ));
        // Remaining menus are all closed.
        assert!(!screen.menu("app_menu").unwrap().is_open());
    }

    #[test]
    fn selection_closes_chain_before_returning() {
        let mut screen = screen_with_cascade();
        screen.open_from_header(0, NavMode::Keyboard).unwrap();
        let selection = screen.select_at(0, 2).expect("actionable item");
        assert!(!screen.is_open());
        assert_eq!(screen.mode(), NavMode::Idle);
        assert_eq!(selection.menu, "app_menu");
        assert_eq!(selection.item, "Quit");
        assert!(matches!(selection.invoke, Invoke::Action(ref p) if p == "screen.quit"));
    }
}
