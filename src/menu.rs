use ratatui::layout::Rect;

use crate::item::MenuItem;

/// Widest a menu body may grow, borders included.
const MENU_MAX_WIDTH: u16 = 34;

/// Screen coordinate used to anchor pop-up menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

pub(crate) fn point_in_rect(x: u16, y: u16, r: Rect) -> bool {
    x >= r.x && x < r.x.saturating_add(r.width) && y >= r.y && y < r.y.saturating_add(r.height)
}

/// Place a `w` x `h` frame with its top-left corner as close to `(x, y)` as
/// the viewport allows, shifting it back inside when it would spill over an
/// edge.
pub(crate) fn place_region(x: i32, y: i32, w: u16, h: u16, viewport: Rect) -> Rect {
    let w = w.min(viewport.width.max(1));
    let h = h.min(viewport.height.max(1));
    let max_x = i32::from(viewport.x) + i32::from(viewport.width.saturating_sub(w));
    let max_y = i32::from(viewport.y) + i32::from(viewport.height.saturating_sub(h));
    Rect {
        x: x.clamp(i32::from(viewport.x), max_x.max(i32::from(viewport.x))) as u16,
        y: y.clamp(i32::from(viewport.y), max_y.max(i32::from(viewport.y))) as u16,
        width: w,
        height: h,
    }
}

/// An ordered collection of items with at most one highlighted at a time.
/// Open/closed bookkeeping and the on-screen region are maintained by the
/// owning `MenuScreen`; the cascade chain itself lives there too, so menus
/// hold no parent references.
#[derive(Debug, Clone)]
pub struct Menu {
    id: String,
    items: Vec<MenuItem>,
    highlight: Option<usize>,
    open: bool,
    region: Option<Rect>,
}

impl Menu {
    pub fn new(id: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            id: id.into(),
            items,
            highlight: None,
            open: false,
            region: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn item(&self, idx: usize) -> Option<&MenuItem> {
        self.items.get(idx)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub(crate) fn open_at(&mut self, region: Rect) {
        self.open = true;
        self.region = Some(region);
        self.highlight = None;
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
        self.region = None;
        self.highlight = None;
    }

    /// Highlight an item by index; non-selectable targets clear the
    /// highlight instead, preserving the one-highlight invariant.
    pub fn set_highlight(&mut self, idx: Option<usize>) {
        self.highlight = match idx {
            Some(i) if self.items.get(i).is_some_and(MenuItem::is_selectable) => Some(i),
            _ => None,
        };
    }

    pub fn first_selectable(&self) -> Option<usize> {
        self.items.iter().position(MenuItem::is_selectable)
    }

    /// Move the highlight down, wrapping across selectable items only.
    pub fn highlight_next(&mut self) {
        self.step_highlight(1);
    }

    /// Move the highlight up, wrapping across selectable items only.
    pub fn highlight_previous(&mut self) {
        self.step_highlight(-1);
    }

    fn step_highlight(&mut self, dir: i32) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let start = match self.highlight {
            Some(i) => i,
            None => {
                // No highlight yet: land on the first selectable item from
                // the appropriate end.
                self.highlight = if dir > 0 {
                    self.first_selectable()
                } else {
                    self.items.iter().rposition(MenuItem::is_selectable)
                };
                return;
            }
        };
        let mut idx = start;
        for _ in 0..len {
            idx = if dir > 0 {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            };
            if self.items[idx].is_selectable() {
                self.highlight = Some(idx);
                return;
            }
        }
    }

    /// Hit-test a screen point against the open menu body. Returns the item
    /// index under the point, border rows excluded.
    pub fn item_row_at(&self, x: u16, y: u16) -> Option<usize> {
        let region = self.region?;
        if !point_in_rect(x, y, region) {
            return None;
        }
        if x == region.x || x + 1 >= region.x + region.width {
            return None;
        }
        if y <= region.y {
            return None;
        }
        let row = (y - region.y - 1) as usize;
        if row < self.items.len() {
            Some(row)
        } else {
            None
        }
    }

    /// Frame size needed to show every item: longest label plus the marker
    /// column, capped, with one border on each side.
    pub(crate) fn frame_size(&self) -> (u16, u16) {
        let longest = self
            .items
            .iter()
            .map(|item| item.label().chars().count())
            .max()
            .unwrap_or(8);
        let width = ((longest + 5).min(MENU_MAX_WIDTH as usize)) as u16;
        let height = self.items.len() as u16 + 2;
        (width.max(6), height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_menu() -> Menu {
        Menu::new(
            "file_menu",
            vec![
                MenuItem::action("New", "file.new"),
                MenuItem::action("Open", "file.open"),
                MenuItem::separator(),
                MenuItem::action("Broken", "file.broken").disabled(true),
                MenuItem::action("Quit", "app.quit"),
            ],
        )
    }

    #[test]
    fn highlight_wraps_and_skips_disabled_and_spacers() {
        let mut menu = sample_menu();
        menu.highlight_next();
        assert_eq!(menu.highlight(), Some(0));
        menu.highlight_next();
        assert_eq!(menu.highlight(), Some(1));
        // Skips the separator and the disabled item.
        menu.highlight_next();
        assert_eq!(menu.highlight(), Some(4));
        menu.highlight_next();
        assert_eq!(menu.highlight(), Some(0));
        menu.highlight_previous();
        assert_eq!(menu.highlight(), Some(4));
    }

    #[test]
    fn first_previous_from_empty_highlight_lands_on_last_selectable() {
        let mut menu = sample_menu();
        menu.highlight_previous();
        assert_eq!(menu.highlight(), Some(4));
    }

    #[test]
    fn set_highlight_rejects_non_selectable_rows() {
        let mut menu = sample_menu();
        menu.set_highlight(Some(2));
        assert_eq!(menu.highlight(), None);
        menu.set_highlight(Some(3));
        assert_eq!(menu.highlight(), None);
        menu.set_highlight(Some(1));
        assert_eq!(menu.highlight(), Some(1));
        menu.set_highlight(Some(99));
        assert_eq!(menu.highlight(), None);
    }

    #[test]
    fn item_row_hit_testing_excludes_borders() {
        let mut menu = sample_menu();
        menu.open_at(Rect::new(10, 5, 12, 7));
        // Border rows and columns miss.
        assert_eq!(menu.item_row_at(10, 6), None);
        assert_eq!(menu.item_row_at(21, 6), None);
        assert_eq!(menu.item_row_at(12, 5), None);
        // First item row.
        assert_eq!(menu.item_row_at(12, 6), Some(0));
        assert_eq!(menu.item_row_at(12, 10), Some(4));
        // Outside entirely.
        assert_eq!(menu.item_row_at(30, 6), None);
    }

    #[test]
    fn closing_clears_highlight_and_region() {
        let mut menu = sample_menu();
        menu.open_at(Rect::new(0, 0, 12, 7));
        menu.set_highlight(Some(0));
        menu.close();
        assert!(!menu.is_open());
        assert_eq!(menu.region(), None);
        assert_eq!(menu.highlight(), None);
    }

    #[test]
    fn place_region_clamps_into_viewport() {
        let viewport = Rect::new(0, 0, 80, 24);
        let r = place_region(75, 20, 12, 7, viewport);
        assert!(r.x + r.width <= 80);
        assert!(r.y + r.height <= 24);
        // Negative origins clamp to the viewport corner.
        let r = place_region(-3, -1, 12, 7, viewport);
        assert_eq!((r.x, r.y), (0, 0));
    }
}
