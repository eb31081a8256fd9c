use ratatui::layout::Rect;

/// A clickable label in the menu bar referencing a top-level menu by id.
#[derive(Debug, Clone)]
pub struct MenuHeader {
    label: String,
    menu_id: String,
}

impl MenuHeader {
    pub fn new(label: impl Into<String>, menu_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            menu_id: menu_id.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn menu_id(&self) -> &str {
        &self.menu_id
    }
}

/// Ordered headers with at most one active at a time. The bar's on-screen
/// area is supplied by the host via `layout` each frame; header spans are
/// derived from it for hit-testing.
#[derive(Debug, Clone)]
pub struct MenuBar {
    headers: Vec<MenuHeader>,
    active: Option<usize>,
    key_nav: bool,
    area: Rect,
}

impl MenuBar {
    pub fn new(headers: Vec<MenuHeader>) -> Self {
        Self {
            headers,
            active: None,
            key_nav: false,
            area: Rect::default(),
        }
    }

    pub fn headers(&self) -> &[MenuHeader] {
        &self.headers
    }

    pub fn header(&self, idx: usize) -> Option<&MenuHeader> {
        self.headers.get(idx)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Activating a header deactivates all siblings.
    pub(crate) fn set_active(&mut self, idx: Option<usize>) {
        self.active = match idx {
            Some(i) if i < self.headers.len() => Some(i),
            _ => None,
        };
    }

    pub fn key_nav(&self) -> bool {
        self.key_nav
    }

    pub(crate) fn set_key_nav(&mut self, on: bool) {
        self.key_nav = on;
    }

    /// Record where the host drew the bar this frame.
    pub fn layout(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Screen span of one header: the label padded by one column each side,
    /// headers packed left to right.
    pub fn header_span(&self, idx: usize) -> Rect {
        let mut x = self.area.x;
        for (i, header) in self.headers.iter().enumerate() {
            let w = header.label.chars().count() as u16 + 2;
            if i == idx {
                let max_w = (self.area.x + self.area.width).saturating_sub(x);
                return Rect {
                    x,
                    y: self.area.y,
                    width: w.min(max_w),
                    height: self.area.height.min(1),
                };
            }
            x = x.saturating_add(w);
        }
        Rect::default()
    }

    pub fn header_at(&self, x: u16, y: u16) -> Option<usize> {
        if self.area.height == 0 || y != self.area.y {
            return None;
        }
        (0..self.headers.len()).find(|&i| {
            let span = self.header_span(i);
            span.width > 0 && x >= span.x && x < span.x + span.width
        })
    }

    pub(crate) fn next_idx(&self, from: usize) -> usize {
        if self.headers.is_empty() {
            return 0;
        }
        (from + 1) % self.headers.len()
    }

    pub(crate) fn prev_idx(&self, from: usize) -> usize {
        if self.headers.is_empty() {
            return 0;
        }
        (from + self.headers.len() - 1) % self.headers.len()
    }
}
