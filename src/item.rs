use std::fmt;
use std::rc::Rc;

/// Reserved prefix marking an action string as a cascade link.
pub const SUBMENU_PREFIX: &str = "menu.";

/// Host callback invoked after the menu chain has closed, as
/// `(item_name, action)`. Callback-only items receive an empty action.
#[derive(Clone)]
pub struct ItemCallback(Rc<dyn Fn(&str, &str)>);

impl ItemCallback {
    pub fn new(f: impl Fn(&str, &str) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn invoke(&self, name: &str, action: &str) {
        (self.0)(name, action);
    }
}

impl fmt::Debug for ItemCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemCallback")
    }
}

/// What activating an item does. Resolved at construction time, so the
/// reserved `menu.` prefix never has to be re-parsed at dispatch time.
#[derive(Debug, Clone)]
pub enum ItemKind {
    /// Named action dispatched on the active application screen.
    Action(String),
    /// Host callback invoked directly.
    Callback(ItemCallback),
    /// Cascade link to the menu with this id.
    Submenu(String),
    /// Non-interactive row; a blank label renders as a separator line.
    Spacer,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    label: String,
    kind: ItemKind,
    disabled: bool,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, kind: ItemKind) -> Self {
        let disabled = matches!(kind, ItemKind::Spacer);
        Self {
            label: label.into(),
            kind,
            disabled,
        }
    }

    /// Item that dispatches a named action. An action string carrying the
    /// `menu.` prefix is a cascade link and becomes a submenu opener.
    pub fn action(label: impl Into<String>, action: impl Into<String>) -> Self {
        let action = action.into();
        match action.strip_prefix(SUBMENU_PREFIX) {
            Some(target) if !target.is_empty() => {
                Self::new(label, ItemKind::Submenu(target.to_string()))
            }
            _ => Self::new(label, ItemKind::Action(action)),
        }
    }

    pub fn callback(label: impl Into<String>, f: impl Fn(&str, &str) + 'static) -> Self {
        Self::new(label, ItemKind::Callback(ItemCallback::new(f)))
    }

    pub fn submenu(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(label, ItemKind::Submenu(target.into()))
    }

    /// Blank separator row.
    pub fn separator() -> Self {
        Self::new("", ItemKind::Spacer)
    }

    /// Labelled but inert row, e.g. "(no entries)".
    pub fn note(label: impl Into<String>) -> Self {
        Self::new(label, ItemKind::Spacer)
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled || matches!(self.kind, ItemKind::Spacer);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_submenu_opener(&self) -> bool {
        matches!(self.kind, ItemKind::Submenu(_))
    }

    /// Whether navigation may highlight or activate this item.
    pub fn is_selectable(&self) -> bool {
        !self.disabled && !matches!(self.kind, ItemKind::Spacer)
    }

    pub fn submenu_id(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Submenu(id) => Some(id),
            _ => None,
        }
    }

    /// The action string carried by this item, empty for callback/spacer rows.
    pub fn action_path(&self) -> &str {
        match &self.kind {
            ItemKind::Action(path) => path,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn action_prefix_becomes_submenu_link() {
        let item = MenuItem::action("More...", "menu.more_menu");
        assert!(item.is_submenu_opener());
        assert_eq!(item.submenu_id(), Some("more_menu"));
        assert_eq!(item.action_path(), "");

        let plain = MenuItem::action("About", "screen.about");
        assert!(!plain.is_submenu_opener());
        assert_eq!(plain.action_path(), "screen.about");
    }

    #[test]
    fn bare_menu_prefix_is_a_plain_action() {
        // "menu." with no id cannot name a cascade target.
        let item = MenuItem::action("Broken", "menu.");
        assert!(!item.is_submenu_opener());
    }

    #[test]
    fn spacers_are_never_selectable() {
        let sep = MenuItem::separator();
        assert!(sep.is_disabled());
        assert!(!sep.is_selectable());

        let note = MenuItem::note("(empty)");
        assert!(!note.is_selectable());
        assert_eq!(note.label(), "(empty)");
    }

    #[test]
    fn disabled_action_item_is_not_selectable() {
        let item = MenuItem::action("Save", "file.save").disabled(true);
        assert!(item.is_disabled());
        assert!(!item.is_selectable());
        assert_eq!(item.action_path(), "file.save");
    }

    #[test]
    fn callback_invokes_with_name_and_action() {
        let seen: Rc<RefCell<Vec<(String, String)>>> = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let cb = ItemCallback::new(move |name, action| {
            log.borrow_mut().push((name.to_string(), action.to_string()));
        });
        cb.invoke("New", "");
        assert_eq!(
            seen.borrow().as_slice(),
            &[("New".to_string(), String::new())]
        );
    }
}
