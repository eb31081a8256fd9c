use thiserror::Error;

/// Errors surfaced by the menu engine. Navigation itself never fails; these
/// cover registry lookups, composition mistakes and malformed definitions.
#[derive(Error, Debug)]
pub enum MenuError {
    #[error("no menu registered with id '{0}'")]
    UnknownMenu(String),
    #[error("a menu with id '{0}' is already registered")]
    DuplicateMenu(String),
    #[error("no menu bar attached to this screen")]
    NoMenuBar,
    #[error("menu bar has no header at index {0}")]
    UnknownHeader(usize),
    #[error("item '{item}' in menu '{menu}' links to missing submenu '{target}'")]
    BadSubmenuLink {
        menu: String,
        item: String,
        target: String,
    },
    #[error("menu '{0}' is already open in the current cascade")]
    AlreadyOpen(String),
    #[error("menu definition error: {0}")]
    BadDefinition(String),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
