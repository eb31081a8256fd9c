//! Cascading menu engine for ratatui terminal applications.
//!
//! A [`MenuScreen`] owns a set of mounted [`Menu`]s, an optional [`MenuBar`],
//! and the single navigation state machine driving them. Menus open from bar
//! headers, as pop-ups via [`MenuScreen::context_menu`], or as cascade
//! children of submenu items; the open menus always form one connected
//! chain. Feed terminal events through [`MenuScreen::handle_key`] and
//! [`MenuScreen::handle_mouse`] (or the `process_*` wrappers, which also
//! dispatch selections to an [`ActionHost`]), then paint with
//! [`draw_menu_bar`] and [`draw_menus`] after the rest of the frame.
//!
//! Menu sets can be built in code from [`MenuItem`] constructors or declared
//! in JSON through [`MenuSetDef`].

mod bar;
mod defs;
mod error;
mod item;
mod menu;
mod nav;
mod popup;
mod render;
mod screen;

pub use bar::{MenuBar, MenuHeader};
pub use defs::{HeaderDef, ItemDef, MenuDef, MenuSetDef};
pub use error::MenuError;
pub use item::{ItemCallback, ItemKind, MenuItem, SUBMENU_PREFIX};
pub use menu::{Menu, Point};
pub use nav::{NavMode, NavOutcome};
pub use popup::{PopupHandle, PopupOutcome};
pub use render::{draw_menu_bar, draw_menus, MenuTheme};
pub use screen::{ActionHost, Invoke, MenuScreen, RootAnchor, Selection};
