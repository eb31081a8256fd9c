use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::bar::{MenuBar, MenuHeader};
use crate::error::MenuError;
use crate::item::{MenuItem, SUBMENU_PREFIX};
use crate::menu::Menu;
use crate::screen::MenuScreen;

/// Declarative description of a screen's menus, loadable from JSON. Hosts
/// that build menus in code can skip this module entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSetDef {
    /// Menu bar headers, in display order. Empty means no bar.
    #[serde(default)]
    pub bar: Vec<HeaderDef>,
    pub menus: Vec<MenuDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderDef {
    pub label: String,
    /// Id of the menu this header opens.
    pub menu: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuDef {
    pub id: String,
    pub items: Vec<ItemDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    #[serde(default)]
    pub label: String,
    /// Action string; the `menu.` prefix marks a cascade link. Empty with a
    /// label present gives a labelled inert row.
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub separator: bool,
}

impl ItemDef {
    fn to_item(&self) -> MenuItem {
        if self.separator {
            return MenuItem::separator();
        }
        if self.action.is_empty() {
            return MenuItem::note(self.label.clone());
        }
        MenuItem::action(self.label.clone(), self.action.clone()).disabled(self.disabled)
    }
}

impl MenuSetDef {
    pub fn from_json(text: &str) -> Result<Self, MenuError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, MenuError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the definition and produce the bar and menus it describes.
    /// Duplicate menu ids and references to undeclared menus are rejected
    /// here rather than surfacing later as runtime lookups.
    pub fn build(&self) -> Result<(Option<MenuBar>, Vec<Menu>), MenuError> {
        let mut ids: HashSet<&str> = HashSet::new();
        for menu in &self.menus {
            if menu.id.is_empty() {
                return Err(MenuError::BadDefinition("menu with empty id".to_string()));
            }
            if !ids.insert(menu.id.as_str()) {
                return Err(MenuError::BadDefinition(format!(
                    "duplicate menu id '{}'",
                    menu.id
                )));
            }
        }
        for header in &self.bar {
            if !ids.contains(header.menu.as_str()) {
                return Err(MenuError::BadDefinition(format!(
                    "header '{}' references undeclared menu '{}'",
                    header.label, header.menu
                )));
            }
        }
        for menu in &self.menus {
            for item in &menu.items {
                if let Some(target) = item.action.strip_prefix(SUBMENU_PREFIX) {
                    if !target.is_empty() && !ids.contains(target) {
                        return Err(MenuError::BadDefinition(format!(
                            "item '{}' in menu '{}' links to undeclared menu '{}'",
                            item.label, menu.id, target
                        )));
                    }
                }
            }
        }

        let menus = self
            .menus
            .iter()
            .map(|m| Menu::new(m.id.clone(), m.items.iter().map(ItemDef::to_item).collect()))
            .collect();
        let bar = if self.bar.is_empty() {
            None
        } else {
            Some(MenuBar::new(
                self.bar
                    .iter()
                    .map(|h| MenuHeader::new(h.label.clone(), h.menu.clone()))
                    .collect(),
            ))
        };
        Ok((bar, menus))
    }

    /// Build and mount everything on a screen in one step.
    pub fn install(&self, screen: &mut MenuScreen) -> Result<(), MenuError> {
        let (bar, menus) = self.build()?;
        for menu in menus {
            screen.register(menu)?;
        }
        if let Some(bar) = bar {
            screen.set_bar(bar);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "bar": [
            { "label": "File", "menu": "file_menu" },
            { "label": "Help", "menu": "help_menu" }
        ],
        "menus": [
            {
                "id": "file_menu",
                "items": [
                    { "label": "New", "action": "file.new" },
                    { "label": "Recent", "action": "menu.recent_menu" },
                    { "separator": true },
                    { "label": "Export", "action": "file.export", "disabled": true },
                    { "label": "Quit", "action": "app.quit" }
                ]
            },
            {
                "id": "recent_menu",
                "items": [ { "label": "(none yet)" } ]
            },
            {
                "id": "help_menu",
                "items": [ { "label": "About", "action": "app.about" } ]
            }
        ]
    }"#;

    #[test]
    fn sample_definition_builds_and_installs() {
        let def = MenuSetDef::from_json(SAMPLE).unwrap();
        let mut screen = MenuScreen::new();
        def.install(&mut screen).unwrap();

        assert_eq!(screen.bar().unwrap().len(), 2);
        let file_menu = screen.menu("file_menu").unwrap();
        assert_eq!(file_menu.items().len(), 5);
        assert!(file_menu.item(1).unwrap().is_submenu_opener());
        assert_eq!(file_menu.item(1).unwrap().submenu_id(), Some("recent_menu"));
        assert!(!file_menu.item(2).unwrap().is_selectable());
        assert!(file_menu.item(3).unwrap().is_disabled());
        // Labelled row with no action is inert, not an empty action item.
        let recent = screen.menu("recent_menu").unwrap();
        assert!(!recent.item(0).unwrap().is_selectable());
        assert_eq!(recent.item(0).unwrap().label(), "(none yet)");
    }

    #[test]
    fn duplicate_menu_ids_are_rejected() {
        let def = MenuSetDef {
            bar: vec![],
            menus: vec![
                MenuDef {
                    id: "m".to_string(),
                    items: vec![],
                },
                MenuDef {
                    id: "m".to_string(),
                    items: vec![],
                },
            ],
        };
        assert!(matches!(def.build(), Err(MenuError::BadDefinition(_))));
    }

    #[test]
    fn dangling_references_are_rejected() {
        let json = r#"{
            "bar": [ { "label": "File", "menu": "missing" } ],
            "menus": [ { "id": "file_menu", "items": [] } ]
        }"#;
        let def = MenuSetDef::from_json(json).unwrap();
        assert!(matches!(def.build(), Err(MenuError::BadDefinition(_))));

        let json = r#"{
            "menus": [
                { "id": "a", "items": [ { "label": "B", "action": "menu.b" } ] }
            ]
        }"#;
        let def = MenuSetDef::from_json(json).unwrap();
        assert!(matches!(def.build(), Err(MenuError::BadDefinition(_))));
    }

    #[test]
    fn malformed_json_surfaces_as_json_error() {
        assert!(matches!(
            MenuSetDef::from_json("{ not json"),
            Err(MenuError::Json(_))
        ));
    }

    #[test]
    fn definitions_round_trip_through_json() {
        let def = MenuSetDef::from_json(SAMPLE).unwrap();
        let again = MenuSetDef::from_json(&def.to_json().unwrap()).unwrap();
        assert_eq!(again.menus.len(), def.menus.len());
        assert_eq!(again.bar[1].menu, "help_menu");
    }
}
