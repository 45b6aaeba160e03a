//! Hover menu positioned against an explicit anchor rectangle.

use serde::{Deserialize, Serialize};

pub const MENU_OFFSET_TOP: f64 = 30.0;
pub const MENU_OFFSET_LEFT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuPosition {
    pub top: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem<A> {
    pub label: String,
    pub action: Option<A>,
}

impl<A> MenuItem<A> {
    pub fn new(label: impl Into<String>, action: Option<A>) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu<A> {
    items: Vec<MenuItem<A>>,
    anchor: Option<Rect>,
    open: bool,
}

impl<A> Default for ContextMenu<A> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            anchor: None,
            open: false,
        }
    }
}

impl<A: Clone> ContextMenu<A> {
    #[must_use]
    pub fn new(items: Vec<MenuItem<A>>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem<A>] {
        &self.items
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens against `anchor`, replacing any previous anchor.
    pub fn open(&mut self, anchor: Rect) {
        self.anchor = Some(anchor);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Where the menu is drawn, or `None` while closed.
    #[must_use]
    pub fn position(&self) -> Option<MenuPosition> {
        if !self.open {
            return None;
        }
        self.anchor.map(|anchor| MenuPosition {
            top: anchor.top + MENU_OFFSET_TOP,
            left: anchor.left + MENU_OFFSET_LEFT,
        })
    }

    /// Activates the item at `index`. Items without an action are inert and
    /// leave the menu as it was.
    pub fn activate(&mut self, index: usize) -> Option<A> {
        if !self.open {
            return None;
        }
        let action = self.items.get(index)?.action.clone()?;
        self.close();
        Some(action)
    }
}
