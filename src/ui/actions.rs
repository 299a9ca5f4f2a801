// Action system for grid input
// Raw key events are normalized into typed actions before they reach the
// selection state machine, so the machine never inspects modifiers itself.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key press with its modifiers, used as a keymap key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    pub fn with_ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn with_shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// All navigation actions the selection state machine handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Home: first column, same row
    FirstColumn,
    /// End: last column, same row
    LastColumn,
    /// Ctrl+Home: first cell of the grid
    FirstCell,
    /// Ctrl+End: last cell of the grid
    LastCell,
    PageUp,
    PageDown,
    /// Tab: next cell, wrapping to the next row; exits the grid at the end
    TabForward,
    /// Shift+Tab: previous cell; exits the grid from the first cell
    TabBackward,
}

/// Maps key events to navigation actions
pub struct NavigationKeymap {
    map: HashMap<KeyBinding, GridAction>,
}

impl NavigationKeymap {
    pub fn new() -> Self {
        let mut keymap = Self {
            map: HashMap::new(),
        };
        keymap.setup_default_bindings();
        keymap
    }

    fn setup_default_bindings(&mut self) {
        use GridAction::*;
        self.map.insert(KeyBinding::new(KeyCode::Left), MoveLeft);
        self.map.insert(KeyBinding::new(KeyCode::Right), MoveRight);
        self.map.insert(KeyBinding::new(KeyCode::Up), MoveUp);
        self.map.insert(KeyBinding::new(KeyCode::Down), MoveDown);
        self.map.insert(KeyBinding::new(KeyCode::Home), FirstColumn);
        self.map.insert(KeyBinding::new(KeyCode::End), LastColumn);
        self.map
            .insert(KeyBinding::with_ctrl(KeyCode::Home), FirstCell);
        self.map
            .insert(KeyBinding::with_ctrl(KeyCode::End), LastCell);
        self.map.insert(KeyBinding::new(KeyCode::PageUp), PageUp);
        self.map
            .insert(KeyBinding::new(KeyCode::PageDown), PageDown);
        self.map.insert(KeyBinding::new(KeyCode::Tab), TabForward);
        // Terminals report shift+tab as BackTab, some as Tab with SHIFT
        self.map
            .insert(KeyBinding::new(KeyCode::BackTab), TabBackward);
        self.map
            .insert(KeyBinding::with_shift(KeyCode::BackTab), TabBackward);
        self.map
            .insert(KeyBinding::with_shift(KeyCode::Tab), TabBackward);
    }

    /// Resolve a key event to an action, if it is bound
    pub fn resolve(&self, event: &KeyEvent) -> Option<GridAction> {
        self.map.get(&KeyBinding::from_event(event)).copied()
    }

    /// Override or add a binding
    pub fn bind(&mut self, binding: KeyBinding, action: GridAction) {
        self.map.insert(binding, action);
    }
}

impl Default for NavigationKeymap {
    fn default() -> Self {
        Self::new()
    }
}
