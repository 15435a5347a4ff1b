//! Terminal keybindings appended to the VS Code `keybindings.json` array.
use serde_json::{Value, json};

use crate::error::SettingsError;

/// A keybinding identified by its `key`, `command` and `when` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keybinding {
    /// Key chord, e.g. `ctrl+a`.
    pub key: &'static str,
    /// Command id.
    pub command: &'static str,
    /// Context clause.
    pub when: &'static str,
}

/// Bindings ensured by [`apply`], in append order.
pub const TERMINAL_BINDINGS: [Keybinding; 2] = [
    Keybinding {
        key: "ctrl+a",
        command: "workbench.action.terminal.selectAll",
        when: "terminalFocus",
    },
    Keybinding {
        key: "ctrl+shift+a",
        command: "workbench.action.terminal.copySelectionAsHtml",
        when: "terminalFocus",
    },
];

impl Keybinding {
    fn matches(&self, entry: &Value) -> bool {
        let field = |name: &str| entry.get(name).and_then(Value::as_str).unwrap_or_default();
        field("key") == self.key && field("command") == self.command && field("when") == self.when
    }

    fn to_json(self) -> Value {
        json!({"key": self.key, "command": self.command, "when": self.when})
    }
}

/// Append each of [`TERMINAL_BINDINGS`] not already present. Existing
/// entries, including ones with other fields such as `args`, keep their
/// position.
///
/// Returns the number of bindings added.
///
/// # Errors
///
/// Returns [`SettingsError::Shape`] if the document root is not an array.
pub fn apply(doc: &mut Value) -> Result<usize, SettingsError> {
    let list = doc
        .as_array_mut()
        .ok_or_else(|| SettingsError::Shape("keybindings root is not an array".into()))?;
    let mut added = 0;
    for binding in TERMINAL_BINDINGS {
        if !list.iter().any(|entry| binding.matches(entry)) {
            list.push(binding.to_json());
            added += 1;
        }
    }
    Ok(added)
}
