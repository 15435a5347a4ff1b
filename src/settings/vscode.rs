//! Preferred VS Code user settings.
use serde_json::{Map, Value, json};

use crate::error::SettingsError;

/// Scrollback used for both the live and the restored terminal buffer.
const TERMINAL_SCROLLBACK: u64 = 10_000_000;

/// The settings this program owns, with both terminal working directories
/// pointing at `desktop`.
#[must_use]
pub fn desired_settings(desktop: &str) -> Map<String, Value> {
    let owned = json!({
        "files.autoSave": "afterDelay",
        "powershell.cwd": desktop,
        "terminal.integrated.cwd": desktop,
        "terminal.integrated.enableMultiLinePasteWarning": "never",
        "terminal.integrated.persistentSessionScrollback": TERMINAL_SCROLLBACK,
        "terminal.integrated.rightClickBehavior": "default",
        "terminal.integrated.scrollback": TERMINAL_SCROLLBACK,
        "workbench.startupEditor": "none",
        "explorer.confirmDragAndDrop": false,
        "explorer.confirmDelete": false,
        "redhat.telemetry.enabled": true,
        "editor.renderWhitespace": "all",
        "[yaml]": {
            "editor.insertSpaces": true,
            "editor.tabSize": 2,
            "editor.detectIndentation": false,
        },
    });
    match owned {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Overwrite the owned keys in `doc`, leaving every other key as it was.
///
/// The `[yaml]` block is replaced as a whole.
///
/// # Errors
///
/// Returns [`SettingsError::Shape`] if the document root is not an object.
pub fn apply(doc: &mut Value, desktop: &str) -> Result<(), SettingsError> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| SettingsError::Shape("VS Code settings root is not an object".into()))?;
    root.extend(desired_settings(desktop));
    Ok(())
}
