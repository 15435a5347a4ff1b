//! Windows Terminal profile layout.
//!
//! The profile list is rebuilt to hold exactly four profiles in a fixed
//! order. Fields of an existing profile with the same GUID are kept unless
//! they are overwritten or removed below; any other profile is dropped.
use serde_json::{Map, Value, json};

use crate::error::SettingsError;

/// GUID of the PowerShell 7 profile, also made the default.
pub const POWERSHELL_7_GUID: &str = "{574e775e-4f2a-5b96-ac1e-a2962a402336}";
/// GUID of the built-in Windows PowerShell profile.
pub const WINDOWS_POWERSHELL_GUID: &str = "{61c54bbd-c2c6-5271-96e7-009a87ff44bf}";
/// GUID of the built-in Command Prompt profile.
pub const COMMAND_PROMPT_GUID: &str = "{0caa0dad-35be-5f56-a8ff-afceeeaa6101}";
/// GUID of the Azure Cloud Shell profile.
pub const AZURE_CLOUD_SHELL_GUID: &str = "{b453ae62-4e3d-5e58-b989-0a998ec441b8}";

const HISTORY_SIZE: u64 = 1_000_000_000;

/// How a profile is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Launch {
    /// Generated by a dynamic profile source; any `commandline` is removed.
    Source(&'static str),
    /// Started from a command line, defaulted if absent; any `source` is
    /// removed.
    Command(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct ProfileSpec {
    guid: &'static str,
    name: &'static str,
    launch: Launch,
}

const PROFILES: [ProfileSpec; 4] = [
    ProfileSpec {
        guid: POWERSHELL_7_GUID,
        name: "PowerShell 7",
        launch: Launch::Source("Windows.Terminal.PowershellCore"),
    },
    ProfileSpec {
        guid: WINDOWS_POWERSHELL_GUID,
        name: "PowerShell 5",
        launch: Launch::Command(r"%SystemRoot%\System32\WindowsPowerShell\v1.0\powershell.exe"),
    },
    ProfileSpec {
        guid: COMMAND_PROMPT_GUID,
        name: "Command Prompt",
        launch: Launch::Command(r"%SystemRoot%\System32\cmd.exe"),
    },
    ProfileSpec {
        guid: AZURE_CLOUD_SHELL_GUID,
        name: "Azure Cloud Shell",
        launch: Launch::Source("Windows.Terminal.Azure"),
    },
];

impl ProfileSpec {
    fn build(&self, existing: Option<&Map<String, Value>>) -> Value {
        let mut profile = existing.cloned().unwrap_or_default();
        profile.insert("guid".into(), json!(self.guid));
        profile.insert("name".into(), json!(self.name));
        profile.insert("hidden".into(), json!(false));
        match self.launch {
            Launch::Source(source) => {
                profile.insert("source".into(), json!(source));
                profile.remove("commandline");
            }
            Launch::Command(default) => {
                profile
                    .entry("commandline")
                    .or_insert_with(|| json!(default));
                profile.remove("source");
            }
        }
        Value::Object(profile)
    }
}

/// Apply the profile layout to a parsed `settings.json`.
///
/// Sets `defaultProfile` to PowerShell 7, replaces `profiles.defaults` with
/// elevation on and a very large history, and rebuilds `profiles.list`.
///
/// # Errors
///
/// Returns [`SettingsError::Shape`] if the root or `profiles` is not an
/// object, or `profiles.list` is missing or not an array. The document is
/// left untouched in that case.
pub fn apply(doc: &mut Value) -> Result<(), SettingsError> {
    let shape = |msg: &str| SettingsError::Shape(msg.to_string());

    let root = doc
        .as_object_mut()
        .ok_or_else(|| shape("Windows Terminal settings root is not an object"))?;
    let profiles = root
        .get_mut("profiles")
        .ok_or_else(|| shape("missing \"profiles\" object"))?
        .as_object_mut()
        .ok_or_else(|| shape("\"profiles\" is not an object"))?;
    let list = profiles
        .get("list")
        .ok_or_else(|| shape("missing \"profiles.list\""))?
        .as_array()
        .ok_or_else(|| shape("\"profiles.list\" is not an array"))?;

    let rebuilt: Vec<Value> = PROFILES
        .iter()
        .map(|wanted| wanted.build(find_profile(list, wanted.guid)))
        .collect();

    profiles.insert(
        "defaults".into(),
        json!({"elevate": true, "historySize": HISTORY_SIZE}),
    );
    profiles.insert("list".into(), Value::Array(rebuilt));
    root.insert("defaultProfile".into(), json!(POWERSHELL_7_GUID));
    Ok(())
}

/// The last profile object in `list` carrying `guid`.
fn find_profile<'a>(list: &'a [Value], guid: &str) -> Option<&'a Map<String, Value>> {
    list.iter()
        .rev()
        .filter_map(Value::as_object)
        .find(|p| p.get("guid").and_then(Value::as_str) == Some(guid))
}
