//! What `install-things` does for each program label.
//!
//! Labels from the install manifest are free-form ("Notepad++", "7-Zip",
//! "VS Code"). They are normalised and mapped onto a function exported by
//! the provisioning PowerShell module. A handful need a download or an
//! archive step first and get their own [`Handler`].

/// Aliases from normalised label to module function. First match wins.
const FUNCTION_ALIASES: &[(&[&str], &str)] = &[
    (&["powershell7"], "Install-PowerShell-7"),
    (&["vscode"], "Install-VSCode"),
    (&["7zip"], "Install-7Zip"),
    (&["voidtoolseverything"], "Install-Voidtools-Everything"),
    (&["winscp"], "Install-WinSCP"),
    (&["mobaxterm"], "Install-MobaXterm"),
    (&["choco", "chocolatey"], "Install-Choco"),
    (&["cherrytree"], "Install-CherryTree"),
    (&["go"], "Install-Go"),
    (&["notepadpp", "notepadplusplus", "notepad"], "Install-NotepadPP"),
    (
        &["sqlitebrowser", "sqlite", "sqlitebrowserforsqlite", "dbbrowser"],
        "Install-SQLiteBrowser",
    ),
    (&["python", "miniconda"], "Install-Miniconda"),
    (&["java"], "Install-Java"),
];

/// Function that installs the Chocolatey package manager. It runs before
/// anything else.
pub const INSTALL_CHOCO: &str = "Install-Choco";

/// An installer or archive fetched before the module function runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Download {
    /// Key under the per-app log/download directory mappings.
    pub app_key: &'static str,
    /// File name inside the app's download directory.
    pub file_name: &'static str,
    /// Source URL.
    pub url: &'static str,
    /// Prefix of the per-run log file name (`<prefix>_<timestamp>.log`).
    pub log_prefix: &'static str,
}

/// Oracle SQL Developer, shipped as a zip with a bundled JDK.
pub const SQL_DEVELOPER: Download = Download {
    app_key: "sql developer",
    file_name: "sqldeveloper-24.3.1.347.1826-x64.zip",
    url: "https://download.oracle.com/otn_software/java/sqldeveloper/sqldeveloper-24.3.1.347.1826-x64.zip",
    log_prefix: "sqldeveloper",
};

/// Encrypted bundle of NirSoft utilities.
pub const NIRSOFT: Download = Download {
    app_key: "nirsoft",
    file_name: "nirsoft_package_enc_1.30.19.zip",
    url: "https://github.com/PeterCullenBurbery/configuration/raw/main/host/nirsoft_package_enc_1.30.19.zip",
    log_prefix: "nirsoft",
};

/// CherryTree setup executable.
pub const CHERRY_TREE: Download = Download {
    app_key: "cherry tree",
    file_name: "cherrytree_1.5.0.0_win64_setup.exe",
    url: "https://www.giuspen.net/software/cherrytree_1.5.0.0_win64_setup.exe",
    log_prefix: "cherrytree",
};

/// Miniconda setup executable.
pub const MINICONDA: Download = Download {
    app_key: "python",
    file_name: "Miniconda3-latest-Windows-x86_64.exe",
    url: "https://repo.anaconda.com/miniconda/Miniconda3-latest-Windows-x86_64.exe",
    log_prefix: "miniconda",
};

/// Executables added to `PATH` after Miniconda is installed.
pub const MINICONDA_PATH_ENTRIES: [&str; 2] = [
    r"C:\ProgramData\Miniconda3\python.exe",
    r"C:\ProgramData\Miniconda3\Scripts\pip3.exe",
];

/// Pipeline used for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// Already handled up front (Chocolatey).
    Skip,
    /// Download and extract the zip, then add a desktop shortcut.
    SqlDeveloper,
    /// Defender exclusion, timestamped download, password extraction.
    Nirsoft,
    /// Download the installer, then run it with a log and install path.
    CherryTree,
    /// Download the installer, run it, then extend `PATH`.
    Miniconda,
    /// Call the named module function with no arguments.
    Module(String),
}

impl Handler {
    /// Choose the handler for a manifest label.
    #[must_use]
    pub fn for_label(label: &str) -> Self {
        let function = install_function_name(label);
        match (normalize_label(label).as_str(), function.as_str()) {
            (_, INSTALL_CHOCO) => Self::Skip,
            ("sqldeveloper", _) => Self::SqlDeveloper,
            ("nirsoft", _) => Self::Nirsoft,
            (_, "Install-CherryTree") => Self::CherryTree,
            (_, "Install-Miniconda") => Self::Miniconda,
            _ => Self::Module(function),
        }
    }
}

/// Lowercase `label` and drop spaces, `-` and `+`.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '+'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Module function that installs `label`.
///
/// Known aliases map to their function; anything else becomes `Install-`
/// followed by the normalised label with its first letter capitalised.
#[must_use]
pub fn install_function_name(label: &str) -> String {
    let normalized = normalize_label(label);
    if let Some((_, function)) = FUNCTION_ALIASES
        .iter()
        .find(|(aliases, _)| aliases.contains(&normalized.as_str()))
    {
        return (*function).to_string();
    }
    let mut chars = normalized.chars();
    let capitalized: String = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();
    format!("Install-{capitalized}")
}

/// Script name for `label`: `install-<label>` lowercased, spaces as `-`.
#[must_use]
pub fn script_name(label: &str) -> String {
    format!("install-{}", label.trim().to_lowercase().replace(' ', "-"))
}
