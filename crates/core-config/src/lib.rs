//! Configuration loading and parsing.
//!
//! Reads `far.toml` (or an override path provided by the binary). Every
//! section and key is optional; missing values take the defaults below and
//! unknown keys are ignored so older binaries tolerate newer files. A file
//! that fails to parse is logged and replaced by defaults rather than
//! aborting startup.
//!
//! ```toml
//! [search]
//! default_file_mask = "**/*.*"
//! ignore_files = [".farignore"]
//! root = "."
//!
//! [modes]          # initial open state of every interactive session
//! regex = false
//! case_sensitive = false
//! word = false
//!
//! [prompt]
//! pattern = "Search (pattern): "
//! replace = "Replace with: "
//! file_mask = "File mask: "
//!
//! [results]
//! preview = true
//! ```

use anyhow::Result;
use core_state::{DEFAULT_FILE_MASK, ModeSet};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    #[serde(default = "SearchConfig::default_file_mask")]
    pub default_file_mask: String,
    #[serde(default = "SearchConfig::default_ignore_files")]
    pub ignore_files: Vec<String>,
    #[serde(default = "SearchConfig::default_root")]
    pub root: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_file_mask: Self::default_file_mask(),
            ignore_files: Self::default_ignore_files(),
            root: Self::default_root(),
        }
    }
}

impl SearchConfig {
    fn default_file_mask() -> String {
        DEFAULT_FILE_MASK.to_string()
    }
    fn default_ignore_files() -> Vec<String> {
        vec![".farignore".to_string()]
    }
    fn default_root() -> String {
        ".".to_string()
    }

    /// Ignore file paths; relative entries resolve against `root`.
    pub fn ignore_file_paths(&self) -> Vec<PathBuf> {
        let root = PathBuf::from(&self.root);
        self.ignore_files
            .iter()
            .map(|f| {
                let p = PathBuf::from(f);
                if p.is_absolute() || f.starts_with('~') {
                    p
                } else {
                    root.join(p)
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModesConfig {
    #[serde(default)]
    pub regex: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub word: bool,
}

impl ModesConfig {
    /// Initial open set for a session. Substitute is never configured here;
    /// the entry command decides it.
    pub fn open_set(&self) -> ModeSet {
        let mut set = ModeSet::empty();
        set.set(ModeSet::REGEX, self.regex);
        set.set(ModeSet::CASE_SENSITIVE, self.case_sensitive);
        set.set(ModeSet::WORD, self.word);
        set
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    #[serde(default = "PromptConfig::default_pattern")]
    pub pattern: String,
    #[serde(default = "PromptConfig::default_replace")]
    pub replace: String,
    #[serde(default = "PromptConfig::default_file_mask")]
    pub file_mask: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            pattern: Self::default_pattern(),
            replace: Self::default_replace(),
            file_mask: Self::default_file_mask(),
        }
    }
}

impl PromptConfig {
    fn default_pattern() -> String {
        "Search (pattern): ".to_string()
    }
    fn default_replace() -> String {
        "Replace with: ".to_string()
    }
    fn default_file_mask() -> String {
        "File mask: ".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ResultsConfig {
    #[serde(default = "ResultsConfig::default_preview")]
    pub preview: bool,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            preview: Self::default_preview(),
        }
    }
}

impl ResultsConfig {
    const fn default_preview() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub modes: ModesConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub results: ResultsConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,     // original file string (optional)
    pub path: Option<PathBuf>,   // where `raw` came from
    pub file: ConfigFile,        // parsed (or default) data
}

/// Best-effort config path: `far.toml` in the working directory, then the
/// platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    discover_in(Path::new(""), dirs::config_dir().as_deref())
}

/// Discovery against explicit roots. A local file wins even when the config
/// dir holds one too; with neither present the local path is returned so the
/// loader falls back to defaults.
pub fn discover_in(work_dir: &Path, config_dir: Option<&Path>) -> PathBuf {
    let local = work_dir.join("far.toml");
    if local.exists() {
        return local;
    }
    match config_dir {
        Some(dir) => dir.join("far").join("far.toml"),
        None => local,
    }
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn initial_modes(&self) -> ModeSet {
        self.file.modes.open_set()
    }

    pub fn default_file_mask(&self) -> &str {
        &self.file.search.default_file_mask
    }
}
