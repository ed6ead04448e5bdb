//! File mask rules.
//!
//! A file mask is a whitespace separated list of path rules. This crate only
//! rewrites rules; walking the filesystem is the search engine's business.
//!
//! Rule syntax:
//! * `/xx` - anchored directly under the search root.
//! * `xx` - anywhere below the root (file or directory named `xx`).
//! * `xx/` - every file below directory `xx`.
//! * `**` any depth, `*` / `?` within one path segment.
//! * `(a|b|c)` - alternatives of word characters, expanded into one rule
//!   each. Not nestable.
//! * Ignore files only: `!xx` is an exception that is never ignored.
//!
//! Ignore files hold one rule per line; blank lines, `//` lines and `#`
//! lines are skipped.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, trace};

static ALTERNATIVES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<pre>.*)(?P<or>\((?:\w+\|)*\w+\))(?P<post>.*)$")
        .expect("alternatives pattern is valid")
});

/// Rules that already match everything; passing them to ripgrep would
/// disable its built-in ignore handling.
const MATCH_ALL: [&str; 2] = ["*", "**/*"];

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("cannot read ignore file {path}: {source}")]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Expand every `(a|b)` group into separate rules, repeating until no group
/// is left. The rightmost group of a rule is expanded first, so the output
/// varies the leftmost group fastest.
pub fn expand_alternatives(rules: &[String]) -> Vec<String> {
    let mut current = rules.to_vec();
    loop {
        let mut expanded = false;
        let mut next = Vec::with_capacity(current.len());
        for rule in &current {
            match ALTERNATIVES.captures(rule) {
                Some(caps) => {
                    let group = &caps["or"];
                    for alt in group[1..group.len() - 1].split('|') {
                        next.push(format!("{}{}{}", &caps["pre"], alt, &caps["post"]));
                    }
                    expanded = true;
                }
                None => next.push(rule.clone()),
            }
        }
        if !expanded {
            return next;
        }
        current = next;
    }
}

/// Rewrite user rules into root-relative glob rules.
///
/// `src/` becomes `**/src/**/*`, `/Cargo.toml` becomes `Cargo.toml`, and an
/// unanchored `*.rs` yields both `**/*.rs/**/*` and `**/*.rs` so files and
/// directories of that name match.
pub fn normalize_rules(rules: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for mut rule in expand_alternatives(rules) {
        if rule.is_empty() {
            continue;
        }
        if rule.ends_with('/') {
            rule.push_str("**/*");
        } else if rule.ends_with("/**") {
            rule.push_str("/*");
        }
        match rule.strip_prefix('/') {
            Some(anchored) => rule = anchored.to_string(),
            None => {
                rule = format!("**/{rule}");
                out.push(format!("{rule}/**/*"));
            }
        }
        if !rule.is_empty() {
            out.push(rule);
        }
    }
    trace!(target: "mask", count = out.len(), "rules_normalized");
    out
}

/// Split ignore rules into `(ignore, exceptions)`; `!rule` is an exception.
pub fn split_exceptions(rules: &[String]) -> (Vec<String>, Vec<String>) {
    let mut ignore = Vec::new();
    let mut exceptions = Vec::new();
    for rule in rules.iter().filter(|r| !r.is_empty()) {
        match rule.strip_prefix('!') {
            Some(exception) => exceptions.push(exception.to_string()),
            None => ignore.push(rule.clone()),
        }
    }
    (ignore, exceptions)
}

/// `~/...` paths resolve against the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

pub fn load_ignore_rules(path: &Path) -> Result<Vec<String>, MaskError> {
    let path = expand_home(path);
    let content = std::fs::read_to_string(&path).map_err(|source| MaskError::IgnoreFile {
        path: path.clone(),
        source,
    })?;
    let rules: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//") && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    debug!(target: "mask", path = %path.display(), rules = rules.len(), "ignore_file_loaded");
    Ok(rules)
}

/// `-g <rule>` pairs for ripgrep, skipping match-all rules.
pub fn rg_glob_args(rules: &[String]) -> Vec<String> {
    rules
        .iter()
        .filter(|r| !MATCH_ALL.contains(&r.as_str()))
        .flat_map(|r| ["-g".to_string(), r.clone()])
        .collect()
}

/// `-g !<glob>` pairs built from every existing ignore file. Lines holding
/// `#` are skipped; the result is deduplicated and sorted.
pub fn rg_ignore_glob_args(files: &[PathBuf]) -> Result<Vec<String>, MaskError> {
    let mut globs = BTreeSet::new();
    for file in files {
        let file = expand_home(file);
        if !file.exists() {
            continue;
        }
        let content = std::fs::read_to_string(&file).map_err(|source| MaskError::IgnoreFile {
            path: file.clone(),
            source,
        })?;
        globs.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.contains('#'))
                .map(str::to_string),
        );
    }
    Ok(globs
        .into_iter()
        .flat_map(|g| ["-g".to_string(), format!("!{g}")])
        .collect())
}

/// Rules of one user-supplied file mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskRules {
    rules: Vec<String>,
}

impl MaskRules {
    pub fn from_mask(mask: &str) -> Self {
        Self {
            rules: mask.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn raw(&self) -> &[String] {
        &self.rules
    }

    pub fn normalized(&self) -> Vec<String> {
        normalize_rules(&self.rules)
    }

    pub fn rg_args(&self) -> Vec<String> {
        rg_glob_args(&expand_alternatives(&self.rules))
    }
}

/// Ignore and exception rules gathered from a set of ignore files. Missing
/// files are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    pub ignore: Vec<String>,
    pub exceptions: Vec<String>,
}

impl IgnoreRules {
    pub fn load(files: &[PathBuf]) -> Result<Self, MaskError> {
        let mut all = Vec::new();
        for file in files {
            if !expand_home(file).exists() {
                trace!(target: "mask", path = %file.display(), "ignore_file_missing");
                continue;
            }
            all.extend(load_ignore_rules(file)?);
        }
        let (ignore, exceptions) = split_exceptions(&all);
        Ok(Self { ignore, exceptions })
    }

    pub fn normalized(&self) -> (Vec<String>, Vec<String>) {
        (
            normalize_rules(&self.ignore),
            normalize_rules(&self.exceptions),
        )
    }
}
