//! `rf_ace.config` loading.
//!
//! The file is a flat INI document: `[section]` headers followed by
//! `key = value` (or `key: value`) entries. Option names are matched
//! case-insensitively, section names exactly.

use crate::error::GenError;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "./rf_ace.config";
pub const DEFAULT_GOLEM_HOST: &str = "glados.systemsbiology.net:8083";
pub const DEFAULT_GOLEM_SCRIPT: &str = "golem.py";
pub const DEFAULT_CONTACT: &str = "Sheila/Jake";

const SECTION_RF_ACE: &str = "RF_ACE_Parameters";
const SECTION_PYTHON: &str = "PYTHON";
const SECTION_GOLEM: &str = "GOLEM";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Result<Self> {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;
        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || raw.starts_with('#') || raw.starts_with(';') {
                continue;
            }
            // An indented line extends the value of the entry above it.
            if raw.starts_with(|c: char| c.is_whitespace()) {
                if let (Some(section), Some(key)) = (&current, &last_key) {
                    if let Some(value) = sections
                        .get_mut(section)
                        .and_then(|entries| entries.get_mut(key))
                    {
                        value.push('\n');
                        value.push_str(line);
                        continue;
                    }
                }
            }
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| anyhow!("line {}: unterminated section header", line_no))?
                    .trim();
                if name.is_empty() {
                    return Err(anyhow!("line {}: empty section name", line_no));
                }
                sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                last_key = None;
                continue;
            }
            let section = current
                .as_ref()
                .ok_or_else(|| anyhow!("line {}: entry before any section header", line_no))?;
            let split_at = line
                .find(|c: char| c == '=' || c == ':')
                .ok_or_else(|| anyhow!("line {}: expected key = value", line_no))?;
            let key = line[..split_at].trim();
            if key.is_empty() {
                return Err(anyhow!("line {}: key cannot be empty", line_no));
            }
            let value = strip_inline_comment(&line[split_at + 1..]).trim();
            let key = key.to_lowercase();
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.clone(), value.to_string());
            last_key = Some(key);
        }
        Ok(Self { sections })
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(&key.to_lowercase()))
            .map(String::as_str)
    }

    pub fn require(&self, section: &str, key: &str) -> Result<&str> {
        if !self.sections.contains_key(section) {
            return Err(anyhow!("config: no section '{}'", section));
        }
        self.get(section, key)
            .ok_or_else(|| anyhow!("config: no option '{}' in section '{}'", key, section))
    }

    pub fn require_int(&self, section: &str, key: &str) -> Result<i64> {
        let raw = self.require(section, key)?;
        raw.parse::<i64>().map_err(|_| {
            anyhow!(
                "config: option '{}' in section '{}' is not an integer: {}",
                key,
                section,
                raw
            )
        })
    }
}

/// Cuts a `;` comment off a value, but only when whitespace precedes it.
fn strip_inline_comment(value: &str) -> &str {
    let mut prev_space = false;
    for (i, c) in value.char_indices() {
        if c == ';' && prev_space {
            return &value[..i];
        }
        prev_space = c.is_whitespace();
    }
    value
}

/// Tool paths and tuning parameters for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RfAceConfig {
    pub execpath: String,
    pub mtry: i64,
    pub numtrees: i64,
    pub permutations: i64,
    pub pvalue_t: String,
    pub nodesize: String,
    pub python_bin: String,
    #[serde(skip_serializing)]
    pub golem_password: String,
    pub golem_host: String,
    pub golem_script: String,
    pub contact: String,
}

impl RfAceConfig {
    pub fn from_document(doc: &IniDocument) -> Result<Self> {
        Ok(Self {
            execpath: doc.require(SECTION_RF_ACE, "execpath")?.to_string(),
            mtry: doc.require_int(SECTION_RF_ACE, "mtry")?,
            numtrees: doc.require_int(SECTION_RF_ACE, "numtrees")?,
            permutations: doc.require_int(SECTION_RF_ACE, "permutations")?,
            pvalue_t: doc.require(SECTION_RF_ACE, "pvalue_t")?.to_string(),
            nodesize: doc.require(SECTION_RF_ACE, "nodesize")?.to_string(),
            python_bin: doc.require(SECTION_PYTHON, "pythonbin")?.to_string(),
            golem_password: doc.require(SECTION_GOLEM, "golempwd")?.to_string(),
            golem_host: doc
                .get(SECTION_GOLEM, "host")
                .unwrap_or(DEFAULT_GOLEM_HOST)
                .to_string(),
            golem_script: doc
                .get(SECTION_GOLEM, "script")
                .unwrap_or(DEFAULT_GOLEM_SCRIPT)
                .to_string(),
            contact: doc
                .get(SECTION_GOLEM, "contact")
                .unwrap_or(DEFAULT_CONTACT)
                .to_string(),
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::from_document(&IniDocument::parse(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        if !path.exists() {
            return Err(GenError::ConfigMissing(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let config = Self::parse(&text)
            .map_err(|e| anyhow!("{}: {}", path.display(), e))?;
        debug!(path = %path.display(), execpath = %config.execpath, "loaded rf_ace config");
        Ok(config)
    }
}

#[cfg(test)]
pub(crate) fn sample_config_text() -> &'static str {
    "\
# rf_ace tunings
[RF_ACE_Parameters]
execpath = /proj/ilyalab/TCGA/rf-ace/bin/rf_ace
mtry = 1000
numtrees = 100
permutations = 20
pvalue_t = 0.05
nodesize: 5

[PYTHON]
pythonbin = /usr/bin/python2.6

[GOLEM]
golempwd = s3cret
"
}
