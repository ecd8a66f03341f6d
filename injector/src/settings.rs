//! Engine settings, loadable from YAML.

use crate::error::{Error, Result};

use convert_case::{Case, Casing};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const DEFAULT_MAX_DEPTH: usize = 100;

/// How tokens are turned into bag keys and exported module names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
  #[default]
  Snake,
  Camel,
  Pascal,
  Kebab,
  /// Use the token text unchanged.
  Preserve,
}

impl NameCase {
  pub fn apply(self, name: &str) -> String {
    let case = match self {
      NameCase::Snake => Case::Snake,
      NameCase::Camel => Case::Camel,
      NameCase::Pascal => Case::Pascal,
      NameCase::Kebab => Case::Kebab,
      NameCase::Preserve => return name.to_owned(),
    };
    name.to_case(case)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
  #[serde(default)]
  pub name_case: NameCase,
  /// Longest pending chain a single resolution may build before it is
  /// rejected with `DepthExceeded`.
  #[serde(default = "default_max_depth")]
  pub max_depth: usize,
}

fn default_max_depth() -> usize {
  DEFAULT_MAX_DEPTH
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      name_case: NameCase::default(),
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

impl Settings {
  pub fn from_yaml_str(source: &str) -> Result<Self> {
    serde_yaml::from_str(source).map_err(|e| Error::ConfigParse(e.to_string()))
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    serde_yaml::from_reader(reader).map_err(|e| Error::ConfigParse(e.to_string()))
  }

  /// Normalizes a token into the name used for bag keys and exports.
  pub fn normalize(&self, token: &str) -> String {
    self.name_case.apply(token)
  }
}
