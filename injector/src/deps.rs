//! Dependency descriptors and the named-argument bag handed to constructors.

use crate::error::{Error, Result};
use crate::injector::Injector;
use crate::provider::Instance;
use crate::token::Token;

use indexmap::IndexMap;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// The bag key under which every resolved bag carries its resolving injector.
pub const INJECTOR_KEY: &str = "injector";

/// One entry of a declared dependency list.
///
/// A bare token converts into a required, non-spread dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
  pub token: Token,
  pub optional: bool,
  pub spread: bool,
}

impl Dependency {
  pub fn new(token: impl Into<Token>) -> Self {
    Self {
      token: token.into(),
      optional: false,
      spread: false,
    }
  }

  /// Marks the dependency as optional: when nothing resolves for it, it is
  /// left out of the bag instead of failing the resolution.
  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  /// Marks the dependency as spread: the resolved instance must itself be a
  /// [`Deps`] bag, and its entries are merged into the consuming bag.
  pub fn spread(mut self) -> Self {
    self.spread = true;
    self
  }
}

impl From<&str> for Dependency {
  fn from(token: &str) -> Self {
    Self::new(token)
  }
}

impl From<String> for Dependency {
  fn from(token: String) -> Self {
    Self::new(token)
  }
}

impl From<Token> for Dependency {
  fn from(token: Token) -> Self {
    Self::new(token)
  }
}

/// An ordered name -> instance mapping.
///
/// This is the argument bag passed to module constructors and factories, and
/// the exported module bag passed to root constructors. Keys keep their
/// insertion order; re-inserting a key overwrites its value in place.
#[derive(Clone, Default)]
pub struct Deps {
  entries: IndexMap<String, Instance>,
}

impl Deps {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, name: impl Into<String>, instance: Instance) {
    self.entries.insert(name.into(), instance);
  }

  /// Inserts a plain value, wrapping it in an [`Instance`].
  pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
    self.insert(name, Arc::new(value));
    self
  }

  /// Merges every entry of `other` into this bag. On key collision the
  /// entry from `other` wins.
  pub fn spread(&mut self, other: &Deps) {
    for (name, instance) in &other.entries {
      self.entries.insert(name.clone(), Arc::clone(instance));
    }
  }

  pub fn get(&self, name: &str) -> Option<&Instance> {
    self.entries.get(name)
  }

  /// Typed lookup. Returns `None` when the entry is missing or holds another type.
  pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
    self
      .entries
      .get(name)
      .and_then(|instance| Arc::clone(instance).downcast::<T>().ok())
  }

  /// Typed lookup for constructors: a missing entry or a type mismatch is an error.
  pub fn require<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    let instance = self.entries.get(name).ok_or_else(|| Error::MissingArgument {
      name: name.to_owned(),
    })?;
    Arc::clone(instance)
      .downcast::<T>()
      .map_err(|_| Error::ArgumentType {
        name: name.to_owned(),
        expected: type_name::<T>(),
      })
  }

  /// The injector that assembled this bag.
  pub fn injector(&self) -> Option<Arc<Injector>> {
    self.get_as::<Injector>(INJECTOR_KEY)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
    self.entries.iter().map(|(name, instance)| (name.as_str(), instance))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl fmt::Debug for Deps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.entries.keys()).finish()
  }
}
