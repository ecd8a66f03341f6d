//! Provider tokens.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// An opaque identifier naming a provider within one provider graph.
///
/// Tokens are cheap to clone and compare by their string content.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(Arc<str>);

impl Token {
  pub fn new(name: impl AsRef<str>) -> Self {
    Self(Arc::from(name.as_ref()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Debug for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Token({})", self.0)
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Borrow<str> for Token {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<&str> for Token {
  fn from(name: &str) -> Self {
    Self::new(name)
  }
}

impl From<String> for Token {
  fn from(name: String) -> Self {
    Self(Arc::from(name))
  }
}

impl From<&Token> for Token {
  fn from(token: &Token) -> Self {
    token.clone()
  }
}
