use crate::token::Token;
use thiserror::Error;

/// The error type for provider resolution and bootstrap.
///
/// Every variant is fatal to the bootstrap or resolution call that raised it.
/// `CircularDependency` is kept apart from the generic resolution failures so
/// callers can tell a broken graph shape from a missing declaration.
#[derive(Debug, Error)]
pub enum Error {
  #[error("no provider could be resolved for token '{token}'")]
  UnresolvedProvider { token: Token },

  #[error("required dependency '{token}' could not be resolved")]
  UnresolvedDependency { token: Token },

  #[error("provider '{token}' aliases '{target}', which could not be resolved")]
  AliasTargetMissing { token: Token, target: Token },

  #[error("dependency '{token}' cannot be spread: its instance is not a dependency bag")]
  NotSpreadable { token: Token },

  #[error("malformed provider '{token}': {reason}")]
  MalformedProvider { token: Token, reason: String },

  #[error("missing argument '{name}' in dependency bag")]
  MissingArgument { name: String },

  #[error("argument '{name}' is not of type {expected}")]
  ArgumentType { name: String, expected: &'static str },

  #[error("circular dependency detected on '{token}' (pending: {})", format_chain(.chain))]
  CircularDependency { chain: Vec<Token>, token: Token },

  #[error("resolution of '{token}' exceeds the maximum depth of {depth}")]
  DepthExceeded { token: Token, depth: usize },

  #[error("failed to read settings file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("failed to parse settings: {0}")]
  ConfigParse(String),
}

impl Error {
  /// True for cycle failures, false for every other resolution failure.
  pub fn is_circular(&self) -> bool {
    matches!(self, Error::CircularDependency { .. })
  }

  /// The token the failure is about, when there is one.
  pub fn token(&self) -> Option<&Token> {
    match self {
      Error::UnresolvedProvider { token }
      | Error::UnresolvedDependency { token }
      | Error::AliasTargetMissing { token, .. }
      | Error::NotSpreadable { token }
      | Error::MalformedProvider { token, .. }
      | Error::CircularDependency { token, .. }
      | Error::DepthExceeded { token, .. } => Some(token),
      _ => None,
    }
  }
}

fn format_chain(chain: &[Token]) -> String {
  chain
    .iter()
    .map(Token::as_str)
    .collect::<Vec<_>>()
    .join(" -> ")
}

/// A specialized `Result` type for `fibre_injector` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
