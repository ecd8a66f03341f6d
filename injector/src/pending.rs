//! The pending record used to detect resolution cycles.

use crate::error::{Error, Result};
use crate::token::Token;

use indexmap::IndexSet;
use parking_lot::Mutex;
use std::sync::Arc;

thread_local! {
  // The default record for bootstraps that do not thread their own. Kept per
  // thread so concurrent bootstraps never see each other's in-flight tokens.
  static THREAD_PENDING: Arc<PendingRecord> = Arc::new(PendingRecord::new());
}

/// The set of tokens currently in flight during one resolution call chain.
///
/// Entry order is kept so a cycle can be reported as the chain that led to it.
#[derive(Debug, Default)]
pub struct PendingRecord {
  tokens: Mutex<IndexSet<Token>>,
}

impl PendingRecord {
  pub fn new() -> Self {
    Self::default()
  }

  /// The calling thread's default record, used when a bootstrap is not given one.
  pub fn global() -> Arc<PendingRecord> {
    THREAD_PENDING.with(Arc::clone)
  }

  pub fn contains(&self, token: &Token) -> bool {
    self.tokens.lock().contains(token)
  }

  /// The pending tokens, oldest first.
  pub fn chain(&self) -> Vec<Token> {
    self.tokens.lock().iter().cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.tokens.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.tokens.lock().is_empty()
  }

  pub fn clear(&self) {
    self.tokens.lock().clear();
  }

  /// Fails with `CircularDependency` if `token` is already pending.
  pub fn check(&self, token: &Token) -> Result<()> {
    let tokens = self.tokens.lock();
    if tokens.contains(token) {
      return Err(Error::CircularDependency {
        chain: tokens.iter().cloned().collect(),
        token: token.clone(),
      });
    }
    Ok(())
  }

  /// Marks `token` as pending until the returned guard is dropped.
  ///
  /// Re-entering a pending token is a cycle. A chain already `max_depth`
  /// long rejects further entries.
  pub fn enter(&self, token: &Token, max_depth: usize) -> Result<PendingGuard<'_>> {
    let mut tokens = self.tokens.lock();
    if tokens.contains(token) {
      return Err(Error::CircularDependency {
        chain: tokens.iter().cloned().collect(),
        token: token.clone(),
      });
    }
    if tokens.len() >= max_depth {
      return Err(Error::DepthExceeded {
        token: token.clone(),
        depth: max_depth,
      });
    }
    tokens.insert(token.clone());
    Ok(PendingGuard {
      record: self,
      token: token.clone(),
    })
  }
}

/// Removes its token from the pending record when dropped, including when
/// the resolution it guards fails.
#[must_use = "the token leaves the pending record as soon as the guard is dropped"]
pub struct PendingGuard<'a> {
  record: &'a PendingRecord,
  token: Token,
}

impl Drop for PendingGuard<'_> {
  fn drop(&mut self) {
    self.record.tokens.lock().shift_remove(&self.token);
  }
}
