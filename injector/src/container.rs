//! The per-injector provider store.

use crate::provider::Provider;
use crate::token::Token;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;

/// A token -> provider store scoped to one injector.
///
/// Lookups consult the local map first and then the parent chain. A provider
/// found in an ancestor is copied into the local map on first access, so
/// later [`local_has`](Container::local_has) calls report it as local.
#[derive(Debug, Default)]
pub struct Container {
  providers: RwLock<IndexMap<Token, Arc<Provider>>>,
  parent: OnceCell<Arc<Container>>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Looks `token` up locally, then through the parent chain.
  pub fn get(&self, token: &Token) -> Option<Arc<Provider>> {
    if let Some(provider) = self.providers.read().get(token) {
      return Some(Arc::clone(provider));
    }
    let inherited = self.parent.get()?.get(token)?;
    tracing::trace!(token = %token, "memoizing inherited provider");
    self
      .providers
      .write()
      .entry(token.clone())
      .or_insert_with(|| Arc::clone(&inherited));
    Some(inherited)
  }

  /// True only when `token` is stored in this container itself.
  pub fn local_has(&self, token: &Token) -> bool {
    self.providers.read().contains_key(token)
  }

  pub fn set(&self, token: Token, provider: Arc<Provider>) {
    self.providers.write().insert(token, provider);
  }

  /// Links the parent container. Only the first link is kept; returns `false`
  /// if a parent was already set.
  pub fn set_parent(&self, parent: Arc<Container>) -> bool {
    self.parent.set(parent).is_ok()
  }

  pub fn parent(&self) -> Option<&Arc<Container>> {
    self.parent.get()
  }

  /// A snapshot of the local entries, in insertion order.
  pub fn entries(&self) -> Vec<(Token, Arc<Provider>)> {
    self
      .providers
      .read()
      .iter()
      .map(|(token, provider)| (token.clone(), Arc::clone(provider)))
      .collect()
  }

  pub fn len(&self) -> usize {
    self.providers.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.providers.read().is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::ProviderDef;
  use pretty_assertions::assert_eq;

  fn provider(token: &str, value: u32) -> Arc<Provider> {
    Arc::new(Provider::new(ProviderDef::value(token, value)))
  }

  #[test]
  fn inherited_lookup_is_memoized_locally() {
    let parent = Arc::new(Container::new());
    let child = Container::new();
    child.set_parent(Arc::clone(&parent));

    let token = Token::from("config");
    let stored = provider("config", 1);
    parent.set(token.clone(), Arc::clone(&stored));

    assert!(!child.local_has(&token));
    let found = child.get(&token).unwrap();
    assert!(Arc::ptr_eq(&found, &stored));
    assert!(child.local_has(&token));
  }

  #[test]
  fn local_entry_shadows_parent() {
    let parent = Arc::new(Container::new());
    let child = Container::new();
    child.set_parent(Arc::clone(&parent));

    let token = Token::from("a");
    parent.set(token.clone(), provider("a", 1));
    let local = provider("a", 2);
    child.set(token.clone(), Arc::clone(&local));

    assert!(Arc::ptr_eq(&child.get(&token).unwrap(), &local));
  }

  #[test]
  fn miss_everywhere_returns_none() {
    let parent = Arc::new(Container::new());
    let child = Container::new();
    child.set_parent(parent);

    assert!(child.get(&Token::from("nothing")).is_none());
    assert!(child.is_empty());
  }

  #[test]
  fn entries_keep_insertion_order_and_parent_is_set_once() {
    let container = Container::new();
    container.set(Token::from("b"), provider("b", 1));
    container.set(Token::from("a"), provider("a", 2));
    container.set(Token::from("b"), provider("b", 3));

    let tokens: Vec<_> = container
      .entries()
      .into_iter()
      .map(|(token, _)| token.to_string())
      .collect();
    assert_eq!(tokens, vec!["b", "a"]);

    assert!(container.set_parent(Arc::new(Container::new())));
    assert!(!container.set_parent(Arc::new(Container::new())));
  }
}
