#![allow(dead_code)]

use fibre_injector::{BootstrapOptions, Injector, Result, Root, RootClass};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Bootstraps with a private pending record so tests running in parallel
/// never see each other's in-flight tokens.
pub fn bootstrap(root: &Arc<RootClass>) -> Result<Root> {
  Injector::bootstrap_with(root, None, BootstrapOptions::isolated())
}

pub fn bootstrap_child(root: &Arc<RootClass>, parent: &Root) -> Result<Root> {
  Injector::bootstrap(root, Some(parent.injector()))
}

/// Counts constructor invocations.
#[derive(Default)]
pub struct Counter(AtomicUsize);

impl Counter {
  pub fn hit(&self) -> usize {
    self.0.fetch_add(1, Ordering::SeqCst) + 1
  }

  pub fn count(&self) -> usize {
    self.0.load(Ordering::SeqCst)
  }
}
