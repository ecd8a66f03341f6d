use crate::deps::Deps;
use crate::injector::Injector;
use crate::provider::Instance;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A bootstrapped composition root.
pub struct Root {
  instance: Instance,
  injector: Arc<Injector>,
  modules: Deps,
}

impl Root {
  pub(crate) fn new(instance: Instance, injector: Arc<Injector>, modules: Deps) -> Self {
    Self {
      instance,
      injector,
      modules,
    }
  }

  /// The instance built by the root class constructor.
  pub fn instance(&self) -> &Instance {
    &self.instance
  }

  pub fn instance_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    Arc::clone(&self.instance).downcast::<T>().ok()
  }

  /// The injector that owns this root's providers.
  pub fn injector(&self) -> &Arc<Injector> {
    &self.injector
  }

  /// The exported modules the root instance was constructed with.
  pub fn modules(&self) -> &Deps {
    &self.modules
  }
}

impl fmt::Debug for Root {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Root")
      .field("injector", &self.injector)
      .field("modules", &self.modules)
      .finish_non_exhaustive()
  }
}
