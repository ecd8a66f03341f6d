//! Module and composition-root classes with inherited declarations.
//!
//! A class here is a runtime description of something the injector can build:
//! a [`ModuleClass`] is an ordinary injectable with a dependency list, and a
//! [`RootClass`] is a composition root declaring the providers of its scope.
//! Both may extend a parent class; a child's declarations are merged over its
//! ancestors' by token.

use crate::deps::{Dependency, Deps};
use crate::error::Result;
use crate::provider::{Instance, ProviderDef};
use crate::token::Token;

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub(crate) type Constructor = Arc<dyn Fn(&Deps) -> Result<Instance> + Send + Sync>;

/// Called by a root once per exported module, with the root instance, the
/// module's exported name and the module instance.
pub type ModuleHook = Arc<dyn Fn(&Instance, &str, &Instance) + Send + Sync>;

fn wrap_constructor<T, F>(f: F) -> Constructor
where
  T: Any + Send + Sync,
  F: Fn(&Deps) -> Result<T> + Send + Sync + 'static,
{
  Arc::new(move |deps: &Deps| f(deps).map(|v| Arc::new(v) as Instance))
}

// Without a constructor anywhere in the hierarchy, the instance is the bag itself.
fn bag_constructor() -> Constructor {
  Arc::new(|deps: &Deps| Ok(Arc::new(deps.clone()) as Instance))
}

pub struct ModuleClass {
  name: String,
  parent: Option<Arc<ModuleClass>>,
  dependencies: Vec<Dependency>,
  construct: Option<Constructor>,
}

impl ModuleClass {
  pub fn builder(name: impl Into<String>) -> ModuleClassBuilder {
    ModuleClassBuilder {
      name: name.into(),
      parent: None,
      dependencies: Vec::new(),
      construct: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parent(&self) -> Option<&Arc<ModuleClass>> {
    self.parent.as_ref()
  }

  /// The dependency list with ancestors applied: ancestor entries come first
  /// and an entry redeclared by a descendant replaces the ancestor's in place.
  pub fn inherited_dependencies(&self) -> Vec<Dependency> {
    let mut merged: IndexMap<Token, Dependency> = self
      .parent
      .as_ref()
      .map(|parent| {
        parent
          .inherited_dependencies()
          .into_iter()
          .map(|dep| (dep.token.clone(), dep))
          .collect()
      })
      .unwrap_or_default();
    for dep in &self.dependencies {
      merged.insert(dep.token.clone(), dep.clone());
    }
    merged.into_values().collect()
  }

  pub(crate) fn construct(&self, deps: &Deps) -> Result<Instance> {
    let mut class = self;
    loop {
      if let Some(construct) = &class.construct {
        return construct(deps);
      }
      match &class.parent {
        Some(parent) => class = parent.as_ref(),
        None => return bag_constructor()(deps),
      }
    }
  }
}

impl fmt::Debug for ModuleClass {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ModuleClass")
      .field("name", &self.name)
      .field("parent", &self.parent.as_ref().map(|p| p.name()))
      .field("dependencies", &self.dependencies)
      .finish_non_exhaustive()
  }
}

pub struct ModuleClassBuilder {
  name: String,
  parent: Option<Arc<ModuleClass>>,
  dependencies: Vec<Dependency>,
  construct: Option<Constructor>,
}

impl ModuleClassBuilder {
  pub fn extends(mut self, parent: &Arc<ModuleClass>) -> Self {
    self.parent = Some(Arc::clone(parent));
    self
  }

  pub fn depends_on(mut self, dep: impl Into<Dependency>) -> Self {
    self.dependencies.push(dep.into());
    self
  }

  /// Sets the constructor. Without one, the nearest ancestor's is used.
  pub fn constructor<T, F>(mut self, f: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Deps) -> Result<T> + Send + Sync + 'static,
  {
    self.construct = Some(wrap_constructor(f));
    self
  }

  pub fn build(self) -> Arc<ModuleClass> {
    Arc::new(ModuleClass {
      name: self.name,
      parent: self.parent,
      dependencies: self.dependencies,
      construct: self.construct,
    })
  }
}

/// A composition root: declares the providers of one injector scope and
/// builds the root instance from the exported modules.
///
/// Declaring a `RootClass` as a provider of another root turns it into a
/// module factory, bootstrapped in a child injector.
pub struct RootClass {
  name: String,
  parent: Option<Arc<RootClass>>,
  providers: RwLock<Vec<ProviderDef>>,
  construct: Option<Constructor>,
  on_module: Option<ModuleHook>,
}

impl RootClass {
  pub fn builder(name: impl Into<String>) -> RootClassBuilder {
    RootClassBuilder {
      name: name.into(),
      parent: None,
      providers: Vec::new(),
      construct: None,
      on_module: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parent(&self) -> Option<&Arc<RootClass>> {
    self.parent.as_ref()
  }

  /// Adds a provider declaration after the class is built. This is the only
  /// way for a root to declare itself, directly or through other roots, as a
  /// module factory.
  pub fn declare(&self, def: ProviderDef) {
    self.providers.write().push(def);
  }

  /// The declared providers with ancestors applied. A token redeclared by a
  /// descendant keeps its ancestor's position but takes the descendant's
  /// definition.
  pub fn inherited_providers(&self) -> Vec<ProviderDef> {
    let mut merged: IndexMap<Token, ProviderDef> = self
      .parent
      .as_ref()
      .map(|parent| {
        parent
          .inherited_providers()
          .into_iter()
          .map(|def| (def.token().clone(), def))
          .collect()
      })
      .unwrap_or_default();
    for def in self.providers.read().iter() {
      merged.insert(def.token().clone(), def.clone());
    }
    merged.into_values().collect()
  }

  pub(crate) fn construct(&self, modules: &Deps) -> Result<Instance> {
    let mut class = self;
    loop {
      if let Some(construct) = &class.construct {
        return construct(modules);
      }
      match &class.parent {
        Some(parent) => class = parent.as_ref(),
        None => return bag_constructor()(modules),
      }
    }
  }

  pub(crate) fn module_hook(&self) -> Option<&ModuleHook> {
    let mut class = self;
    loop {
      if let Some(hook) = &class.on_module {
        return Some(hook);
      }
      class = class.parent.as_deref()?;
    }
  }
}

impl fmt::Debug for RootClass {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RootClass")
      .field("name", &self.name)
      .field("parent", &self.parent.as_ref().map(|p| p.name()))
      .field("providers", &*self.providers.read())
      .finish_non_exhaustive()
  }
}

pub struct RootClassBuilder {
  name: String,
  parent: Option<Arc<RootClass>>,
  providers: Vec<ProviderDef>,
  construct: Option<Constructor>,
  on_module: Option<ModuleHook>,
}

impl RootClassBuilder {
  pub fn extends(mut self, parent: &Arc<RootClass>) -> Self {
    self.parent = Some(Arc::clone(parent));
    self
  }

  pub fn provide(mut self, def: ProviderDef) -> Self {
    self.providers.push(def);
    self
  }

  pub fn constructor<T, F>(mut self, f: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Deps) -> Result<T> + Send + Sync + 'static,
  {
    self.construct = Some(wrap_constructor(f));
    self
  }

  pub fn on_module<F>(mut self, hook: F) -> Self
  where
    F: Fn(&Instance, &str, &Instance) + Send + Sync + 'static,
  {
    self.on_module = Some(Arc::new(hook));
    self
  }

  pub fn build(self) -> Arc<RootClass> {
    Arc::new(RootClass {
      name: self.name,
      parent: self.parent,
      providers: RwLock::new(self.providers),
      construct: self.construct,
      on_module: self.on_module,
    })
  }
}
