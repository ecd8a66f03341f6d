//! The injector: one resolution scope in a tree of scopes.

use crate::class::RootClass;
use crate::container::Container;
use crate::deps::{Dependency, Deps, INJECTOR_KEY};
use crate::error::{Error, Result};
use crate::pending::PendingRecord;
use crate::provider::{ClassTarget, Instance, Provider, ProviderKind};
use crate::root::Root;
use crate::settings::Settings;
use crate::token::Token;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Overrides for a single bootstrap. Anything left unset is inherited from
/// the parent injector, or falls back to the defaults at the tree root.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
  pub settings: Option<Settings>,
  /// A caller-owned pending record. Without one, the calling thread's record is used.
  pub pending: Option<Arc<PendingRecord>>,
}

impl BootstrapOptions {
  pub fn with_settings(mut self, settings: Settings) -> Self {
    self.settings = Some(settings);
    self
  }

  pub fn with_pending(mut self, pending: Arc<PendingRecord>) -> Self {
    self.pending = Some(pending);
    self
  }

  /// Options with a fresh pending record of their own.
  pub fn isolated() -> Self {
    Self::default().with_pending(Arc::new(PendingRecord::new()))
  }
}

/// A resolution scope.
///
/// An injector owns one [`Container`] of committed providers and the
/// universal providers declared by the root class it was bootstrapped for.
/// Dependencies it cannot satisfy itself are requested from its ancestors,
/// which resolve them in their own scope.
pub struct Injector {
  container: Arc<Container>,
  universal: IndexMap<Token, Arc<Provider>>,
  parent: OnceCell<Arc<Injector>>,
  root_class: Arc<RootClass>,
  settings: Arc<Settings>,
  pending: Arc<PendingRecord>,
}

impl Injector {
  /// Builds a composition root: creates an injector for `root_class`,
  /// resolves every provider it declares, and constructs the root instance
  /// from the exported (non-private) modules.
  pub fn bootstrap(root_class: &Arc<RootClass>, parent: Option<&Arc<Injector>>) -> Result<Root> {
    Self::bootstrap_with(root_class, parent, BootstrapOptions::default())
  }

  pub fn bootstrap_with(
    root_class: &Arc<RootClass>,
    parent: Option<&Arc<Injector>>,
    options: BootstrapOptions,
  ) -> Result<Root> {
    let settings = options
      .settings
      .map(Arc::new)
      .or_else(|| parent.map(|p| Arc::clone(&p.settings)))
      .unwrap_or_default();
    let pending = options
      .pending
      .or_else(|| parent.map(|p| Arc::clone(&p.pending)))
      .unwrap_or_else(PendingRecord::global);

    let mut universal = IndexMap::new();
    for def in root_class.inherited_providers() {
      def.validate()?;
      universal.insert(def.token().clone(), Arc::new(Provider::new(def)));
    }

    let injector = Arc::new(Injector {
      container: Arc::new(Container::new()),
      universal,
      parent: OnceCell::new(),
      root_class: Arc::clone(root_class),
      settings,
      pending,
    });
    if let Some(parent) = parent {
      injector.set_parent(parent);
    }

    debug!(
      root = root_class.name(),
      providers = injector.universal.len(),
      nested = parent.is_some(),
      "bootstrapping injector"
    );

    for provider in injector.universal.values() {
      injector.resolve_provider(provider)?;
    }

    let modules = injector.exported_modules();
    let instance = root_class.construct(&modules)?;
    if let Some(hook) = root_class.module_hook() {
      for (name, module) in modules.iter() {
        hook(&instance, name, module);
      }
    }

    debug!(
      root = root_class.name(),
      modules = modules.len(),
      "injector bootstrapped"
    );
    Ok(Root::new(instance, injector, modules))
  }

  /// Clears the calling thread's default pending record. Meant for test
  /// harnesses that run independent bootstraps one after another.
  pub fn reset() {
    PendingRecord::global().clear();
  }

  /// Links this injector, and its container, to a parent scope. Only the
  /// first link takes effect.
  pub fn set_parent(&self, parent: &Arc<Injector>) {
    if self.parent.set(Arc::clone(parent)).is_err() {
      warn!(
        root = self.root_class.name(),
        "injector already has a parent; keeping the first one"
      );
      return;
    }
    self.container.set_parent(Arc::clone(&parent.container));
  }

  /// The resolved instance for `token`, looking through ancestor containers.
  pub fn get(&self, token: impl Into<Token>) -> Option<Instance> {
    self
      .container
      .get(&token.into())
      .and_then(|provider| provider.instance())
  }

  pub fn get_as<T: Any + Send + Sync>(&self, token: impl Into<Token>) -> Option<Arc<T>> {
    self.get(token).and_then(|instance| instance.downcast::<T>().ok())
  }

  pub fn container(&self) -> &Arc<Container> {
    &self.container
  }

  pub fn parent(&self) -> Option<&Arc<Injector>> {
    self.parent.get()
  }

  pub fn root_class(&self) -> &Arc<RootClass> {
    &self.root_class
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn pending(&self) -> &Arc<PendingRecord> {
    &self.pending
  }

  /// A provider declared by this injector's own root class.
  pub fn universal_provider(&self, token: impl Into<Token>) -> Option<&Arc<Provider>> {
    self.universal.get(&token.into())
  }

  /// Resolves `provider` in this scope and commits it to the container.
  ///
  /// A token that is already visible through the container (locally or in an
  /// ancestor) is not resolved again; the cached provider is returned.
  pub fn resolve_provider(self: &Arc<Self>, provider: &Arc<Provider>) -> Result<Arc<Provider>> {
    let token = provider.token();
    if let Some(cached) = self.container.get(token) {
      trace!(token = %token, "provider already resolved");
      return Ok(cached);
    }

    // Held until after the commit below. Module factories manage their own entry.
    let _guard = match provider.kind() {
      ProviderKind::Value(_) | ProviderKind::Class(ClassTarget::Root(_)) => None,
      _ => Some(self.pending.enter(token, self.settings.max_depth)?),
    };

    match provider.kind() {
      ProviderKind::Value(value) => {
        provider.set_instance(Arc::clone(value));
      }
      ProviderKind::Existing(target) => {
        self.pending.check(target)?;
        let aliased = self
          .resolve_token(target)?
          .ok_or_else(|| Error::AliasTargetMissing {
            token: token.clone(),
            target: target.clone(),
          })?;
        provider.set_instance(resolved_instance(&aliased)?);
      }
      ProviderKind::Factory { factory, deps } => {
        let bag = self.resolve_dependencies(deps)?;
        provider.set_instance(factory(&bag)?);
      }
      ProviderKind::Class(ClassTarget::Module(class)) => {
        let bag = self.resolve_dependencies(&class.inherited_dependencies())?;
        provider.set_instance(class.construct(&bag)?);
      }
      ProviderKind::Class(ClassTarget::Root(root_class)) => {
        return self.resolve_module_factory_provider(provider, root_class);
      }
    }

    self.commit(provider);
    Ok(Arc::clone(provider))
  }

  /// Resolves an ordered dependency list into an argument bag.
  ///
  /// Optional dependencies that resolve to nothing are left out. The bag
  /// always ends with an `injector` entry pointing at this injector.
  pub fn resolve_dependencies(self: &Arc<Self>, deps: &[Dependency]) -> Result<Deps> {
    let mut bag = Deps::new();
    for dep in deps {
      self.pending.check(&dep.token)?;

      let Some(provider) = self.resolve_token(&dep.token)? else {
        if dep.optional {
          trace!(token = %dep.token, "optional dependency not found, skipping");
          continue;
        }
        return Err(Error::UnresolvedDependency {
          token: dep.token.clone(),
        });
      };
      let instance = resolved_instance(&provider)?;

      if dep.spread {
        let spread = instance
          .downcast_ref::<Deps>()
          .ok_or_else(|| Error::NotSpreadable {
            token: dep.token.clone(),
          })?;
        bag.spread(spread);
      } else {
        bag.insert(self.settings.normalize(dep.token.as_str()), instance);
      }
    }
    bag.insert(INJECTOR_KEY, Arc::clone(self) as Instance);
    trace!(root = self.root_class.name(), entries = ?bag, "dependency bag assembled");
    Ok(bag)
  }

  /// The entry point a scope offers its descendants: resolves `token` from
  /// this injector's universal providers, or asks its own parent.
  pub fn resolve_for_children(self: &Arc<Self>, token: &Token) -> Result<Option<Arc<Provider>>> {
    if let Some(provider) = self.universal.get(token) {
      trace!(token = %token, root = self.root_class.name(), "resolving on behalf of a child scope");
      return self.resolve_provider(provider).map(Some);
    }
    match self.parent.get() {
      Some(parent) => parent.resolve_for_children(token),
      None => Ok(None),
    }
  }

  // Container first, then this scope's universal providers, then ancestors.
  fn resolve_token(self: &Arc<Self>, token: &Token) -> Result<Option<Arc<Provider>>> {
    if let Some(provider) = self.container.get(token) {
      return Ok(Some(provider));
    }
    if let Some(provider) = self.universal.get(token) {
      return self.resolve_provider(provider).map(Some);
    }
    match self.parent.get() {
      Some(parent) => parent.resolve_for_children(token),
      None => Ok(None),
    }
  }

  fn resolve_module_factory_provider(
    self: &Arc<Self>,
    provider: &Arc<Provider>,
    root_class: &Arc<RootClass>,
  ) -> Result<Arc<Provider>> {
    let token = provider.token();
    if let Some(cached) = self.container.get(token) {
      return Ok(cached);
    }

    let _guard = self.pending.enter(token, self.settings.max_depth)?;
    if Arc::ptr_eq(root_class, &self.root_class) {
      return Err(Error::CircularDependency {
        chain: self.pending.chain(),
        token: token.clone(),
      });
    }

    let nested = Injector::bootstrap(root_class, Some(self))?;
    provider.set_instance(Arc::clone(nested.instance()));
    self.commit(provider);
    Ok(Arc::clone(provider))
  }

  fn commit(&self, provider: &Arc<Provider>) {
    debug!(
      token = %provider.token(),
      provider = ?provider,
      root = self.root_class.name(),
      "provider resolved"
    );
    self
      .container
      .set(provider.token().clone(), Arc::clone(provider));
  }

  // Every non-private local entry, under its normalized token.
  fn exported_modules(&self) -> Deps {
    let mut modules = Deps::new();
    for (token, provider) in self.container.entries() {
      if provider.is_private() {
        continue;
      }
      if let Some(instance) = provider.instance() {
        modules.insert(self.settings.normalize(token.as_str()), instance);
      }
    }
    modules
  }
}

fn resolved_instance(provider: &Provider) -> Result<Instance> {
  provider
    .instance()
    .ok_or_else(|| Error::UnresolvedProvider {
      token: provider.token().clone(),
    })
}

impl fmt::Debug for Injector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Injector")
      .field("root_class", &self.root_class.name())
      .field("universal", &self.universal.keys().collect::<Vec<_>>())
      .field("container", &self.container.len())
      .field("has_parent", &self.parent.get().is_some())
      .finish_non_exhaustive()
  }
}
