//! Provider declarations and their per-injector materialized form.

use crate::class::{ModuleClass, RootClass};
use crate::deps::{Dependency, Deps};
use crate::error::{Error, Result};
use crate::token::Token;

use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A resolved, shareable instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type FactoryFn = Arc<dyn Fn(&Deps) -> Result<Instance> + Send + Sync>;

/// What a class provider instantiates. The classification is fixed when the
/// provider is declared.
#[derive(Clone)]
pub enum ClassTarget {
  /// An ordinary injectable, constructed from its resolved dependency bag.
  Module(Arc<ModuleClass>),
  /// A nested composition root, bootstrapped in a child injector.
  Root(Arc<RootClass>),
}

#[derive(Clone)]
pub enum ProviderKind {
  Value(Instance),
  Class(ClassTarget),
  Factory {
    factory: FactoryFn,
    deps: Vec<Dependency>,
  },
  /// An alias exposing another token's instance under this provider's token.
  Existing(Token),
}

impl ProviderKind {
  fn label(&self) -> &'static str {
    match self {
      ProviderKind::Value(_) => "value",
      ProviderKind::Class(ClassTarget::Module(_)) => "class",
      ProviderKind::Class(ClassTarget::Root(_)) => "module factory",
      ProviderKind::Factory { .. } => "factory",
      ProviderKind::Existing(_) => "existing",
    }
  }
}

/// A declared recipe for one named singleton.
///
/// Definitions are owned by a [`RootClass`] and are materialized into a fresh
/// [`Provider`] every time that root is bootstrapped.
#[derive(Clone)]
pub struct ProviderDef {
  token: Token,
  kind: ProviderKind,
  private: bool,
}

impl ProviderDef {
  pub fn new(token: impl Into<Token>, kind: ProviderKind) -> Self {
    Self {
      token: token.into(),
      kind,
      private: false,
    }
  }

  pub fn value<T: Any + Send + Sync>(token: impl Into<Token>, value: T) -> Self {
    Self::new(token, ProviderKind::Value(Arc::new(value)))
  }

  /// A value provider around an already shared instance.
  pub fn instance(token: impl Into<Token>, instance: Instance) -> Self {
    Self::new(token, ProviderKind::Value(instance))
  }

  pub fn class(token: impl Into<Token>, class: &Arc<ModuleClass>) -> Self {
    Self::new(
      token,
      ProviderKind::Class(ClassTarget::Module(Arc::clone(class))),
    )
  }

  pub fn module_factory(token: impl Into<Token>, root: &Arc<RootClass>) -> Self {
    Self::new(token, ProviderKind::Class(ClassTarget::Root(Arc::clone(root))))
  }

  pub fn factory<T, D, F>(token: impl Into<Token>, deps: D, factory: F) -> Self
  where
    T: Any + Send + Sync,
    D: IntoIterator,
    D::Item: Into<Dependency>,
    F: Fn(&Deps) -> Result<T> + Send + Sync + 'static,
  {
    let factory: FactoryFn =
      Arc::new(move |deps: &Deps| factory(deps).map(|v| Arc::new(v) as Instance));
    Self::new(
      token,
      ProviderKind::Factory {
        factory,
        deps: deps.into_iter().map(Into::into).collect(),
      },
    )
  }

  pub fn existing(token: impl Into<Token>, target: impl Into<Token>) -> Self {
    Self::new(token, ProviderKind::Existing(target.into()))
  }

  /// Keeps the provider out of its root's exported module bag.
  pub fn private(mut self) -> Self {
    self.private = true;
    self
  }

  pub fn token(&self) -> &Token {
    &self.token
  }

  pub fn kind(&self) -> &ProviderKind {
    &self.kind
  }

  pub fn is_private(&self) -> bool {
    self.private
  }

  pub(crate) fn validate(&self) -> Result<()> {
    if self.token.is_empty() {
      return Err(Error::MalformedProvider {
        token: self.token.clone(),
        reason: "token is empty".to_owned(),
      });
    }
    Ok(())
  }
}

impl fmt::Debug for ProviderDef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProviderDef")
      .field("token", &self.token)
      .field("kind", &self.kind.label())
      .field("private", &self.private)
      .finish()
  }
}

/// A provider materialized inside one injector.
///
/// The instance moves from unset to set exactly once.
pub struct Provider {
  def: ProviderDef,
  instance: OnceCell<Instance>,
}

impl Provider {
  pub fn new(def: ProviderDef) -> Self {
    Self {
      def,
      instance: OnceCell::new(),
    }
  }

  pub fn token(&self) -> &Token {
    &self.def.token
  }

  pub fn kind(&self) -> &ProviderKind {
    &self.def.kind
  }

  pub fn is_private(&self) -> bool {
    self.def.private
  }

  pub fn is_resolved(&self) -> bool {
    self.instance.get().is_some()
  }

  pub fn instance(&self) -> Option<Instance> {
    self.instance.get().cloned()
  }

  /// Typed view of the resolved instance.
  pub fn instance_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.instance().and_then(|i| i.downcast::<T>().ok())
  }

  /// Sets the instance unless one is already set; the first instance always wins.
  pub(crate) fn set_instance(&self, instance: Instance) -> Instance {
    Arc::clone(self.instance.get_or_init(|| instance))
  }
}

impl fmt::Debug for Provider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Provider")
      .field("token", self.token())
      .field("kind", &self.kind().label())
      .field("private", &self.is_private())
      .field("resolved", &self.is_resolved())
      .finish()
  }
}
