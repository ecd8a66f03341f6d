//! # Fibre Injector
//!
//! A hierarchical dependency-injection resolution engine.
//!
//! Providers (recipes for named singletons) are declared on composition-root
//! classes. Bootstrapping a root creates an [`Injector`] scope, resolves every
//! declared provider in dependency order, detects cycles, and constructs the
//! root instance from the exported modules. Scopes form a tree: a child scope
//! can use providers that only an ancestor declares, and a root declared as a
//! provider of another root is bootstrapped as a nested child scope.
//!
//! ## Core Concepts
//!
//! - **Provider**: a value, a class, a factory function, or an alias of another token.
//! - **Container**: the per-injector store of resolved providers, falling back
//!   to the parent scope's container.
//! - **Dependencies**: declared as tokens, optionally `optional` or `spread`, and
//!   handed to constructors as an ordered [`Deps`] bag.
//! - **Pending record**: tokens in flight; re-entering one is a circular dependency.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_injector::{Deps, Injector, ModuleClass, ProviderDef, RootClass};
//!
//! struct Database {
//!   url: String,
//! }
//!
//! let database = ModuleClass::builder("Database")
//!   .depends_on("database_url")
//!   .constructor(|deps: &Deps| {
//!     let url = deps.require::<String>("database_url")?;
//!     Ok(Database { url: (*url).clone() })
//!   })
//!   .build();
//!
//! let app = RootClass::builder("App")
//!   .provide(ProviderDef::value("database_url", "postgres://localhost".to_string()))
//!   .provide(ProviderDef::class("database", &database))
//!   .build();
//!
//! let root = Injector::bootstrap(&app, None).unwrap();
//! let db = root.injector().get_as::<Database>("database").unwrap();
//! assert_eq!(db.url, "postgres://localhost");
//! assert!(root.modules().contains("database"));
//! ```

mod class;
mod container;
mod deps;
mod error;
mod injector;
mod macros;
mod pending;
mod provider;
mod root;
mod settings;
mod token;

pub use class::{ModuleClass, ModuleClassBuilder, ModuleHook, RootClass, RootClassBuilder};
pub use container::Container;
pub use deps::{Dependency, Deps, INJECTOR_KEY};
pub use error::{Error, Result};
pub use injector::{BootstrapOptions, Injector};
pub use pending::{PendingGuard, PendingRecord};
pub use provider::{ClassTarget, Instance, Provider, ProviderDef, ProviderKind};
pub use root::Root;
pub use settings::{NameCase, Settings};
pub use token::Token;
