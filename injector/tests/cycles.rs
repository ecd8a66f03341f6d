mod common;

use common::{bootstrap, Counter};
use fibre_injector::{
  BootstrapOptions, Deps, Error, Injector, ModuleClass, PendingRecord, ProviderDef, RootClass,
  Settings,
};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

fn chain_of(err: &Error) -> Vec<String> {
  match err {
    Error::CircularDependency { chain, .. } => chain.iter().map(ToString::to_string).collect(),
    other => panic!("expected a circular dependency, got: {other}"),
  }
}

#[test]
fn test_direct_cycle_fails_before_anything_is_built() {
  // Arrange: A -> B -> A
  let built = Arc::new(Counter::default());
  let (for_a, for_b) = (Arc::clone(&built), Arc::clone(&built));
  let app = RootClass::builder("App")
    .provide(ProviderDef::factory("A", ["B"], move |_: &Deps| {
      for_a.hit();
      Ok(())
    }))
    .provide(ProviderDef::factory("B", ["A"], move |_: &Deps| {
      for_b.hit();
      Ok(())
    }))
    .build();

  // Act
  let err = bootstrap(&app).unwrap_err();

  // Assert
  assert!(err.is_circular());
  assert_eq!(err.token().unwrap().as_str(), "A");
  assert_eq!(chain_of(&err), vec!["A", "B"]);
  assert_eq!(built.count(), 0);
}

#[test]
fn test_class_cycle_through_three_providers() {
  let first = ModuleClass::builder("First").depends_on("second").build();
  let second = ModuleClass::builder("Second").depends_on("third").build();
  let third = ModuleClass::builder("Third").depends_on("first").build();
  let app = RootClass::builder("App")
    .provide(ProviderDef::class("first", &first))
    .provide(ProviderDef::class("second", &second))
    .provide(ProviderDef::class("third", &third))
    .build();

  let err = bootstrap(&app).unwrap_err();
  assert_eq!(chain_of(&err), vec!["first", "second", "third"]);
}

#[test]
fn test_alias_cycle_is_detected() {
  let app = RootClass::builder("App")
    .provide(ProviderDef::existing("x", "y"))
    .provide(ProviderDef::existing("y", "x"))
    .build();

  let err = bootstrap(&app).unwrap_err();
  assert!(err.is_circular());
}

#[test]
fn test_self_dependency_is_detected() {
  let app = RootClass::builder("App")
    .provide(ProviderDef::factory("me", ["me"], |_: &Deps| Ok(())))
    .build();

  let err = bootstrap(&app).unwrap_err();
  assert!(err.is_circular());
}

#[test]
fn test_self_alias_is_a_cycle() {
  let app = RootClass::builder("App")
    .provide(ProviderDef::existing("loop", "loop"))
    .build();

  let err = bootstrap(&app).unwrap_err();
  assert!(err.is_circular());
  assert_eq!(err.token().unwrap().as_str(), "loop");
  assert_eq!(chain_of(&err), vec!["loop"]);
}

#[test]
fn test_tokens_stay_pending_until_their_provider_is_built() {
  // Each constructor records which tokens are in flight while it runs.
  let pending = Arc::new(PendingRecord::new());
  let seen = Arc::new(Mutex::new(Vec::new()));

  let (record, log) = (Arc::clone(&pending), Arc::clone(&seen));
  let class = ModuleClass::builder("Leaf")
    .constructor(move |_: &Deps| {
      log.lock().unwrap().push(record.chain());
      Ok(())
    })
    .build();
  let (record, log) = (Arc::clone(&pending), Arc::clone(&seen));
  let app = RootClass::builder("App")
    .provide(ProviderDef::existing("alias", "top"))
    .provide(ProviderDef::factory("top", ["leaf"], move |_: &Deps| {
      log.lock().unwrap().push(record.chain());
      Ok(())
    }))
    .provide(ProviderDef::class("leaf", &class))
    .build();

  let options = BootstrapOptions::default().with_pending(Arc::clone(&pending));
  Injector::bootstrap_with(&app, None, options).unwrap();

  let to_strings = |chain: &Vec<fibre_injector::Token>| {
    chain.iter().map(ToString::to_string).collect::<Vec<_>>()
  };
  let seen = seen.lock().unwrap();
  assert_eq!(to_strings(&seen[0]), vec!["alias", "top", "leaf"]);
  assert_eq!(to_strings(&seen[1]), vec!["alias", "top"]);
  assert!(pending.is_empty());
}

#[test]
fn test_concurrent_default_bootstraps_do_not_interfere() {
  // Both roots use the same token and are held mid-resolution at the same time.
  let barrier = Arc::new(Barrier::new(2));
  let root_with = |name: &str| {
    let barrier = Arc::clone(&barrier);
    RootClass::builder(name)
      .provide(ProviderDef::factory("slow", Vec::<&str>::new(), move |_: &Deps| {
        barrier.wait();
        Ok(1u8)
      }))
      .build()
  };
  let (app, other) = (root_with("App"), root_with("Other"));

  let results = thread::scope(|s| {
    let first = s.spawn(|| Injector::bootstrap(&app, None).map(|_| ()));
    let second = s.spawn(|| Injector::bootstrap(&other, None).map(|_| ()));
    [first.join().unwrap(), second.join().unwrap()]
  });

  for result in results {
    assert!(result.is_ok(), "bootstrap failed: {:?}", result.err());
  }
}

#[test]
fn test_module_factory_self_reference_is_rejected() {
  let app = RootClass::builder("App").build();
  app.declare(ProviderDef::module_factory("again", &app));

  let err = bootstrap(&app).unwrap_err();
  assert!(err.is_circular());
  assert_eq!(err.token().unwrap().as_str(), "again");
}

#[test]
fn test_mutual_module_factories_are_rejected() {
  let outer = RootClass::builder("Outer").build();
  let inner = RootClass::builder("Inner")
    .provide(ProviderDef::module_factory("outer", &outer))
    .build();
  outer.declare(ProviderDef::module_factory("inner", &inner));

  let err = bootstrap(&outer).unwrap_err();
  assert!(err.is_circular());
  assert_eq!(chain_of(&err), vec!["inner", "outer"]);
}

#[test]
fn test_failed_resolution_leaves_pending_record_clean() {
  let pending = Arc::new(PendingRecord::new());
  let app = RootClass::builder("App")
    .provide(ProviderDef::factory("A", ["B"], |_: &Deps| Ok(())))
    .provide(ProviderDef::factory("B", ["A"], |_: &Deps| Ok(())))
    .build();

  let options = BootstrapOptions::default().with_pending(Arc::clone(&pending));
  assert!(Injector::bootstrap_with(&app, None, options).is_err());
  assert!(pending.is_empty());
}

#[test]
fn test_depth_limit_stops_long_chains() {
  let app = RootClass::builder("App")
    .provide(ProviderDef::value("d0", 0u32))
    .provide(ProviderDef::factory("d1", ["d0"], |_: &Deps| Ok(1u32)))
    .provide(ProviderDef::factory("d2", ["d1"], |_: &Deps| Ok(2u32)))
    .provide(ProviderDef::factory("d3", ["d2"], |_: &Deps| Ok(3u32)))
    .build();
  let shallow = Settings {
    max_depth: 2,
    ..Settings::default()
  };

  // Declared leaf-first, every chain stays short.
  let options = BootstrapOptions::isolated().with_settings(shallow.clone());
  assert!(Injector::bootstrap_with(&app, None, options).is_ok());

  let reversed = RootClass::builder("Reversed")
    .provide(ProviderDef::factory("d3", ["d2"], |_: &Deps| Ok(3u32)))
    .provide(ProviderDef::factory("d2", ["d1"], |_: &Deps| Ok(2u32)))
    .provide(ProviderDef::factory("d1", ["d0"], |_: &Deps| Ok(1u32)))
    .provide(ProviderDef::value("d0", 0u32))
    .build();
  let options = BootstrapOptions::isolated().with_settings(shallow);
  let err = Injector::bootstrap_with(&reversed, None, options).unwrap_err();
  assert!(matches!(err, Error::DepthExceeded { depth: 2, .. }));
}

#[test]
#[serial]
fn test_default_bootstrap_uses_the_global_record() {
  Injector::reset();
  let app = RootClass::builder("App")
    .provide(ProviderDef::value("a", 1u8))
    .build();

  let root = Injector::bootstrap(&app, None).unwrap();

  assert!(Arc::ptr_eq(root.injector().pending(), &PendingRecord::global()));
  assert!(PendingRecord::global().is_empty());
}

#[test]
#[serial]
fn test_reset_clears_the_global_record() {
  let global = PendingRecord::global();
  let token = "stale".into();
  let guard = global.enter(&token, 10).unwrap();
  std::mem::forget(guard);
  assert!(global.contains(&token));

  Injector::reset();

  assert!(global.is_empty());
}
