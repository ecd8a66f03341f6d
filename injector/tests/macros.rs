mod common;

use common::bootstrap;
use fibre_injector::{resolve, ProviderDef, RootClass, Token};
use std::sync::Arc;

trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}

struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self) -> String {
    "Hello!".to_string()
  }
}

#[derive(Debug, PartialEq, Eq)]
struct SimpleService {
  id: u32,
}

fn app() -> Arc<RootClass> {
  RootClass::builder("App")
    .provide(ProviderDef::value("simple", SimpleService { id: 101 }))
    .provide(ProviderDef::value(
      "greeter",
      Arc::new(EnglishGreeter) as Arc<dyn Greeter>,
    ))
    .build()
}

#[test]
fn test_resolve_concrete_type() {
  let root = bootstrap(&app()).unwrap();

  let r1 = resolve!(root.injector(), SimpleService, "simple");
  let r2 = resolve!(root.injector(), SimpleService, String::from("simple"));

  assert_eq!(r1.id, 101);
  assert!(Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_resolve_trait_object() {
  let root = bootstrap(&app()).unwrap();

  let greeter = resolve!(root.injector(), trait Greeter, Token::from("greeter"));

  assert_eq!(greeter.greet(), "Hello!");
}

#[test]
#[should_panic(expected = "Failed to resolve required provider 'absent'")]
fn test_resolve_missing_token_panics() {
  let root = bootstrap(&app()).unwrap();
  resolve!(root.injector(), SimpleService, "absent");
}

#[test]
#[should_panic(expected = "Failed to resolve required provider 'simple'")]
fn test_resolve_wrong_type_panics() {
  let root = bootstrap(&app()).unwrap();
  resolve!(root.injector(), String, "simple");
}
