//! Public macros for ergonomic instance lookup.

/// Looks up a resolved instance in an injector, panicking if it is missing.
///
/// This is meant for code that runs after a successful bootstrap, where a
/// missing token means the provider graph itself is wrong. For a
/// non-panicking lookup, use [`Injector::get_as`](crate::Injector::get_as).
///
/// # Panics
///
/// Panics if nothing is resolved under the token, or if the instance has
/// another type.
///
/// # Examples
///
/// ```
/// use fibre_injector::{resolve, Injector, ProviderDef, RootClass};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct English;
/// impl Greeter for English { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let app = RootClass::builder("App")
///   .provide(ProviderDef::value("port", 8080u16))
///   .provide(ProviderDef::value("greeter", Arc::new(English) as Arc<dyn Greeter>))
///   .build();
/// let root = Injector::bootstrap(&app, None).unwrap();
///
/// let port = resolve!(root.injector(), u16, "port");
/// assert_eq!(*port, 8080);
///
/// let greeter = resolve!(root.injector(), trait Greeter, "greeter");
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  // A trait object registered as `Arc<dyn Trait>`: resolve!(injector, trait MyTrait, "token")
  ($injector:expr, trait $trait_ident:ident, $token:expr) => {{
    let token: $crate::Token = ($token).into();
    $injector
      .get_as::<::std::sync::Arc<dyn $trait_ident>>(token.clone())
      .map(|shared| ::std::sync::Arc::clone(&*shared))
      .unwrap_or_else(|| {
        panic!(
          "Failed to resolve required trait provider '{}': {}",
          token,
          ::std::any::type_name::<dyn $trait_ident>()
        )
      })
  }};

  // A concrete type: resolve!(injector, MyService, "token")
  ($injector:expr, $type:ty, $token:expr) => {{
    let token: $crate::Token = ($token).into();
    $injector.get_as::<$type>(token.clone()).unwrap_or_else(|| {
      panic!(
        "Failed to resolve required provider '{}': {}",
        token,
        ::std::any::type_name::<$type>()
      )
    })
  }};
}
