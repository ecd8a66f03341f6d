use fibre_injector::{resolve, Deps, Injector, ModuleClass, ProviderDef, RootClass};
use std::sync::Arc;

struct Settings {
  greeting: String,
}

struct Greeter {
  settings: Arc<Settings>,
}

impl Greeter {
  fn greet(&self, name: &str) -> String {
    format!("{}, {}!", self.settings.greeting, name)
  }
}

fn main() -> fibre_injector::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter("fibre_injector=debug")
    .init();

  let greeter = ModuleClass::builder("Greeter")
    .depends_on("Settings")
    .constructor(|deps: &Deps| {
      println!("Constructing Greeter...");
      Ok(Greeter {
        settings: deps.require::<Settings>("settings")?,
      })
    })
    .build();

  let app = RootClass::builder("App")
    .provide(ProviderDef::value(
      "Settings",
      Settings {
        greeting: "Hello".to_string(),
      },
    ))
    .provide(ProviderDef::class("Greeter", &greeter))
    .provide(ProviderDef::existing("DefaultGreeter", "Greeter"))
    .build();

  let root = Injector::bootstrap(&app, None)?;

  println!(
    "Exported modules: {:?}",
    root.modules().keys().collect::<Vec<_>>()
  );

  let g1 = resolve!(root.injector(), Greeter, "Greeter");
  let g2 = resolve!(root.injector(), Greeter, "DefaultGreeter");
  println!("{}", g1.greet("world"));
  assert!(
    Arc::ptr_eq(&g1, &g2),
    "An alias must expose the very same instance"
  );
  println!("Greeter was constructed once and is shared under both tokens.");
  Ok(())
}
