use fibre_injector::{Deps, Injector, ProviderDef, RootClass};

// A feature area bootstrapped as its own child scope. It declares only what
// it owns; the database handle comes from the application root.
fn billing() -> std::sync::Arc<RootClass> {
  RootClass::builder("Billing")
    .provide(ProviderDef::factory("invoices", ["database"], |deps: &Deps| {
      let db = deps.require::<String>("database")?;
      Ok(format!("invoices stored in {}", db))
    }))
    .provide(ProviderDef::value("rates_table", "rates".to_string()).private())
    .build()
}

fn main() -> fibre_injector::Result<()> {
  let app = RootClass::builder("App")
    .provide(ProviderDef::module_factory("billing", &billing()))
    .provide(ProviderDef::value("database", "postgres://app".to_string()))
    .build();

  let root = Injector::bootstrap(&app, None)?;

  let billing = root
    .modules()
    .get_as::<Deps>("billing")
    .expect("billing root is exported");
  println!("Billing exports: {:?}", billing.keys().collect::<Vec<_>>());
  println!(
    "{}",
    billing.get_as::<String>("invoices").expect("invoices export")
  );
  assert!(!billing.contains("rates_table"));
  Ok(())
}
