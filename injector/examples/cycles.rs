use fibre_injector::{Deps, Dependency, Error, Injector, ProviderDef, RootClass};

fn main() {
  // A required dependency nobody declares.
  let incomplete = RootClass::builder("Incomplete")
    .provide(ProviderDef::factory("mailer", ["smtp"], |_: &Deps| Ok(())))
    .build();
  match Injector::bootstrap(&incomplete, None) {
    Err(e) => println!("Missing dependency: {}", e),
    Ok(_) => unreachable!("bootstrap must fail"),
  }

  // The same dependency, marked optional, is simply left out.
  let tolerant = RootClass::builder("Tolerant")
    .provide(ProviderDef::factory(
      "mailer",
      [Dependency::new("smtp").optional()],
      |deps: &Deps| Ok(deps.contains("smtp")),
    ))
    .build();
  let root = Injector::bootstrap(&tolerant, None).expect("optional deps never fail");
  println!(
    "Mailer saw smtp: {}",
    root.modules().get_as::<bool>("mailer").expect("mailer export")
  );

  // orders -> payments -> orders
  let cyclic = RootClass::builder("Cyclic")
    .provide(ProviderDef::factory("orders", ["payments"], |_: &Deps| Ok(())))
    .provide(ProviderDef::factory("payments", ["orders"], |_: &Deps| Ok(())))
    .build();
  match Injector::bootstrap(&cyclic, None) {
    Err(e @ Error::CircularDependency { .. }) => println!("Cycle: {}", e),
    other => unreachable!("expected a cycle, got {:?}", other.map(|_| ())),
  }
}
