//! End-to-end use of the facade: declare, store, migrate, render.

use django_enumfield::migrations::{MigrationAutodetector, MigrationFieldDef, ModelState, ProjectState};
use django_enumfield::prelude::*;
use django_enumfield::template::strict_enum_context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enumeration)]
#[enumeration(name = "Beverage", crate = "django_enumfield::db")]
pub enum Beverage {
    #[item(value = 1, slug = "TEA")]
    Tea,
    #[item(value = 2, slug = "COFFEE", display = "Filter coffee")]
    Coffee,
}

fn default_beverage() -> Item {
    Beverage::Coffee.into()
}

#[test]
fn test_end_to_end() {
    let field = EnumField::for_enum::<Beverage>("drink").default_callable(default_beverage);

    // Storage
    let stored = field.get_db_prep_save(&Value::from("COFFEE")).unwrap();
    assert_eq!(stored, Value::Int(2));
    let loaded = field.from_db_value(&stored).unwrap().unwrap();
    assert_eq!(Beverage::from_item(&loaded), Some(Beverage::Coffee));
    assert_eq!(field.value_to_string(Some(&loaded)), "2");

    // Lookups
    let q = field
        .prepare_q(Q::filter("drink", Lookup::In(vec![Value::from("TEA"), Value::from(2)])))
        .unwrap();
    assert_eq!(
        q,
        Q::filter("drink", Lookup::In(vec![Value::Int(1), Value::Int(2)]))
    );

    // Migrations
    let mut state = ProjectState::new();
    state.add_model(ModelState::new(
        "cafe",
        "order",
        vec![MigrationFieldDef::from_enum_field(&field).unwrap()],
    ));
    assert!(MigrationAutodetector::new(state.clone(), state)
        .detect_changes()
        .is_empty());

    // Templates
    let mut ctx = Context::new();
    ctx.set("Beverage", strict_enum_context(Beverage::enumeration()));
    assert_eq!(ctx.render_variable("Beverage.COFFEE.display").unwrap(), "Filter coffee");
    assert!(ctx.resolve("Beverage.JUICE").is_err());
}
