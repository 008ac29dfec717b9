//! Integration tests for strict template dicts over derived enumerations.

use enumfield_db::enums::Enumeration;
use enumfield_macros::Enumeration;
use enumfield_template::{strict_enum_context, Context, ContextValue, TemplateErrorDict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enumeration)]
pub enum Fruit {
    #[item(value = 1, slug = "APPLE")]
    Apple,
    #[item(value = 2, slug = "PEAR", display = "Conference pear")]
    Pear,
}

fn context() -> Context {
    let mut ctx = Context::new().with_string_if_invalid("<missing>");
    ctx.set("Fruit", strict_enum_context(Fruit::enumeration()));
    ctx.set("choice", ContextValue::from(Fruit::Pear.item()));
    ctx
}

#[test]
fn test_item_attributes_resolve() {
    let ctx = context();
    assert_eq!(ctx.render_variable("Fruit.APPLE.value").unwrap(), "1");
    assert_eq!(ctx.render_variable("choice.display").unwrap(), "Conference pear");
    assert_eq!(ctx.render_variable("choice.slug").unwrap(), "PEAR");
}

#[test]
fn test_unknown_item_is_loud() {
    let err = context().resolve("Fruit.BANANA").unwrap_err();
    assert_eq!(err.to_string(), "Fruit has no item 'BANANA'");
    assert!(!err.silent_variable_failure());
}

#[test]
fn test_unknown_variable_is_quiet() {
    assert_eq!(context().render_variable("vegetable").unwrap(), "<missing>");
}

#[test]
fn test_nested_strict_dict_with_custom_template() {
    let mut labels: TemplateErrorDict<ContextValue> = TemplateErrorDict::new("No label for %s");
    labels.insert("ok", ContextValue::from("Fine"));

    let mut ctx = context();
    ctx.set("labels", labels);
    assert_eq!(ctx.render_variable("labels.ok").unwrap(), "Fine");
    assert_eq!(
        ctx.resolve("labels.bad").unwrap_err().message(),
        "No label for bad"
    );
}
