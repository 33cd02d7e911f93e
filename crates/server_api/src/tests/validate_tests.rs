use super::*;
use crate::forms::{PageCategoryInput, PizzaSelectionInput};
use crate::test_support::form;

fn order_schema() -> Schema {
    Schema::new()
        .field(
            "name",
            FieldRule::required(FieldKind::Text {
                min_len: 2,
                max_len: 10,
            }),
        )
        .field("pizzaUUID", FieldRule::required(FieldKind::Uuid))
        .field(
            "quantity",
            FieldRule::optional(FieldKind::Integer { min: 1, max: 5 }),
        )
        .field("extraCheese", FieldRule::optional(FieldKind::Boolean))
}

#[test]
fn missing_required_fields_are_all_reported() {
    let errors = order_schema()
        .validate(&form(&[("quantity", "3")]))
        .expect_err("should fail");

    assert_eq!(errors.get("name").map(String::as_str), Some("Required"));
    assert_eq!(errors.get("pizzaUUID").map(String::as_str), Some("Required"));
    assert_eq!(errors.len(), 2);
}

#[test]
fn blank_values_count_as_missing() {
    let errors = order_schema()
        .validate(&form(&[("name", "   "), ("pizzaUUID", "")]))
        .expect_err("should fail");
    assert!(errors.contains_key("name"));
    assert!(errors.contains_key("pizzaUUID"));
}

#[test]
fn every_invalid_field_gets_one_message() {
    let errors = order_schema()
        .validate(&form(&[
            ("name", "x"),
            ("pizzaUUID", "not-a-uuid"),
            ("quantity", "9"),
            ("extraCheese", "maybe"),
        ]))
        .expect_err("should fail");

    assert_eq!(errors["name"], "Must contain at least 2 character(s)");
    assert_eq!(errors["pizzaUUID"], "Invalid uuid");
    assert_eq!(errors["quantity"], "Must be between 1 and 5");
    assert_eq!(errors["extraCheese"], "Expected a boolean");
}

#[test]
fn valid_payload_keeps_only_declared_fields() {
    let uuid = Uuid::new_v4();
    let uuid_text = uuid.to_string();
    let data = order_schema()
        .validate(&form(&[
            ("_subject", "order"),
            ("name", "  Alice "),
            ("pizzaUUID", uuid_text.as_str()),
            ("extraCheese", "on"),
            ("csrf", "ignored"),
        ]))
        .expect("valid");

    let names: Vec<&str> = data.field_names().collect();
    assert_eq!(names, vec!["extraCheese", "name", "pizzaUUID"]);
    assert_eq!(data.get("name"), Some(&FieldValue::Text("Alice".into())));
    assert_eq!(data.uuid("pizzaUUID"), Some(uuid));
    assert_eq!(data.boolean("extraCheese"), Some(true));
    assert_eq!(data.integer("quantity"), None);
}

#[test]
fn text_length_counts_characters() {
    let schema = Schema::new().field(
        "name",
        FieldRule::required(FieldKind::Text {
            min_len: 1,
            max_len: 3,
        }),
    );
    assert!(schema.validate(&form(&[("name", "äöü")])).is_ok());
    assert!(schema.validate(&form(&[("name", "äöüß")])).is_err());
}

#[test]
fn page_category_requires_a_name() {
    let errors = parse_form::<PageCategoryInput>(&form(&[
        ("_subject", "pageCategory"),
        ("name", ""),
    ]))
    .expect_err("empty name");
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["name"]);

    let input =
        parse_form::<PageCategoryInput>(&form(&[("name", "Desserts")])).expect("valid");
    assert_eq!(input.name, "Desserts");
}

#[test]
fn pizza_selection_parses_uuid() {
    let uuid = Uuid::new_v4();
    let uuid_text = uuid.to_string();
    let input = parse_form::<PizzaSelectionInput>(&form(&[("pizzaUUID", uuid_text.as_str())]))
        .expect("valid");
    assert_eq!(input.pizza_uuid, uuid);

    let errors = parse_form::<PizzaSelectionInput>(&form(&[("pizzaUUID", "42")]))
        .expect_err("invalid");
    assert_eq!(errors["pizzaUUID"], "Invalid uuid");
}

#[test]
fn schema_lists_fields_in_declaration_order() {
    let names: Vec<&str> = order_schema().field_names().collect();
    assert_eq!(names, vec!["name", "pizzaUUID", "quantity", "extraCheese"]);
}
