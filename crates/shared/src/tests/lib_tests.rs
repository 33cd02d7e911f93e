use crate::{
    domain::{Capabilities, Requirement},
    error::{ApiError, ErrorCode, FieldErrors},
    protocol::{format_price, ActionData, PizzaPageView, Subject},
};

#[test]
fn capabilities_must_cover_every_required_flag() {
    let lab_only = Capabilities {
        lab: true,
        admin: false,
    };
    assert!(lab_only.satisfies(Requirement::LAB));
    assert!(lab_only.satisfies(Requirement {
        lab: false,
        admin: false,
    }));
    assert!(!lab_only.satisfies(Requirement::ADMIN));
    assert!(!Capabilities::default().satisfies(Requirement::LAB));
}

#[test]
fn subject_parses_only_known_discriminators() {
    assert_eq!(Subject::parse("pageCategory"), Some(Subject::PageCategory));
    assert_eq!(Subject::parse("page"), None);
    assert_eq!(Subject::PageCategory.as_str(), "pageCategory");
}

#[test]
fn validation_error_serializes_field_errors_in_camel_case() {
    let mut fields = FieldErrors::new();
    fields.insert("name".into(), "Required".into());
    let value = serde_json::to_value(ApiError::validation(fields)).expect("json");

    assert_eq!(value["code"], "validation");
    assert_eq!(value["fieldErrors"]["name"], "Required");
    assert!(value.get("formError").is_none());
    assert_eq!(ErrorCode::Validation.status(), 422);
}

#[test]
fn pizza_view_serializes_pizza_uuid_key() {
    let view = PizzaPageView {
        pizzas: Vec::new(),
        pizza_uuid: None,
        status: 200,
    };
    let value = serde_json::to_value(&view).expect("json");
    assert!(value.get("pizzaUUID").is_some());
}

#[test]
fn action_data_skips_empty_headers() {
    let value = serde_json::to_value(ActionData {
        status: 200,
        ..ActionData::default()
    })
    .expect("json");
    assert_eq!(value, serde_json::json!({ "status": 200 }));
}

#[test]
fn prices_render_in_euros() {
    assert_eq!(format_price(750), "7.50€");
    assert_eq!(format_price(1205), "12.05€");
    assert_eq!(format_price(0), "0.00€");
    assert_eq!(format_price(-50), "-0.50€");
}
