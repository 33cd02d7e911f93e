use super::*;
use serde_json::json;
use shared::error::FieldErrors;

#[test]
fn status_defaults_to_ok() {
    let responded = respond(&json!({ "pizzas": [] })).expect("respond");
    assert_eq!(responded.status, 200);
    assert_eq!(responded.body, json!({ "pizzas": [], "status": 200 }));
    assert!(responded.headers.is_empty());
}

#[test]
fn headers_are_lifted_out_of_the_body() {
    let responded = respond(&json!({
        "headers": { "Set-Cookie": "session=abc; Path=/" },
        "status": 201,
    }))
    .expect("respond");

    assert_eq!(responded.status, 201);
    assert_eq!(responded.body, json!({ "status": 201 }));
    assert_eq!(responded.header("set-cookie"), Some("session=abc; Path=/"));
}

#[test]
fn non_object_data_is_wrapped() {
    let responded = respond(&vec![1, 2]).expect("respond");
    assert_eq!(responded.body, json!({ "data": [1, 2], "status": 200 }));
}

#[test]
fn errors_share_the_envelope() {
    let mut fields = FieldErrors::new();
    fields.insert("name".into(), "Required".into());
    let responded = respond_error(&ApiError::validation(fields));

    assert_eq!(responded.status, 422);
    assert_eq!(responded.body["status"], 422);
    assert_eq!(responded.body["fieldErrors"]["name"], "Required");
}

#[test]
fn compose_routes_err_through_error_envelope() {
    let ok = compose::<serde_json::Value>(Ok(json!({ "status": 200 })));
    assert_eq!(ok.status, 200);

    let err = compose::<serde_json::Value>(Err(ApiError::form(
        ErrorCode::Conflict,
        "A category with this name already exists.",
    )));
    assert_eq!(err.status, 409);
    assert_eq!(
        err.body["formError"],
        "A category with this name already exists."
    );
}

#[test]
fn unusable_status_is_replaced_in_body_and_response() {
    for raw in [json!(1000), json!(42), json!("teapot")] {
        let responded = respond(&json!({ "status": raw })).expect("respond");
        assert_eq!(responded.status, 500);
        assert_eq!(responded.body["status"], 500);
    }
}
