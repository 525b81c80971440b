use crate::domain::{FinishQuality, PropertyAttributes};
use crate::router::{handle, MAX_BODY_BYTES};
use crate::tests::utils::{body_json, get, post_json, test_state};
use crate::valuation::valuate;
use serde_json::json;

#[test]
fn valuation_endpoint_returns_the_band() {
    let state = test_state();
    let req = post_json(
        "/api/valuation",
        json!({
            "postalCode": "28014",
            "city": "Madrid",
            "surface": 90,
            "constructionYear": 1995,
            "bedrooms": 3,
            "bathrooms": 2,
            "extras": ["Ascensor", "Terraza"],
            "finishQuality": "good"
        })
        .to_string(),
    );

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let expected = valuate(&PropertyAttributes {
        postal_code: Some("28014".into()),
        city: Some("Madrid".into()),
        surface: Some(90.0),
        construction_year: Some(1995),
        bedrooms: Some(3),
        bathrooms: Some(2),
        extras: vec!["Ascensor".into(), "Terraza".into()],
        finish_quality: Some(FinishQuality::Good),
        ..Default::default()
    });
    assert_eq!(body_json(resp), serde_json::to_value(expected).unwrap());
}

#[test]
fn sloppy_wizard_input_is_accepted() {
    let state = test_state();
    let req = post_json(
        "/api/valuation",
        r#"{"postalCode": "46001", "surface": "85,5", "bedrooms": "dos", "finishQuality": "palace"}"#,
    );

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let expected = valuate(&PropertyAttributes {
        postal_code: Some("46001".into()),
        surface: Some(85.5),
        ..Default::default()
    });
    assert_eq!(body_json(resp)["estimated"], expected.estimated);
}

#[test]
fn numeric_postal_code_keeps_its_zone() {
    let state = test_state();
    let resp = handle(
        post_json("/api/valuation", r#"{"postalCode": 8008, "surface": 100}"#),
        &state,
    )
    .expect("Handler failed");

    let body = body_json(resp);
    assert_eq!(body["pricePerArea"], 5_600);
}

#[test]
fn empty_body_values_the_empty_snapshot() {
    let state = test_state();
    let resp = handle(post_json("/api/valuation", ""), &state).expect("Handler failed");
    let body = body_json(resp);
    assert_eq!(body["estimated"], 200_000);
    assert_eq!(body["conservative"], 180_000);
    assert_eq!(body["optimistic"], 220_000);
    assert_eq!(body["confidence"], 50);
}

#[test]
fn malformed_json_is_a_bad_request() {
    let state = test_state();
    let err = handle(post_json("/api/valuation", "{not json"), &state).unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn oversized_body_is_rejected() {
    let state = test_state();
    let padding = " ".repeat(MAX_BODY_BYTES as usize);
    let err = handle(post_json("/api/valuation", format!("{{}}{padding}")), &state).unwrap_err();
    assert_eq!(err.status(), 413);
}

#[test]
fn zones_endpoint_lists_table_and_defaults() {
    let state = test_state();
    let resp = handle(get("/api/zones"), &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["defaults"]["countryAverage"], 2000.0);
    assert!(body["defaults"]["coastalPremium"].is_number());

    let zones = body["zones"].as_array().unwrap();
    assert!(zones
        .iter()
        .any(|z| z["postalCode"] == "28014" && z["city"] == "Madrid"));
}

#[test]
fn unknown_route_is_not_found() {
    let state = test_state();
    assert_eq!(handle(get("/nope"), &state).unwrap_err().status(), 404);
    assert_eq!(handle(get("/"), &state).unwrap_err().status(), 404);
    assert_eq!(
        handle(post_json("/api/zones", "{}"), &state)
            .unwrap_err()
            .status(),
        404
    );
}
