use crate::db::reports::{get_report, insert_report, list_reports};
use crate::domain::PropertyAttributes;
use crate::report::ValuationReport;
use chrono::{Datelike, Duration, Utc};
use crate::router::handle;
use crate::tests::utils::{body_json, get, post_json, test_state, test_state_with_failing_mailer};
use serde_json::{json, Value};

fn submission(email: Option<&str>) -> String {
    json!({
        "attributes": {
            "postalCode": "08008",
            "city": "Barcelona",
            "surface": 75,
            "constructionYear": 1980,
            "bedrooms": 2,
            "bathrooms": 1,
            "extras": ["Ascensor"]
        },
        "email": email,
        "name": "Marta"
    })
    .to_string()
}

#[test]
fn report_is_stored_and_retrievable() {
    let state = test_state();
    let resp = handle(post_json("/api/reports", submission(Some("Lead@Example.com"))), &state)
        .expect("Handler failed");
    assert_eq!(resp.status(), 201);

    let created = body_json(resp);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created["result"]["estimated"].as_i64().unwrap() > 0);
    assert_eq!(created["emailed"], false);

    let stored = get_report(&state.db, &id).unwrap().expect("report persisted");
    assert_eq!(stored.email.as_deref(), Some("lead@example.com"));
    assert_eq!(stored.name.as_deref(), Some("Marta"));

    let resp = handle(get(&format!("/api/reports/{id}")), &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let fetched = body_json(resp);
    assert_eq!(fetched["id"], id.as_str());
    assert_eq!(fetched["fingerprint"], created["fingerprint"]);
    assert_eq!(fetched["attributes"]["city"], "Barcelona");
    assert_eq!(fetched["result"], created["result"]);
}

#[test]
fn identical_resubmission_returns_the_stored_report() {
    let state = test_state();
    let first = body_json(
        handle(post_json("/api/reports", submission(Some("lead@example.com"))), &state)
            .expect("Handler failed"),
    );

    let resp = handle(post_json("/api/reports", submission(Some("LEAD@example.com"))), &state)
        .expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let second = body_json(resp);

    assert_eq!(first["id"], second["id"]);
    assert_eq!(list_reports(&state.db).unwrap().len(), 1);

    // A different contact gets a report of its own.
    handle(post_json("/api/reports", submission(None)), &state).expect("Handler failed");
    assert_eq!(list_reports(&state.db).unwrap().len(), 2);
}

#[test]
fn resubmission_in_a_new_year_is_valued_again() {
    let state = test_state();
    let attributes: PropertyAttributes =
        serde_json::from_value(json!({
            "postalCode": "08008",
            "city": "Barcelona",
            "surface": 75,
            "constructionYear": 1980,
            "bedrooms": 2,
            "bathrooms": 1,
            "extras": ["Ascensor"]
        }))
        .unwrap();

    let mut stale = ValuationReport::new(attributes, Some("lead@example.com".into()), None);
    stale.created_at = Utc::now() - Duration::days(366);
    assert!(stale.created_at.year() < Utc::now().year());
    insert_report(&state.db, &stale).unwrap();

    let resp = handle(post_json("/api/reports", submission(Some("lead@example.com"))), &state)
        .expect("Handler failed");
    assert_eq!(resp.status(), 201);
    let body = body_json(resp);
    assert_eq!(body["fingerprint"], stale.fingerprint.as_str());
    assert_ne!(body["id"], stale.id.as_str());
    assert_eq!(list_reports(&state.db).unwrap().len(), 2);

    // The fresh report is what later resubmissions get back.
    let again = handle(post_json("/api/reports", submission(Some("lead@example.com"))), &state)
        .expect("Handler failed");
    assert_eq!(again.status(), 200);
    assert_eq!(body_json(again)["id"], body["id"]);
}

#[test]
fn mail_failure_keeps_the_report() {
    let state = test_state_with_failing_mailer();
    let resp = handle(post_json("/api/reports", submission(Some("lead@example.com"))), &state)
        .expect("Handler failed");
    assert_eq!(resp.status(), 201);

    let body = body_json(resp);
    assert_eq!(body["emailed"], false);
    let id = body["id"].as_str().unwrap();
    assert!(get_report(&state.db, id).unwrap().is_some());
}

#[test]
fn implausible_email_is_rejected() {
    let state = test_state();
    let err = handle(post_json("/api/reports", submission(Some("not-an-email"))), &state)
        .unwrap_err();
    assert_eq!(err.status(), 400);
    assert!(list_reports(&state.db).unwrap().is_empty());
}

#[test]
fn missing_report_is_not_found() {
    let state = test_state();
    let err = handle(get("/api/reports/does-not-exist"), &state).unwrap_err();
    assert_eq!(err.status(), 404);
}

#[test]
fn spreadsheet_download_lists_reports() {
    let state = test_state();
    handle(post_json("/api/reports", submission(None)), &state).expect("Handler failed");

    let resp = handle(get("/reports.xlsx"), &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["Content-Type"].to_str().unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}

#[test]
fn report_without_body_values_the_empty_snapshot() {
    let state = test_state();
    let resp = handle(post_json("/api/reports", ""), &state).expect("Handler failed");
    let body: Value = body_json(resp);
    assert_eq!(body["result"]["estimated"], 200_000);
}
