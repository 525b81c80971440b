use crate::router::handle;
use crate::tests::utils::{body_json, get, post_json, test_state};
use serde_json::json;

fn building_response() -> String {
    json!({
        "direccion": {
            "valor": "CL ALCALA 120",
            "codigoPostal": "28009",
            "municipio": "MADRID",
            "provincia": "MADRID"
        },
        "inmuebles": [
            {
                "rc": {"pc1": "98", "pc2": "72023", "car": "VH", "cc1": "57", "cc2": "97"},
                "planta": "00",
                "puerta": "A",
                "uso": "C",
                "superficie": "120",
                "añoConstruccion": "1975"
            },
            {
                "referenciaCatastral": "9872023VH5797S0002YE",
                "planta": "03",
                "puerta": "B",
                "uso": "V",
                "superficie": "84,5",
                "añoConstruccion": "1975"
            }
        ]
    })
    .to_string()
}

#[test]
fn normalize_returns_the_canonical_record() {
    let state = test_state();
    let req = post_json(
        "/api/cadastral/normalize",
        json!({
            "referenciaCatastral": "9872023VH5797S0001WX",
            "direccion": {"valor": "CL MAYOR 1", "codigoPostal": "28013", "municipio": "MADRID"},
            "datosEconomicos": {"uso": "V", "superficieConstruida": "84,50", "añoConstruccion": 1964}
        })
        .to_string(),
    );

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["cadastralReference"], "9872023VH5797S0001WX");
    assert_eq!(body["postalCode"], "28013");
    assert_eq!(body["propertyType"], "Residencial");
    assert_eq!(body["surface"], 84.5);
    assert_eq!(body["constructionYear"], 1964);
    assert!(body.get("latitude").is_none());
}

#[test]
fn normalize_of_nothing_is_not_found() {
    let state = test_state();
    for body in ["", "null", "{}", "[]"] {
        let err = handle(post_json("/api/cadastral/normalize", body), &state).unwrap_err();
        assert_eq!(err.status(), 404, "body {body:?}");
    }
}

#[test]
fn units_are_listed_for_the_picker() {
    let state = test_state();
    let resp = handle(post_json("/api/cadastral/units", building_response()), &state)
        .expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    let units = body.as_array().unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0]["cadastralReference"], "9872023VH5797");
    assert_eq!(units[0]["floor"], "Bajo");
    assert_eq!(units[0]["icon"], "shop");
    assert_eq!(units[1]["floor"], "3º");
    assert_eq!(units[1]["surface"], 84.5);
}

#[test]
fn selected_unit_inherits_building_address() {
    let state = test_state();
    let resp = handle(post_json("/api/cadastral/units/1", building_response()), &state)
        .expect("Handler failed");

    let body = body_json(resp);
    assert_eq!(body["cadastralReference"], "9872023VH5797S0002YE");
    assert_eq!(body["address"], "CL ALCALA 120");
    assert_eq!(body["postalCode"], "28009");
    assert_eq!(body["buildingType"], "Plurifamiliar");
}

#[test]
fn unit_index_is_checked() {
    let state = test_state();
    let out_of_range = handle(post_json("/api/cadastral/units/7", building_response()), &state);
    assert_eq!(out_of_range.unwrap_err().status(), 404);

    let not_a_number = handle(post_json("/api/cadastral/units/first", building_response()), &state);
    assert_eq!(not_a_number.unwrap_err().status(), 400);
}

#[test]
fn unreachable_registry_yields_placeholder() {
    let state = test_state();
    let resp = handle(get("/api/cadastral/9872023VH5797S0001WX"), &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["kind"], "single");
    assert_eq!(body["data"]["cadastralReference"], "9872023VH5797S0001WX");
    assert_eq!(body["data"]["surface"], 100.0);
    assert_eq!(body["data"]["constructionYear"], 2000);
}

#[test]
fn malformed_reference_is_a_bad_request() {
    let state = test_state();
    let err = handle(get("/api/cadastral/ABC"), &state).unwrap_err();
    assert_eq!(err.status(), 400);
}
