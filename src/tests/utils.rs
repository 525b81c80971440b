use crate::cadastral::CadastralClient;
use crate::config::{CatastroConfig, MailConfig};
use crate::db::connection::{init_db, Database};
use crate::mailer::BrevoMailer;
use crate::router::AppState;
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// Port 9 (discard) is closed on test machines, so outbound calls fail fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

static NEXT_DB: AtomicU32 = AtomicU32::new(0);

/// Fresh temp-file database with the production schema applied.
pub fn init_test_db() -> Database {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "tasador_test_{}_{nanos}_{}.sqlite",
        std::process::id(),
        NEXT_DB.fetch_add(1, Ordering::SeqCst)
    ));

    let db = Database::new(path.to_string_lossy());
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

fn offline_registry() -> CadastralClient {
    CadastralClient::new(&CatastroConfig {
        base_url: format!("{UNREACHABLE}/catastro"),
        api_key: None,
        timeout: Duration::from_secs(2),
        max_attempts: 1,
    })
    .expect("Failed to build registry client")
}

/// App state with an offline registry and no mailer.
pub fn test_state() -> AppState {
    AppState {
        db: init_test_db(),
        registry: offline_registry(),
        mailer: None,
    }
}

/// App state whose mailer points at a closed port.
pub fn test_state_with_failing_mailer() -> AppState {
    let mailer = BrevoMailer::new(&MailConfig {
        api_key: "test-key".into(),
        sender_email: "tasaciones@tasador.es".into(),
        sender_name: "Tasador".into(),
    })
    .expect("Failed to build mailer")
    .with_endpoint(format!("{UNREACHABLE}/v3/smtp/email"));

    AppState {
        mailer: Some(mailer),
        ..test_state()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp)).expect("response is not JSON")
}
