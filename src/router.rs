use crate::cadastral::{self, CadastralClient};
use crate::db::{find_report, get_report, insert_report, list_reports, Database};
use crate::domain::{PropertyAttributes, ValuationResult};
use crate::errors::ServerError;
use crate::mailer::BrevoMailer;
use crate::report::{is_plausible_email, ReportRequest, ValuationReport};
use crate::responses::{json_response, ResultResp};
use crate::spreadsheets::export_reports_xlsx;
use crate::valuation::{self, zones};
use astra::Request;
use chrono::Datelike;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Read;
use tracing::{info, warn};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Shared handles for every worker.
pub struct AppState {
    pub db: Database,
    pub registry: CadastralClient,
    pub mailer: Option<BrevoMailer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmittedReport<'a> {
    id: &'a str,
    fingerprint: &'a str,
    result: &'a ValuationResult,
    emailed: bool,
}

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["api", "valuation"]) => {
            let attrs: PropertyAttributes = read_json::<PropertyAttributes>(&mut req)?
                .unwrap_or_default();
            json_response(200, &valuation::valuate(&attrs))
        }

        ("POST", ["api", "cadastral", "normalize"]) => {
            let response = read_json::<Value>(&mut req)?.unwrap_or(Value::Null);
            let record = cadastral::normalize(&response).ok_or(ServerError::NotFound)?;
            json_response(200, &record)
        }

        ("POST", ["api", "cadastral", "units"]) => {
            let response = read_json::<Value>(&mut req)?.unwrap_or(Value::Null);
            json_response(200, &cadastral::building_units(&response))
        }

        ("POST", ["api", "cadastral", "units", index]) => {
            let index: usize = index
                .parse()
                .map_err(|_| ServerError::BadRequest(format!("Invalid unit index: {index}")))?;
            let response = read_json::<Value>(&mut req)?.unwrap_or(Value::Null);
            let record = cadastral::select_unit(&response, index).ok_or(ServerError::NotFound)?;
            json_response(200, &record)
        }

        ("GET", ["api", "cadastral", reference]) => {
            // Registry failures already fall back to a placeholder record.
            let lookup = state
                .registry
                .resolve(reference)
                .map_err(|e| ServerError::BadRequest(e.to_string()))?;
            json_response(200, &lookup)
        }

        ("GET", ["api", "zones"]) => json_response(
            200,
            &json!({ "defaults": zones::DEFAULTS, "zones": zones::ZONES }),
        ),

        ("POST", ["api", "reports"]) => {
            let request = read_json::<ReportRequest>(&mut req)?.unwrap_or_default();
            submit_report(request, state)
        }

        ("GET", ["api", "reports", id]) => {
            let report = get_report(&state.db, id)?.ok_or(ServerError::NotFound)?;
            json_response(200, &report)
        }

        ("GET", ["reports.xlsx"]) => {
            let reports = list_reports(&state.db)?;
            export_reports_xlsx(&reports)
        }

        _ => Err(ServerError::NotFound),
    }
}

/// Values, persists and optionally emails a report. An identical snapshot
/// from the same contact in the same calendar year returns the stored report
/// without mailing again; property age moves with the year, so an older
/// report is valued afresh.
fn submit_report(request: ReportRequest, state: &AppState) -> ResultResp {
    if let Some(email) = request.email.as_deref().filter(|e| !e.trim().is_empty()) {
        if !is_plausible_email(email) {
            return Err(ServerError::BadRequest(format!("Invalid email: {email}")));
        }
    }

    let fresh = ValuationReport::new(request.attributes, request.email, request.name);

    let (report, created) =
        match find_report(&state.db, &fresh.fingerprint, fresh.email.as_deref())?
            .filter(|existing| existing.created_at.year() == fresh.created_at.year())
        {
            Some(existing) => {
                info!(report_id = %existing.id, "returning stored report for resubmission");
                (existing, false)
            }
            None => {
                insert_report(&state.db, &fresh)?;
                info!(report_id = %fresh.id, estimated = fresh.result.estimated, "report stored");
                (fresh, true)
            }
        };

    let emailed = match (created, &state.mailer, report.email.as_deref()) {
        (true, Some(mailer), Some(to)) => match mailer.send_valuation_report(to, &report) {
            Ok(()) => true,
            Err(e) => {
                warn!(report_id = %report.id, error = %e, "report email failed");
                false
            }
        },
        _ => false,
    };

    let body = SubmittedReport {
        id: &report.id,
        fingerprint: &report.fingerprint,
        result: &report.result,
        emailed,
    };
    json_response(if created { 201 } else { 200 }, &body)
}

/// Reads and decodes a JSON body. An empty body decodes to `None`.
fn read_json<T: DeserializeOwned>(req: &mut Request) -> Result<Option<T>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read body: {e}")))?;

    if buf.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::PayloadTooLarge);
    }
    if buf.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&buf)
        .map(Some)
        .map_err(|e| ServerError::BadRequest(format!("Invalid JSON: {e}")))
}
