use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::report::ValuationReport;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

const SELECT_COLUMNS: &str =
    "id, fingerprint, email, name, attributes_json, result_json, created_at";

pub fn insert_report(db: &Database, report: &ValuationReport) -> Result<(), ServerError> {
    let attributes_json = serde_json::to_string(&report.attributes)
        .map_err(|e| ServerError::DbError(format!("Encode attributes: {e}")))?;
    let result_json = serde_json::to_string(&report.result)
        .map_err(|e| ServerError::DbError(format!("Encode result: {e}")))?;

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO valuation_reports (
                id, fingerprint, email, name,
                attributes_json, result_json, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                report.id,
                report.fingerprint,
                report.email,
                report.name,
                attributes_json,
                result_json,
                report.created_at,
            ],
        )?;
        Ok(())
    })
}

pub fn get_report(db: &Database, id: &str) -> Result<Option<ValuationReport>, ServerError> {
    db.with_conn(|conn| {
        let raw = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM valuation_reports WHERE id = ?1"),
                params![id],
                RawReport::from_row,
            )
            .optional()?;
        raw.map(RawReport::decode).transpose()
    })
}

/// Most recent report for the same attribute snapshot and contact.
pub fn find_report(
    db: &Database,
    fingerprint: &str,
    email: Option<&str>,
) -> Result<Option<ValuationReport>, ServerError> {
    db.with_conn(|conn| {
        let raw = conn
            .query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM valuation_reports
                     WHERE fingerprint = ?1 AND email IS ?2
                     ORDER BY created_at DESC
                     LIMIT 1"
                ),
                params![fingerprint, email],
                RawReport::from_row,
            )
            .optional()?;
        raw.map(RawReport::decode).transpose()
    })
}

/// All reports, newest first.
pub fn list_reports(db: &Database) -> Result<Vec<ValuationReport>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM valuation_reports ORDER BY created_at DESC"
        ))?;

        let rows = stmt.query_map([], RawReport::from_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?.decode()?);
        }
        Ok(out)
    })
}

/// Row as stored; JSON columns are decoded separately so a bad blob reports
/// as a database error instead of a panic.
struct RawReport {
    id: String,
    fingerprint: String,
    email: Option<String>,
    name: Option<String>,
    attributes_json: String,
    result_json: String,
    created_at: DateTime<Utc>,
}

impl RawReport {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            fingerprint: row.get(1)?,
            email: row.get(2)?,
            name: row.get(3)?,
            attributes_json: row.get(4)?,
            result_json: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn decode(self) -> Result<ValuationReport, ServerError> {
        let attributes = serde_json::from_str(&self.attributes_json).map_err(|e| {
            ServerError::DbError(format!("Report {} has bad attributes: {e}", self.id))
        })?;
        let result = serde_json::from_str(&self.result_json)
            .map_err(|e| ServerError::DbError(format!("Report {} has bad result: {e}", self.id)))?;

        Ok(ValuationReport {
            id: self.id,
            fingerprint: self.fingerprint,
            email: self.email,
            name: self.name,
            attributes,
            result,
            created_at: self.created_at,
        })
    }
}
