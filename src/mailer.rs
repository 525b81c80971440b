// src/mailer.rs

use crate::config::MailConfig;
use crate::report::format::euros;
use crate::report::ValuationReport;
use crate::templates::valuation_report_email;
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error: {0}")]
    ApiError(String),
}

pub struct BrevoMailer {
    api_key: String,
    sender_email: String,
    sender_name: String,
    endpoint: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoContact<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoContact<'a>,
    to: Vec<BrevoContact<'a>>,
    subject: String,
    html_content: String,
}

impl BrevoMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
            endpoint: BREVO_SEND_URL.to_string(),
            client,
        })
    }

    /// Points the mailer at another Brevo-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn send_valuation_report(
        &self,
        recipient_email: &str,
        report: &ValuationReport,
    ) -> Result<(), MailerError> {
        let payload = BrevoPayload {
            sender: BrevoContact {
                name: Some(self.sender_name.as_str()),
                email: &self.sender_email,
            },
            to: vec![BrevoContact {
                name: report.name.as_deref(),
                email: recipient_email,
            }],
            subject: report_subject(report),
            html_content: valuation_report_email(report).into_string(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(MailerError::ApiError(format!("{status} - {error_body}")));
        }

        info!(report_id = %report.id, "valuation report emailed");
        Ok(())
    }
}

pub fn report_subject(report: &ValuationReport) -> String {
    format!(
        "Valoración de tu inmueble en {}: {}",
        report.location(),
        euros(report.result.estimated)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropertyAttributes;

    #[test]
    fn subject_names_location_and_estimate() {
        let attrs = PropertyAttributes {
            city: Some("Valencia".into()),
            ..Default::default()
        };
        let report = ValuationReport::new(attrs, None, None);
        let subject = report_subject(&report);
        assert!(subject.starts_with("Valoración de tu inmueble en Valencia: "));
        assert!(subject.ends_with(" €"));
    }

    #[test]
    fn payload_uses_brevo_field_names() {
        let payload = BrevoPayload {
            sender: BrevoContact {
                name: Some("Tasador"),
                email: "no-reply@tasador.es",
            },
            to: vec![BrevoContact {
                name: None,
                email: "lead@example.com",
            }],
            subject: "s".into(),
            html_content: "<p>x</p>".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["htmlContent"], "<p>x</p>");
        assert_eq!(json["to"][0]["email"], "lead@example.com");
        assert!(json["to"][0].get("name").is_none());
    }

    #[test]
    fn unreachable_endpoint_is_a_request_failure() {
        let mailer = BrevoMailer::new(&MailConfig {
            api_key: "k".into(),
            sender_email: "no-reply@tasador.es".into(),
            sender_name: "Tasador".into(),
        })
        .unwrap()
        .with_endpoint("http://127.0.0.1:9/v3/smtp/email");

        let report = ValuationReport::new(PropertyAttributes::default(), None, None);
        let err = mailer
            .send_valuation_report("lead@example.com", &report)
            .unwrap_err();
        assert!(matches!(err, MailerError::RequestFailed(_)));
    }
}
