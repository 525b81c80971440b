use crate::errors::ServerError;
use crate::report::ValuationReport;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Format, Workbook};

const HEADERS: [&str; 11] = [
    "Id",
    "Fecha",
    "Código postal",
    "Municipio",
    "Superficie (m²)",
    "Conservador (€)",
    "Estimado (€)",
    "Optimista (€)",
    "Precio €/m²",
    "Confianza (%)",
    "Email",
];

pub fn export_reports_xlsx(reports: &[ValuationReport]) -> ResultResp {
    let buffer = reports_workbook(reports)?;
    xlsx_response(buffer, "valoraciones.xlsx")
}

/// One row per stored report, newest first as given.
pub fn reports_workbook(reports: &[ValuationReport]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| xlsx_err(&format!("header '{header}'"), e))?;
    }

    for (i, report) in reports.iter().enumerate() {
        let r = (i + 1) as u32;
        let attrs = &report.attributes;
        let result = &report.result;

        worksheet
            .write_string(r, 0, &report.id)
            .map_err(|e| xlsx_err("id", e))?;

        worksheet
            .write_string(r, 1, report.created_at.format("%Y-%m-%d %H:%M").to_string())
            .map_err(|e| xlsx_err("date", e))?;

        worksheet
            .write_string(r, 2, attrs.postal_code.as_deref().unwrap_or(""))
            .map_err(|e| xlsx_err("postal code", e))?;

        worksheet
            .write_string(r, 3, attrs.city.as_deref().unwrap_or(""))
            .map_err(|e| xlsx_err("city", e))?;

        if let Some(surface) = attrs.usable_surface() {
            worksheet
                .write_number(r, 4, surface)
                .map_err(|e| xlsx_err("surface", e))?;
        }

        let amounts = [
            result.conservative,
            result.estimated,
            result.optimistic,
            result.price_per_area,
        ];
        for (offset, amount) in amounts.into_iter().enumerate() {
            worksheet
                .write_number(r, 5 + offset as u16, amount as f64)
                .map_err(|e| xlsx_err("amount", e))?;
        }

        worksheet
            .write_number(r, 9, f64::from(result.confidence))
            .map_err(|e| xlsx_err("confidence", e))?;

        worksheet
            .write_string(r, 10, report.email.as_deref().unwrap_or(""))
            .map_err(|e| xlsx_err("email", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| xlsx_err("workbook", e))
}

fn xlsx_err(what: &str, e: rust_xlsxwriter::XlsxError) -> ServerError {
    ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}
