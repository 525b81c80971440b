use crate::report::format::{euros, euros_per_m2};
use crate::report::ValuationReport;
use crate::templates::components::{amount_row, card};
use crate::templates::email_layout;
use maud::{html, Markup};

pub fn valuation_report_email(report: &ValuationReport) -> Markup {
    let attrs = &report.attributes;
    let result = &report.result;
    let greeting = match report.name.as_deref() {
        Some(name) => format!("Hola, {name}:"),
        None => "Hola:".to_string(),
    };

    email_layout(
        "Tu valoración",
        html! {
            h1 style="font-size: 1.4em;" { "Tu valoración está lista" }
            p { (greeting) }
            p { "Hemos estimado el valor de mercado de tu inmueble en " strong { (report.location()) } "." }

            (card("Valor estimado", html! {
                table style="width: 100%; border-collapse: collapse;" {
                    (amount_row("Conservador", &euros(result.conservative), false))
                    (amount_row("Estimado", &euros(result.estimated), true))
                    (amount_row("Optimista", &euros(result.optimistic), false))
                    (amount_row("Precio por m²", &euros_per_m2(result.price_per_area), false))
                }
            }))

            (card("Datos utilizados", html! {
                ul style="padding-left: 18px; margin: 0;" {
                    @if let Some(reference) = &attrs.cadastral_reference {
                        li { "Referencia catastral: " (reference) }
                    }
                    @if let Some(surface) = attrs.usable_surface() {
                        li { "Superficie: " (format!("{surface:.0}")) " m²" }
                    }
                    @if let Some(year) = attrs.construction_year {
                        li { "Año de construcción: " (year) }
                    }
                    @if let Some(bedrooms) = attrs.bedrooms {
                        li { "Dormitorios: " (bedrooms) }
                    }
                    @if let Some(bathrooms) = attrs.bathrooms {
                        li { "Baños: " (bathrooms) }
                    }
                    @if !attrs.extras.is_empty() {
                        li { "Extras: " (attrs.extras.join(", ")) }
                    }
                }
            }))

            p style="font-size: 0.9em; color: #666;" {
                "Fiabilidad de la estimación: " strong { (result.confidence) "%" }
            }
            p style="font-size: 0.8em; color: #999;" { "Referencia del informe: " (report.id) }
        },
    )
}
