use maud::{html, Markup, DOCTYPE};

/// Transactional email shell. Inline styles only; mail clients drop
/// stylesheets.
pub fn email_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;" {
                div style="max-width: 600px; margin: 0 auto; padding: 20px;" {
                    (content)
                    hr style="margin-top: 30px; border: none; border-top: 1px solid #eee;";
                    p style="font-size: 0.8em; color: #999;" {
                        "Esta valoración es una estimación automática basada en los datos facilitados "
                        "y en precios de referencia por zona. No sustituye a una tasación oficial."
                    }
                }
            }
        }
    }
}
