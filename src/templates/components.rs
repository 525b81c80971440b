use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" style="border: 1px solid #e5e7eb; border-radius: 8px; padding: 16px 20px; margin: 16px 0;" {
            h2 style="font-size: 1.1em; margin: 0 0 12px;" { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// One labelled row of the estimate table.
pub fn amount_row(label: &str, value: &str, emphasis: bool) -> Markup {
    let weight = if emphasis { "bold" } else { "normal" };
    html! {
        tr {
            td style="padding: 6px 0; color: #555;" { (label) }
            td style={ "padding: 6px 0; text-align: right; font-weight: " (weight) ";" } { (value) }
        }
    }
}
