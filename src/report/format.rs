// src/report/format.rs

/// Whole euros with Spanish digit grouping: `245000` -> `"245.000 €"`.
pub fn euros(amount: i64) -> String {
    format!("{} €", group_thousands(amount))
}

/// Price per m²: `3400` -> `"3.400 €/m²"`.
pub fn euros_per_m2(amount: i64) -> String {
    format!("{} €/m²", group_thousands(amount))
}

fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
