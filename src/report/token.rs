// src/report/token.rs
use crate::domain::PropertyAttributes;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const REPORT_ID_BYTES: usize = 16;

/// Random report id from the OS RNG.
pub fn generate_report_id() -> String {
    let mut rng = OsRng;
    generate_id(&mut rng, REPORT_ID_BYTES)
}

/// URL-safe id from random bytes (base64, no padding).
pub fn generate_id<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64_url_nopad(&buf)
}

/// Stable identity of an attribute snapshot.
///
/// Extras are normalized first so that tag order, case and repeats don't
/// change the fingerprint.
pub fn fingerprint(attrs: &PropertyAttributes) -> String {
    let mut extras: Vec<String> = attrs
        .normalized_extras()
        .into_iter()
        .map(|e| e.to_lowercase())
        .collect();
    extras.sort();

    let canonical = PropertyAttributes {
        extras,
        ..attrs.clone()
    };
    // Plain data: serialization does not fail.
    let bytes = serde_json::to_vec(&canonical).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    base64_url_nopad(&hasher.finalize())
}

fn base64_url_nopad(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn report_id_is_url_safe_no_pad() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate_id(&mut rng, REPORT_ID_BYTES);

        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(id.len(), 22); // 16 bytes => 22 chars
    }

    #[test]
    fn report_ids_differ() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_ne!(generate_id(&mut rng, 16), generate_id(&mut rng, 16));
        assert_ne!(generate_report_id(), generate_report_id());
    }

    #[test]
    fn fingerprint_ignores_extras_order_and_case() {
        let a = PropertyAttributes {
            postal_code: Some("28014".into()),
            extras: vec!["Terraza".into(), "Piscina".into()],
            ..Default::default()
        };
        let b = PropertyAttributes {
            postal_code: Some("28014".into()),
            extras: vec!["piscina".into(), "TERRAZA".into(), "Piscina".into()],
            ..Default::default()
        };
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn fingerprint_changes_with_input() {
        let a = PropertyAttributes {
            surface: Some(80.0),
            ..Default::default()
        };
        let b = PropertyAttributes {
            surface: Some(81.0),
            ..Default::default()
        };
        assert_ne!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 43);
    }
}
