//! Kani Arbitrary implementations and proof harnesses for property verification.
//!
//! # Usage
//!
//! Kani is not a Cargo dependency. Install and run with:
//!
//! ```bash
//! cargo install --locked kani-verifier
//! cargo kani setup
//! cargo kani --features kani
//! ```
//!
//! This module is only compiled when using Kani (`#[cfg(kani)]`).

use crate::split::{non_quoted_index_of, non_quoted_split};
use crate::{GeoLocation, PhoneExtra, PhoneNumber};

/// Characters that exercise the quote and escape handling of the splitters
const SPLIT_CHARS: &[u8] = b"a;,=\"\\";

/// Generate a short string over `SPLIT_CHARS`
fn arbitrary_split_text() -> String {
    let len: usize = kani::any();
    let len = len % 6;
    (0..len)
        .map(|_| {
            let idx: usize = kani::any();
            SPLIT_CHARS[idx % SPLIT_CHARS.len()] as char
        })
        .collect()
}

impl kani::Arbitrary for GeoLocation {
    fn any() -> Self {
        let lat: i8 = kani::any();
        let lon: i16 = kani::any();
        kani::assume((-90..=90).contains(&lat));
        kani::assume((-180..=180).contains(&lon));
        GeoLocation::new(f64::from(lat), f64::from(lon)).expect("in range by construction")
    }
}

impl kani::Arbitrary for PhoneNumber {
    fn any() -> Self {
        let phone = PhoneNumber::new("+1202", None).expect("global number");
        match kani::any::<u8>() % 3 {
            0 => phone,
            1 => phone.with_extension("1"),
            _ => phone.with_isdn_sub_address("2"),
        }
    }
}

// ============================================================================
// Kani Proof Harnesses
// ============================================================================

/// Proof: A location at a pole always has longitude 0
#[kani::proof]
#[kani::unwind(5)]
fn proof_pole_longitude_is_zero() {
    let mut geo: GeoLocation = kani::any();
    let pole: bool = kani::any();
    geo.set_latitude(if pole { 90.0 } else { -90.0 })
        .expect("pole is in range");
    let lon: i16 = kani::any();
    kani::assume((-180..=180).contains(&lon));
    let _ = geo.set_longitude(f64::from(lon));
    assert!(geo.longitude() == 0.0);
}

/// Proof: Extension and subaddress are never both set
#[kani::proof]
#[kani::unwind(5)]
fn proof_extension_excludes_subaddress() {
    let mut phone: PhoneNumber = kani::any();
    if kani::any() {
        phone.set_extension(Some("9"));
    } else {
        phone.set_isdn_sub_address(Some("8"));
    }
    assert!(!(phone.extension().is_some() && phone.isdn_sub_address().is_some()));
    assert!(matches!(
        phone.extra(),
        PhoneExtra::Extension(_) | PhoneExtra::IsdnSubAddress(_)
    ));
}

/// Proof: An index returned by the quote-aware search is in bounds and on the
/// searched character
#[kani::proof]
#[kani::unwind(8)]
fn proof_index_of_in_bounds() {
    let text = arbitrary_split_text();
    if let Some(i) = non_quoted_index_of(&text, ';', 0) {
        assert!(i < text.len());
        assert_eq!(text.as_bytes()[i], b';');
    }
}

/// Proof: Splitting never loses characters other than separators
#[kani::proof]
#[kani::unwind(8)]
fn proof_split_preserves_length() {
    let text = arbitrary_split_text();
    let parts = non_quoted_split(&text, &[';'], false);
    let joined: usize = parts.iter().map(|p| p.len()).sum();
    assert_eq!(joined + parts.len() - 1, text.len());
}
