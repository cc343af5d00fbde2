//! Property tests for the value codec.

use proptest::prelude::*;

use tsledger_core::codec::{decode, decode_timestamp, encode, encode_timestamp};
use tsledger_core::models::{SeriesValue, ValueKind};

proptest! {
    #[test]
    fn prop_finite_numeric_round_trips_exactly(v in proptest::num::f64::NORMAL | proptest::num::f64::ZERO | proptest::num::f64::SUBNORMAL) {
        let text = encode(&SeriesValue::Numeric(v));
        let back = decode(&text, ValueKind::Numeric).unwrap();
        prop_assert_eq!(back.as_numeric().unwrap().to_bits(), v.to_bits());
    }

    #[test]
    fn prop_text_round_trips_byte_identical(s in ".*") {
        let text = encode(&SeriesValue::Text(s.clone()));
        let back = decode(&text, ValueKind::Text).unwrap();
        prop_assert_eq!(back.as_text().unwrap(), s.as_str());
    }

    #[test]
    fn prop_timestamp_text_preserves_order(a in 0i64..4_000_000_000, b in 0i64..4_000_000_000, ua in 0u32..1_000_000, ub in 0u32..1_000_000) {
        use chrono::{TimeZone, Utc};
        let ta = Utc.timestamp_opt(a, ua * 1000).unwrap();
        let tb = Utc.timestamp_opt(b, ub * 1000).unwrap();
        let (ea, eb) = (encode_timestamp(ta).unwrap(), encode_timestamp(tb).unwrap());
        prop_assert_eq!(ta.cmp(&tb), ea.cmp(&eb));
        prop_assert_eq!(decode_timestamp(&ea).unwrap(), ta);
    }
}
