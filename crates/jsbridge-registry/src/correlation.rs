// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Correlation id generation.
//
// Ids are `<millis base36>_<random base36>`. The time component keeps ids
// roughly ordered and makes cross-reload reuse unlikely; the 10-character
// random suffix (~51 bits) makes same-millisecond collisions negligible.

use chrono::Utc;
use jsbridge_core::types::CorrelationId;
use uuid::Uuid;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix in base-36 digits.
pub const SUFFIX_LEN: usize = 10;

/// 36^SUFFIX_LEN.
const SUFFIX_SPACE: u64 = 3_656_158_440_062_976;

/// Generate a fresh correlation id.
pub fn generate() -> CorrelationId {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let random = (Uuid::new_v4().as_u128() as u64) % SUFFIX_SPACE;

    let mut id = to_base36(millis);
    id.push('_');
    id.push_str(&pad_left(to_base36(random), SUFFIX_LEN));
    CorrelationId::new(id)
}

/// Render `value` in lowercase base 36.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Only ASCII digits were pushed.
    String::from_utf8_lossy(&digits).into_owned()
}

fn pad_left(digits: String, width: usize) -> String {
    if digits.len() >= width {
        digits
    } else {
        format!("{}{digits}", "0".repeat(width - digits.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn base36_rendering() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(SUFFIX_SPACE - 1), "z".repeat(SUFFIX_LEN));
    }

    #[test]
    fn id_has_time_and_random_parts() {
        let before = Utc::now().timestamp_millis() as u64;
        let id = generate();
        let after = Utc::now().timestamp_millis() as u64;

        let (time, suffix) = id.as_str().split_once('_').unwrap();
        let millis = u64::from_str_radix(time, 36).unwrap();
        assert!(millis >= before && millis <= after);
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn ids_do_not_collide() {
        let ids: HashSet<_> = (0..50_000).map(|_| generate()).collect();
        assert_eq!(ids.len(), 50_000);
    }
}
