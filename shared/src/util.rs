//! Time and identifier utilities

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a receipt number: epoch milliseconds with a 3-digit random suffix.
///
/// Unique enough for a human-facing receipt at POS scale; collisions are a
/// known low-probability risk and are not engineered against. Assigned once
/// when an order is first persisted and never regenerated.
pub fn receipt_number() -> i64 {
    use rand::Rng;
    let suffix: i64 = rand::thread_rng().gen_range(0..1000);
    now_millis() * 1000 + suffix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_numbers_are_positive_and_mostly_distinct() {
        let a = receipt_number();
        let b = receipt_number();
        assert!(a > 0);
        assert!(b > 0);
        // Same millisecond is possible; identical suffix in the same
        // millisecond is the accepted 1-in-1000 collision window.
        assert!(a / 1000 <= b / 1000);
    }

    #[test]
    fn receipt_number_embeds_the_timestamp() {
        let before = now_millis();
        let receipt = receipt_number();
        let after = now_millis();
        let ts = receipt / 1000;
        assert!(ts >= before && ts <= after);
    }
}
