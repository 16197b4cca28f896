/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as a record ID.
///
/// Layout (53 bits, survives a round trip through a JavaScript number):
///   - 41 bits: milliseconds since 2024-01-01 UTC
///   - 12 bits: random
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF;
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000);
    (ts << 12) | rand_bits
}

/// Whole days elapsed between `from_millis` and `to_millis` (never negative)
pub fn whole_days_between(from_millis: i64, to_millis: i64) -> i64 {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    (to_millis - from_millis).max(0) / DAY_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_fits_in_js_safe_integer() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1_i64 << 53));
    }

    #[test]
    fn test_snowflake_ids_are_time_ordered() {
        let a = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(b > a);
    }

    #[test]
    fn test_whole_days_between() {
        let day = 24 * 60 * 60 * 1000;
        assert_eq!(whole_days_between(0, day - 1), 0);
        assert_eq!(whole_days_between(0, day), 1);
        assert_eq!(whole_days_between(0, 3 * day + 5), 3);
        assert_eq!(whole_days_between(10 * day, 0), 0);
    }
}
