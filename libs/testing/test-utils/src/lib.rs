//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: deterministic test data generation (always available)
//! - `assertions`: custom assertion helpers (always available)
//!
//! # Features
//!
//! - `mongo` (default): enables MongoDB test infrastructure
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestMongo, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let db = mongo.database(&builder.name("db", "main"));
//!     let title = builder.name("event", "launch");
//! }
//! ```

use chrono::{Days, NaiveDate, SecondsFormat};

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// Tests stay reproducible because every value derives from the seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is the hash of the name)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_event");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(12345);
    /// assert_eq!(builder.name("event", "main"), "test-event-12345-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Idempotency token unique to this seed and `suffix`
    pub fn request_id(&self, suffix: &str) -> String {
        format!("req-{:016x}-{}", self.seed, suffix)
    }

    /// RFC 3339 UTC timestamp at 09:00 on a seed-derived day, `day_offset` days later
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(0);
    /// assert_eq!(builder.date(0), "2030-01-01T09:00:00Z");
    /// assert_eq!(builder.date(2), "2030-01-03T09:00:00Z");
    /// ```
    pub fn date(&self, day_offset: u32) -> String {
        let days = self.seed % 300 + u64::from(day_offset);

        NaiveDate::from_ymd_opt(2030, 1, 1)
            .and_then(|base| base.checked_add_days(Days::new(days)))
            .and_then(|day| day.and_hms_opt(9, 0, 0))
            .expect("test date out of range")
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Test assertion helpers
pub mod assertions {
    use std::collections::HashSet;
    use std::fmt::Debug;
    use std::hash::Hash;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that no two items are equal
    pub fn assert_all_distinct<T: Eq + Hash + Debug>(items: &[T], context: &str) {
        let mut seen = HashSet::new();
        for item in items {
            assert!(seen.insert(item), "{}: duplicate value {:?}", context, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.request_id("a"), builder2.request_id("a"));
        assert_eq!(builder1.name("event", "test"), builder2.name("event", "test"));
        assert_eq!(builder1.date(3), builder2.date(3));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.request_id("a"), builder2.request_id("a"));
    }

    #[test]
    fn test_date_rolls_over_month_and_year_ends() {
        let builder = TestDataBuilder::new(0);
        assert_eq!(builder.date(58), "2030-02-28T09:00:00Z");
        assert_eq!(builder.date(59), "2030-03-01T09:00:00Z");

        let late = TestDataBuilder::new(299);
        assert_eq!(late.date(65), "2030-12-31T09:00:00Z");
        assert_eq!(late.date(66), "2031-01-01T09:00:00Z");
        assert_eq!(late.date(66 + 424), "2032-02-29T09:00:00Z");
    }

    #[test]
    #[should_panic(expected = "ids: duplicate value")]
    fn test_assert_all_distinct_detects_duplicates() {
        assertions::assert_all_distinct(&["a", "b", "a"], "ids");
    }
}
