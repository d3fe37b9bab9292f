use serde::{Deserialize, Serialize};

/// A single catalog entry, loaded from the course CSV.
///
/// Numeric-looking columns stay as strings: the catalog file is the source
/// of truth and records are passed through to clients unchanged. Parsed
/// views of the counts are exposed through accessors, with unparseable
/// values treated as zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseRecord {
    #[serde(rename = "course_id")]
    pub id: String,
    #[serde(rename = "course_title")]
    pub title: String,
    /// Category label, compared case-sensitively.
    pub subject: String,
    pub level: String,
    /// Numeric string or the literal "Free".
    pub price: String,
    pub num_subscribers: String,
    pub num_reviews: String,
    #[serde(default)]
    pub num_lectures: String,
    #[serde(default)]
    pub content_duration: String,
}

impl CourseRecord {
    pub fn subscriber_count(&self) -> u64 {
        self.num_subscribers.trim().parse().unwrap_or(0)
    }

    pub fn review_count(&self) -> u64 {
        self.num_reviews.trim().parse().unwrap_or(0)
    }

    /// Popularity used for cold-start ranking: reviews weigh ten times
    /// as much as raw subscriber numbers.
    pub fn popularity(&self) -> u64 {
        self.subscriber_count() + 10 * self.review_count()
    }
}
