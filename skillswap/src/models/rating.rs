//! Teacher rating models.

use serde::{Deserialize, Serialize};

use super::{RatingId, UserId};

/// One rater's score for one teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Document ID.
    #[serde(default)]
    pub id: RatingId,
    /// User who gave the rating.
    #[serde(rename = "userUid")]
    pub rater_id: UserId,
    /// Teacher being rated.
    #[serde(rename = "teacherUid")]
    pub teacher_id: UserId,
    /// Score, 1 to 5 when entered through the star selector.
    #[serde(rename = "rating")]
    pub score: i32,
}

/// Average rating of a teacher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Arithmetic mean, 0 when there are no ratings.
    pub average: f64,
    /// Number of ratings.
    pub count: usize,
}

impl RatingSummary {
    /// Summarize a sequence of scores.
    pub fn from_scores<I: IntoIterator<Item = i32>>(scores: I) -> Self {
        let (sum, count) = scores
            .into_iter()
            .fold((0i64, 0usize), |(sum, count), s| (sum + s as i64, count + 1));

        if count == 0 {
            return Self::default();
        }

        Self {
            average: sum as f64 / count as f64,
            count,
        }
    }

    /// Whether anyone has rated.
    pub fn is_rated(&self) -> bool {
        self.count > 0
    }

    /// Average rounded to one decimal, for display.
    pub fn display_average(&self) -> String {
        format!("{:.1}", self.average)
    }
}
