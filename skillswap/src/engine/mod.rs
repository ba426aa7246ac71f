//! Filter, rank and match computations over listing and rating snapshots.
//!
//! Everything here is pure: callers fetch snapshots from the store and pass
//! them in.

mod filter;
mod generation;
mod matching;
mod ratings;

pub use filter::{FilterKind, FilterTag, ListingFilter, StatusFilter};
pub use generation::{GenerationTicket, RequestGeneration};
pub use matching::{find_matches, rank_by_rating};
pub use ratings::{average_by_teacher, find_rating, summary_for};

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Listing, Rating, UserId};

/// Number of entries in the teacher leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

/// Outcome of a browse.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BrowseResult {
    /// Filtered listings, best-rated owners first.
    pub listings: Vec<Listing>,
    /// Listings complementary to the current user's own listings.
    pub matches: Vec<Listing>,
    /// Mean score per rated teacher, over every rating.
    pub averages: HashMap<UserId, f64>,
}

impl BrowseResult {
    /// Average of `owner`, 0 when unrated.
    pub fn average_for(&self, owner: &UserId) -> f64 {
        self.averages.get(owner).copied().unwrap_or(0.0)
    }

    /// The first `limit` listings whose owner has been rated.
    pub fn leaderboard(&self, limit: usize) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| self.averages.contains_key(&l.owner_id))
            .take(limit)
            .collect()
    }
}

/// Filter the listing snapshot, then rank and match.
pub fn browse(
    listings: Vec<Listing>,
    ratings: &[Rating],
    filter: &ListingFilter,
    current_user: Option<&UserId>,
) -> BrowseResult {
    let filtered = listings.into_iter().filter(|l| filter.matches(l)).collect();
    rank_and_match(filtered, ratings, current_user)
}

/// Rank already-filtered listings and compute matches.
///
/// Averages cover the whole rating set, not just the owners present in
/// `listings`.
pub fn rank_and_match(
    mut listings: Vec<Listing>,
    ratings: &[Rating],
    current_user: Option<&UserId>,
) -> BrowseResult {
    let averages = average_by_teacher(ratings);
    rank_by_rating(&mut listings, &averages);

    let matches = current_user
        .map(|user| find_matches(&listings, user))
        .unwrap_or_default();

    BrowseResult {
        listings,
        matches,
        averages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingId, RatingId, SkillStatus};
    use pretty_assertions::assert_eq;

    fn listing(id: &str, owner: &str, status: SkillStatus, skill: &str) -> Listing {
        Listing {
            id: ListingId::new(id),
            owner_id: owner.into(),
            status,
            skill_name: skill.into(),
            skill_name_lower: skill.to_lowercase(),
            description: String::new(),
            tags: vec![],
            author_name: owner.into(),
            author_name_lower: owner.to_lowercase(),
        }
    }

    fn rating(rater: &str, teacher: &str, score: i32) -> Rating {
        Rating {
            id: RatingId::new(format!("{}>{}", rater, teacher)),
            rater_id: rater.into(),
            teacher_id: teacher.into(),
            score,
        }
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    fn sample() -> Vec<Listing> {
        vec![
            listing("l1", "U1", SkillStatus::Teach, "Python"),
            listing("l2", "U2", SkillStatus::Learn, "python"),
            listing("l3", "U3", SkillStatus::Teach, "Guitar"),
            listing("l4", "U1", SkillStatus::Learn, "Guitar"),
        ]
    }

    #[test]
    fn test_browse_ranks_and_matches() {
        let ratings = vec![rating("U2", "U3", 5), rating("U1", "U3", 4), rating("U2", "U1", 2)];
        let result = browse(sample(), &ratings, &ListingFilter::new(), Some(&"U1".into()));

        assert_eq!(ids(&result.listings), vec!["l3", "l1", "l4", "l2"]);
        assert_eq!(ids(&result.matches), vec!["l2", "l3"]);
        assert_eq!(result.average_for(&"U3".into()), 4.5);
        assert_eq!(result.average_for(&"U2".into()), 0.0);
    }

    #[test]
    fn test_filter_limits_matches() {
        let filter = ListingFilter::new().skill("guitar");
        let result = browse(sample(), &[], &filter, Some(&"U1".into()));
        assert_eq!(ids(&result.listings), vec!["l3", "l4"]);
        assert_eq!(ids(&result.matches), vec!["l3"]);
    }

    #[test]
    fn test_averages_cover_filtered_out_teachers() {
        let ratings = vec![rating("U1", "U3", 5)];
        let filter = ListingFilter::new().skill("python");
        let result = browse(sample(), &ratings, &filter, None);
        assert!(result.averages.contains_key(&UserId::new("U3")));
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_empty_result() {
        let filter = ListingFilter::new().skill("cooking");
        let result = browse(sample(), &[], &filter, Some(&"U1".into()));
        assert!(result.listings.is_empty());
        assert!(result.matches.is_empty());
        assert!(result.averages.is_empty());
    }

    #[test]
    fn test_leaderboard_only_rated() {
        let ratings = vec![rating("U2", "U3", 5)];
        let result = browse(sample(), &ratings, &ListingFilter::new(), None);
        let board: Vec<_> = result
            .leaderboard(LEADERBOARD_SIZE)
            .into_iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(board, vec!["l3"]);
    }
}
