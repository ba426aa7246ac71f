//! Rating aggregation.

use std::collections::HashMap;

use crate::models::{Rating, RatingSummary, UserId};

/// Mean score per rated teacher. Teachers without ratings have no entry.
pub fn average_by_teacher(ratings: &[Rating]) -> HashMap<UserId, f64> {
    let mut totals: HashMap<&UserId, (i64, usize)> = HashMap::new();
    for rating in ratings {
        let entry = totals.entry(&rating.teacher_id).or_insert((0, 0));
        entry.0 += rating.score as i64;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(teacher, (sum, count))| (teacher.clone(), sum as f64 / count as f64))
        .collect()
}

/// Summary for one teacher.
pub fn summary_for(ratings: &[Rating], teacher: &UserId) -> RatingSummary {
    RatingSummary::from_scores(
        ratings
            .iter()
            .filter(|r| &r.teacher_id == teacher)
            .map(|r| r.score),
    )
}

/// The existing rating `rater` gave `teacher`, if any.
pub fn find_rating<'a>(ratings: &'a [Rating], rater: &UserId, teacher: &UserId) -> Option<&'a Rating> {
    ratings
        .iter()
        .find(|r| &r.rater_id == rater && &r.teacher_id == teacher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RatingId;

    fn rating(rater: &str, teacher: &str, score: i32) -> Rating {
        Rating {
            id: RatingId::new(format!("{}-{}", rater, teacher)),
            rater_id: rater.into(),
            teacher_id: teacher.into(),
            score,
        }
    }

    #[test]
    fn test_average_by_teacher() {
        let ratings = vec![
            rating("a", "t", 5),
            rating("b", "t", 3),
            rating("c", "t", 4),
            rating("a", "s", 2),
        ];
        let averages = average_by_teacher(&ratings);
        assert_eq!(averages.get(&UserId::new("t")), Some(&4.0));
        assert_eq!(averages.get(&UserId::new("s")), Some(&2.0));
        assert_eq!(averages.len(), 2);
    }

    #[test]
    fn test_no_ratings() {
        assert!(average_by_teacher(&[]).is_empty());
        assert_eq!(summary_for(&[], &UserId::new("t")).average, 0.0);
    }

    #[test]
    fn test_find_rating() {
        let ratings = vec![rating("a", "t", 5), rating("b", "t", 3)];
        let found = find_rating(&ratings, &"b".into(), &"t".into()).unwrap();
        assert_eq!(found.score, 3);
        assert!(find_rating(&ratings, &"a".into(), &"x".into()).is_none());
    }
}
