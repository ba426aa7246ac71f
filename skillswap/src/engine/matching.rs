//! Rating order and complementary skill matches.

use std::collections::HashMap;

use crate::models::{Listing, UserId};

/// Stable sort, best-rated owners first. Unrated owners count as 0.
pub fn rank_by_rating(listings: &mut [Listing], averages: &HashMap<UserId, f64>) {
    let score = |l: &Listing| averages.get(&l.owner_id).copied().unwrap_or(0.0);
    listings.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

/// Every listing complementary to one of `user`'s own listings.
///
/// For each own listing, in order, the whole set is scanned for listings by
/// other owners with the same skill and the opposite status. A listing that
/// complements several own listings appears once per own listing.
pub fn find_matches(listings: &[Listing], user: &UserId) -> Vec<Listing> {
    listings
        .iter()
        .filter(|own| &own.owner_id == user)
        .flat_map(|own| listings.iter().filter(move |other| own.complements(other)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingId, SkillStatus};
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

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_match_complementary_listings() {
        let listings = vec![
            listing("l1", "U1", SkillStatus::Teach, "Python"),
            listing("l2", "U2", SkillStatus::Learn, "python"),
            listing("l3", "U3", SkillStatus::Teach, "Guitar"),
        ];
        let matches = find_matches(&listings, &"U1".into());
        assert_eq!(ids(&matches), vec!["l2"]);
    }

    #[test]
    fn test_matches_repeat_per_own_listing() {
        let listings = vec![
            listing("a", "me", SkillStatus::Learn, "Chess"),
            listing("b", "me", SkillStatus::Learn, "chess"),
            listing("c", "them", SkillStatus::Teach, "CHESS"),
        ];
        let matches = find_matches(&listings, &"me".into());
        assert_eq!(ids(&matches), vec!["c", "c"]);
    }

    #[test]
    fn test_no_own_listings() {
        let listings = vec![listing("a", "x", SkillStatus::Teach, "Go")];
        assert!(find_matches(&listings, &"me".into()).is_empty());
    }

    #[test]
    fn test_rank_is_stable() {
        let mut listings = vec![
            listing("a", "u1", SkillStatus::Teach, "A"),
            listing("b", "u2", SkillStatus::Teach, "B"),
            listing("c", "u3", SkillStatus::Teach, "C"),
            listing("d", "u1", SkillStatus::Teach, "D"),
        ];
        let averages: HashMap<UserId, f64> =
            [(UserId::new("u2"), 4.5), (UserId::new("u3"), 2.0)].into_iter().collect();

        rank_by_rating(&mut listings, &averages);
        assert_eq!(ids(&listings), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_rank_without_ratings_keeps_order() {
        let mut listings = vec![
            listing("z", "u1", SkillStatus::Learn, "A"),
            listing("y", "u2", SkillStatus::Teach, "B"),
        ];
        rank_by_rating(&mut listings, &HashMap::new());
        assert_eq!(ids(&listings), vec!["z", "y"]);
    }
}
