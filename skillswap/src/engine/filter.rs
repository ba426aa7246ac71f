//! Listing filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::models::{Listing, SkillStatus};
use crate::store::{prefix_bounds, Query};

/// Status selector of the browse view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Teach,
    Learn,
}

impl StatusFilter {
    /// The status to require, if any.
    pub fn status(self) -> Option<SkillStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Teach => Some(SkillStatus::Teach),
            StatusFilter::Learn => Some(SkillStatus::Learn),
        }
    }
}

impl From<SkillStatus> for StatusFilter {
    fn from(status: SkillStatus) -> Self {
        match status {
            SkillStatus::Teach => StatusFilter::Teach,
            SkillStatus::Learn => StatusFilter::Learn,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Teach => f.write_str("Teach"),
            StatusFilter::Learn => f.write_str("Learn"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<SkillStatus>().map(StatusFilter::from)
    }
}

/// Kind of an active filter tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Status,
    Skill,
    Author,
}

/// A non-default filter, shown as a removable tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterTag {
    pub kind: FilterKind,
    pub label: String,
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FilterKind::Status => "status",
            FilterKind::Skill => "skill",
            FilterKind::Author => "author",
        };
        write!(f, "{}: {}", kind, self.label)
    }
}

/// Browse filter: status, exact skill name, author name prefix.
///
/// Blank text filters are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilter {
    pub status: StatusFilter,
    pub skill_name: String,
    pub author_name: String,
}

impl ListingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn skill(mut self, skill_name: impl Into<String>) -> Self {
        self.skill_name = skill_name.into();
        self
    }

    pub fn author(mut self, author_prefix: impl Into<String>) -> Self {
        self.author_name = author_prefix.into();
        self
    }

    /// Lowercased skill term, `None` when blank.
    pub fn skill_term(&self) -> Option<String> {
        let term = self.skill_name.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }

    /// Lowercased author prefix, `None` when blank.
    pub fn author_prefix(&self) -> Option<String> {
        let term = self.author_name.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }

    /// Tags for every active filter, in status, skill, author order.
    pub fn active_tags(&self) -> Vec<FilterTag> {
        let mut tags = Vec::new();
        if self.status != StatusFilter::All {
            tags.push(FilterTag {
                kind: FilterKind::Status,
                label: self.status.to_string(),
            });
        }
        if self.skill_term().is_some() {
            tags.push(FilterTag {
                kind: FilterKind::Skill,
                label: self.skill_name.trim().to_owned(),
            });
        }
        if self.author_prefix().is_some() {
            tags.push(FilterTag {
                kind: FilterKind::Author,
                label: self.author_name.trim().to_owned(),
            });
        }
        tags
    }

    /// Check whether any filter is active.
    pub fn is_active(&self) -> bool {
        !self.active_tags().is_empty()
    }

    /// Reset every filter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check a listing against every active filter.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(status) = self.status.status() {
            if listing.status != status {
                return false;
            }
        }
        if let Some(skill) = self.skill_term() {
            if listing.skill_key() != skill {
                return false;
            }
        }
        if let Some(prefix) = self.author_prefix() {
            let (start, end) = prefix_bounds(&prefix);
            let author = listing.author_key();
            if author < start || author > end {
                return false;
            }
        }
        true
    }

    /// Translate into a store query over `collection`.
    pub fn to_query(&self, collection: &str) -> Query {
        let mut query = Query::collection(collection);
        if let Some(status) = self.status.status() {
            query = query.where_eq("status", status.as_str());
        }
        if let Some(skill) = self.skill_term() {
            query = query.where_eq("skill_lower", skill);
        }
        if let Some(prefix) = self.author_prefix() {
            query = query.prefix("author_lower", &prefix);
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn listing(author: &str, status: SkillStatus, skill: &str) -> Listing {
        Listing {
            id: ListingId::new(author),
            owner_id: author.into(),
            status,
            skill_name: skill.into(),
            skill_name_lower: skill.to_lowercase(),
            description: String::new(),
            tags: vec![],
            author_name: author.into(),
            author_name_lower: author.to_lowercase(),
        }
    }

    #[test]
    fn test_author_prefix_is_anchored() {
        let filter = ListingFilter::new().author("La");
        let kept: Vec<_> = ["Lakshmi", "Nagalakshmi", "Divya"]
            .iter()
            .map(|a| listing(a, SkillStatus::Teach, "Python"))
            .filter(|l| filter.matches(l))
            .map(|l| l.author_name)
            .collect();
        assert_eq!(kept, vec!["Lakshmi".to_string()]);
    }

    #[test]
    fn test_skill_is_case_insensitive_exact() {
        let filter = ListingFilter::new().skill("PYTHON");
        assert!(filter.matches(&listing("a", SkillStatus::Teach, "Python")));
        assert!(!filter.matches(&listing("a", SkillStatus::Teach, "Python 3")));
    }

    #[test]
    fn test_status_filter() {
        let filter = ListingFilter::new().status(StatusFilter::Learn);
        assert!(filter.matches(&listing("a", SkillStatus::Learn, "Go")));
        assert!(!filter.matches(&listing("a", SkillStatus::Teach, "Go")));
        assert!(ListingFilter::new().matches(&listing("a", SkillStatus::Teach, "Go")));
    }

    #[test]
    fn test_blank_terms_ignored() {
        let filter = ListingFilter::new().skill("   ").author("");
        assert!(!filter.is_active());
        assert!(filter.matches(&listing("a", SkillStatus::Teach, "Go")));
    }

    #[test]
    fn test_active_tags_and_clear() {
        let mut filter = ListingFilter::new()
            .status(StatusFilter::Teach)
            .skill(" Guitar ")
            .author("Di");
        let labels: Vec<_> = filter.active_tags().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["Teach", "Guitar", "Di"]);

        filter.clear();
        assert!(filter.active_tags().is_empty());
    }

    #[test]
    fn test_to_query() {
        let query = ListingFilter::new()
            .status(StatusFilter::Teach)
            .skill("Rust")
            .author("Ab")
            .to_query("Skills");
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            json!({
                "collection": "Skills",
                "where": [
                    {"field": "status", "value": "Teach"},
                    {"field": "skill_lower", "value": "rust"}
                ],
                "orderBy": "author_lower",
                "startAt": "ab",
                "endAt": "ab\u{f8ff}"
            })
        );
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("Teach".parse::<StatusFilter>().unwrap(), StatusFilter::Teach);
        assert!("none".parse::<StatusFilter>().is_err());
    }
}
