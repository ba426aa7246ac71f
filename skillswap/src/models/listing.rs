//! Skill listing models.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use super::{ListingId, UserId};
use crate::error::Error;

/// Whether a listing offers to teach a skill or asks to learn it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillStatus {
    Teach,
    Learn,
}

impl SkillStatus {
    /// The complementary status a match must have.
    pub fn opposite(self) -> Self {
        match self {
            SkillStatus::Teach => SkillStatus::Learn,
            SkillStatus::Learn => SkillStatus::Teach,
        }
    }

    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillStatus::Teach => "Teach",
            SkillStatus::Learn => "Learn",
        }
    }
}

impl fmt::Display for SkillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "teach" => Ok(SkillStatus::Teach),
            "learn" => Ok(SkillStatus::Learn),
            other => Err(Error::InvalidArgument(format!(
                "unknown skill status '{}', expected Teach or Learn",
                other
            ))),
        }
    }
}

/// A single Teach-or-Learn skill entry owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Document ID.
    #[serde(default)]
    pub id: ListingId,
    /// Owning user.
    #[serde(rename = "uid")]
    pub owner_id: UserId,
    /// Teach or Learn.
    pub status: SkillStatus,
    /// Skill name as entered.
    #[serde(rename = "skill")]
    pub skill_name: String,
    /// Lowercase mirror of `skill_name`, used for equality queries.
    #[serde(rename = "skill_lower", default)]
    pub skill_name_lower: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Tags, without duplicates.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Owner's display name at submission time.
    #[serde(rename = "author", default)]
    pub author_name: String,
    /// Lowercase mirror of `author_name`, used for prefix range queries.
    #[serde(rename = "author_lower", default)]
    pub author_name_lower: String,
}

impl Listing {
    /// Case-insensitive skill name equality.
    pub fn same_skill(&self, other: &Listing) -> bool {
        self.skill_key() == other.skill_key()
    }

    /// Whether `other` is a match for this listing: same skill, opposite
    /// status, different owner.
    pub fn complements(&self, other: &Listing) -> bool {
        self.owner_id != other.owner_id
            && other.status == self.status.opposite()
            && self.same_skill(other)
    }

    /// Lowercased skill name, falling back to the display name when the
    /// stored mirror is missing.
    pub fn skill_key(&self) -> String {
        if self.skill_name_lower.is_empty() {
            self.skill_name.to_lowercase()
        } else {
            self.skill_name_lower.clone()
        }
    }

    /// Lowercased author name, with the same fallback as [`Listing::skill_key`].
    pub fn author_key(&self) -> String {
        if self.author_name_lower.is_empty() {
            self.author_name.to_lowercase()
        } else {
            self.author_name_lower.clone()
        }
    }
}

/// A skill submission, before the store has assigned an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub status: Option<SkillStatus>,
    pub skill_name: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl NewListing {
    /// Start a submission for the given skill.
    pub fn new(status: SkillStatus, skill_name: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            skill_name: skill_name.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Build the stored document for `owner`.
    pub(crate) fn into_fields(self, owner: &UserId, author: &str) -> crate::Result<Value> {
        let status = self
            .status
            .ok_or_else(|| Error::InvalidArgument("Skill status is required".into()))?;
        let skill = self.skill_name.trim();
        if skill.is_empty() {
            return Err(Error::InvalidArgument("Skill name cannot be empty".into()));
        }

        Ok(json!({
            "uid": owner,
            "status": status,
            "skill": skill,
            "skill_lower": skill.to_lowercase(),
            "description": self.description.trim(),
            "tags": normalize_tags(self.tags),
            "author": author,
            "author_lower": author.to_lowercase(),
        }))
    }
}

/// Owner edits to an existing listing. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingUpdate {
    pub status: Option<SkillStatus>,
    pub skill_name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl ListingUpdate {
    /// Check whether the update changes anything.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.skill_name.is_none()
            && self.description.is_none()
            && self.tags.is_none()
    }

    /// Merge fields for a partial write.
    pub(crate) fn into_fields(self) -> crate::Result<Value> {
        let mut fields = Map::new();

        if let Some(status) = self.status {
            fields.insert("status".into(), json!(status));
        }
        if let Some(skill) = self.skill_name {
            let skill = skill.trim();
            if skill.is_empty() {
                return Err(Error::InvalidArgument("Skill name cannot be empty".into()));
            }
            fields.insert("skill".into(), json!(skill));
            fields.insert("skill_lower".into(), json!(skill.to_lowercase()));
        }
        if let Some(description) = self.description {
            fields.insert("description".into(), json!(description.trim()));
        }
        if let Some(tags) = self.tags {
            fields.insert("tags".into(), json!(normalize_tags(tags)));
        }

        Ok(Value::Object(fields))
    }
}

/// Trim tags, drop empty ones and duplicates, keeping first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_owned());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn listing(owner: &str, status: SkillStatus, skill: &str) -> Listing {
        Listing {
            id: ListingId::new(format!("{}-{}", owner, skill)),
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

    #[test]
    fn test_status_parse() {
        assert_eq!("teach".parse::<SkillStatus>().unwrap(), SkillStatus::Teach);
        assert_eq!(" LEARN ".parse::<SkillStatus>().unwrap(), SkillStatus::Learn);
        assert!("both".parse::<SkillStatus>().is_err());
    }

    #[test]
    fn test_complements() {
        let teach = listing("u1", SkillStatus::Teach, "Python");
        let learn = listing("u2", SkillStatus::Learn, "python");
        let same_owner = listing("u1", SkillStatus::Learn, "python");
        let same_status = listing("u3", SkillStatus::Teach, "Python");

        assert!(teach.complements(&learn));
        assert!(learn.complements(&teach));
        assert!(!teach.complements(&same_owner));
        assert!(!teach.complements(&same_status));
    }

    #[test]
    fn test_deserialize_stored_fields() {
        let value = json!({
            "id": "abc",
            "uid": "u1",
            "status": "Teach",
            "skill": "Guitar",
            "skill_lower": "guitar",
            "description": "Acoustic basics",
            "tags": ["music"],
            "author": "Lakshmi",
            "author_lower": "lakshmi"
        });
        let listing: Listing = serde_json::from_value(value).unwrap();
        assert_eq!(listing.id.as_str(), "abc");
        assert_eq!(listing.owner_id.as_str(), "u1");
        assert_eq!(listing.skill_name, "Guitar");
        assert_eq!(listing.tags, vec!["music".to_string()]);
    }

    #[test]
    fn test_new_listing_fields() {
        let fields = NewListing::new(SkillStatus::Learn, "  Rust ")
            .description("ownership")
            .tag("systems")
            .tag(" systems ")
            .tag("")
            .into_fields(&UserId::new("u9"), "Divya")
            .unwrap();

        assert_eq!(fields["skill"], "Rust");
        assert_eq!(fields["skill_lower"], "rust");
        assert_eq!(fields["author_lower"], "divya");
        assert_eq!(fields["status"], "Learn");
        assert_eq!(fields["tags"], json!(["systems"]));
    }

    #[test]
    fn test_new_listing_requires_name() {
        let err = NewListing::new(SkillStatus::Teach, "   ")
            .into_fields(&UserId::new("u1"), "A")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_update_fields_recompute_lowercase() {
        let update = ListingUpdate {
            skill_name: Some("Go".into()),
            ..Default::default()
        };
        let fields = update.into_fields().unwrap();
        assert_eq!(fields, json!({"skill": "Go", "skill_lower": "go"}));
    }
}
