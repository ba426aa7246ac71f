//! Seed data for offline mode.

use serde_json::json;
use skillswap::{store::DocumentStore, MemoryStore, Result};

const LISTINGS: &[(&str, &str, &str, &str, &str, &[&str])] = &[
    ("u-asha", "Asha", "Teach", "Python", "Scripting, data wrangling and testing.", &["programming"]),
    ("u-bala", "Bala", "Learn", "Python", "Total beginner, evenings only.", &["programming"]),
    ("u-chitra", "Chitra", "Teach", "Guitar", "Acoustic, fingerstyle basics.", &["music"]),
    ("u-lakshmi", "Lakshmi", "Teach", "Carnatic Vocals", "Ten years of training.", &["music"]),
    ("u-bala", "Bala", "Teach", "Chess", "Openings and endgames.", &["games"]),
    ("u-asha", "Asha", "Learn", "Guitar", "", &["music"]),
];

const RATINGS: &[(&str, &str, i32)] = &[
    ("u-bala", "u-asha", 5),
    ("u-chitra", "u-asha", 4),
    ("u-asha", "u-chitra", 4),
    ("u-lakshmi", "u-bala", 3),
];

/// In-memory store with a handful of listings and ratings.
pub async fn seeded_store() -> Result<MemoryStore> {
    let store = MemoryStore::new();

    for (uid, author, status, skill, description, tags) in LISTINGS {
        store
            .insert(
                skillswap::api::LISTINGS,
                json!({
                    "uid": uid,
                    "status": status,
                    "skill": skill,
                    "skill_lower": skill.to_lowercase(),
                    "description": description,
                    "tags": tags,
                    "author": author,
                    "author_lower": author.to_lowercase(),
                }),
            )
            .await?;
    }

    for (rater, teacher, score) in RATINGS {
        store
            .insert(
                skillswap::api::RATINGS,
                json!({ "userUid": rater, "teacherUid": teacher, "rating": score }),
            )
            .await?;
    }

    Ok(store)
}
