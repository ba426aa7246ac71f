//! Listing handlers.

use anyhow::{Context, Result};
use colored::Colorize;
use futures::future::try_join;
use serde::Serialize;
use skillswap::{
    engine::{summary_for, LEADERBOARD_SIZE},
    BrowseResult, Listing, ListingFilter, ListingUpdate, NewListing, RatingSummary,
    SkillStatus, SkillSwapClient,
};

use crate::output::{stars, PlainPrint, TableRow};

/// Listing info.
#[derive(Debug, Clone, Serialize)]
pub struct ListingInfo {
    pub id: String,
    pub status: SkillStatus,
    pub skill: String,
    pub author: String,
    pub owner_uid: String,
    pub rating: f64,
    pub tags: Vec<String>,
    pub description: String,
}

impl ListingInfo {
    fn new(listing: &Listing, rating: f64) -> Self {
        Self {
            id: listing.id.to_string(),
            status: listing.status,
            skill: listing.skill_name.clone(),
            author: listing.author_name.clone(),
            owner_uid: listing.owner_id.to_string(),
            rating,
            tags: listing.tags.clone(),
            description: listing.description.clone(),
        }
    }

    fn from_result(result: &BrowseResult, listings: &[Listing]) -> Vec<Self> {
        listings
            .iter()
            .map(|l| Self::new(l, result.average_for(&l.owner_id)))
            .collect()
    }
}

impl TableRow for ListingInfo {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Status", "Skill", "Author", "Rating", "Tags"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.status.to_string(),
            self.skill.clone(),
            self.author.clone(),
            format!("{:.1}", self.rating),
            self.tags.join(", "),
        ]
    }
}

impl PlainPrint for ListingInfo {
    fn plain_print(&self) {
        let status = match self.status {
            SkillStatus::Teach => self.status.as_str().green(),
            SkillStatus::Learn => self.status.as_str().yellow(),
        };
        println!(
            "[{}] {} {} {} {}",
            self.id.cyan(),
            status,
            self.skill.bold(),
            format!("by {}", self.author).dimmed(),
            stars(self.rating).yellow()
        );
        if !self.description.is_empty() {
            println!("   {}", self.description);
        }
        if !self.tags.is_empty() {
            println!("   {}", format!("#{}", self.tags.join(" #")).dimmed());
        }
    }
}

/// Browse output.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseOutput {
    pub filters: Vec<String>,
    pub listings: Vec<ListingInfo>,
    pub matches: Vec<ListingInfo>,
}

/// Leaderboard entry.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub author: String,
    pub skill: String,
    pub average: f64,
}

impl TableRow for LeaderboardEntry {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Author", "Skill", "Rating"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.author.clone(),
            self.skill.clone(),
            format!("{:.1}", self.average),
        ]
    }
}

impl PlainPrint for LeaderboardEntry {
    fn plain_print(&self) {
        println!(
            "{}. {} {} {} ({:.1})",
            self.rank,
            self.author.green(),
            self.skill.bold(),
            stars(self.average).yellow(),
            self.average
        );
    }
}

/// Listing detail with its owner's rating.
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    pub listing: ListingInfo,
    pub owner_rating: RatingSummary,
}

impl PlainPrint for ListingDetail {
    fn plain_print(&self) {
        self.listing.plain_print();
        if self.owner_rating.is_rated() {
            println!(
                "   {} {} ({})",
                stars(self.owner_rating.average).yellow(),
                self.owner_rating.display_average(),
                self.owner_rating.count
            );
        }
    }
}

/// Browse listings.
pub async fn browse(client: &SkillSwapClient, filter: &ListingFilter) -> Result<BrowseOutput> {
    let result = client.listings().browse(filter).await?;
    Ok(BrowseOutput {
        filters: filter.active_tags().iter().map(|t| t.to_string()).collect(),
        listings: ListingInfo::from_result(&result, &result.listings),
        matches: ListingInfo::from_result(&result, &result.matches),
    })
}

/// Best-rated listings.
pub async fn leaderboard(
    client: &SkillSwapClient,
    filter: &ListingFilter,
) -> Result<Vec<LeaderboardEntry>> {
    let result = client.listings().browse(filter).await?;
    Ok(result
        .leaderboard(LEADERBOARD_SIZE)
        .into_iter()
        .enumerate()
        .map(|(i, l)| LeaderboardEntry {
            rank: i + 1,
            author: l.author_name.clone(),
            skill: l.skill_name.clone(),
            average: result.average_for(&l.owner_id),
        })
        .collect())
}

/// One listing with its owner's rating summary.
pub async fn show(client: &SkillSwapClient, id: &str) -> Result<ListingDetail> {
    let listings = client.listings();
    let ratings = client.ratings();
    let (listing, all) = try_join(listings.get(id), ratings.all()).await?;

    let owner_rating = summary_for(&all, &listing.owner_id);
    Ok(ListingDetail {
        listing: ListingInfo::new(&listing, owner_rating.average),
        owner_rating,
    })
}

/// Listings of the signed-in user.
pub async fn mine(client: &SkillSwapClient) -> Result<Vec<ListingInfo>> {
    let uid = client
        .current_uid()
        .context("Authentication required. Run 'skillswap auth login' first.")?;
    let listings = client.listings();
    let ratings = client.ratings();
    let (own, all) = try_join(listings.by_owner(uid.clone()), ratings.all()).await?;

    let average = summary_for(&all, &uid).average;
    Ok(own.iter().map(|l| ListingInfo::new(l, average)).collect())
}

/// Submit a listing.
pub async fn add(client: &SkillSwapClient, listing: NewListing) -> Result<String> {
    let id = client.listings().create(listing).await?;
    Ok(id.to_string())
}

/// Edit an own listing.
pub async fn edit(client: &SkillSwapClient, id: &str, update: ListingUpdate) -> Result<ListingInfo> {
    let listing = client.listings().update(id, update).await?;
    let all = client.ratings().all().await?;
    Ok(ListingInfo::new(&listing, summary_for(&all, &listing.owner_id).average))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillswap::{AuthInfo, MemoryStore};
    use std::sync::Arc;

    fn client(store: &MemoryStore, uid: &str) -> SkillSwapClient {
        SkillSwapClient::builder()
            .store(Arc::new(store.clone()))
            .with_auth(AuthInfo::new("token", uid).with_name(uid))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_own_listings_carry_rating() {
        let store = MemoryStore::new();
        let asha = client(&store, "U1");
        let bala = client(&store, "U2");

        let id = add(&asha, NewListing::new(SkillStatus::Teach, "Python"))
            .await
            .unwrap();
        bala.ratings().submit("U1", 4).await.unwrap();

        let own = mine(&asha).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].rating, 4.0);

        let update = ListingUpdate {
            description: Some("Beginner friendly".into()),
            ..Default::default()
        };
        let edited = edit(&asha, &id, update).await.unwrap();
        assert_eq!(edited.description, "Beginner friendly");
        assert_eq!(edited.rating, 4.0);
    }

    #[tokio::test]
    async fn test_unrated_owner_shows_zero() {
        let store = MemoryStore::new();
        let asha = client(&store, "U1");
        add(&asha, NewListing::new(SkillStatus::Learn, "Guitar"))
            .await
            .unwrap();

        let own = mine(&asha).await.unwrap();
        assert_eq!(own[0].rating, 0.0);
    }
}
