//! Rating API.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use super::RATINGS;
use crate::{
    client::ClientInner,
    engine::{average_by_teacher, find_rating, summary_for},
    error::Result,
    models::{Rating, RatingSummary, UserId},
    store::{DocumentStoreExt, Query},
};

/// API for teacher ratings.
pub struct RatingApi {
    client: Arc<ClientInner>,
}

/// Ratings of one teacher.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeacherRatings {
    pub ratings: Vec<Rating>,
    pub summary: RatingSummary,
}

impl RatingApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// Every rating in the store.
    pub async fn all(&self) -> Result<Vec<Rating>> {
        self.client
            .store
            .query_as(&Query::collection(RATINGS))
            .await
    }

    /// Mean score per rated teacher.
    pub async fn averages(&self) -> Result<HashMap<UserId, f64>> {
        let ratings = self.all().await?;
        Ok(average_by_teacher(&ratings))
    }

    /// Ratings given to a teacher and their summary.
    pub async fn for_teacher(&self, teacher: impl Into<UserId>) -> Result<TeacherRatings> {
        let teacher = teacher.into();
        let ratings = self.load(&teacher).await?;
        let summary = summary_for(&ratings, &teacher);
        Ok(TeacherRatings { ratings, summary })
    }

    /// Score the signed-in user gave a teacher.
    pub async fn mine(&self, teacher: impl Into<UserId>) -> Result<Option<i32>> {
        let auth = self.client.require_auth()?;
        let teacher = teacher.into();
        let ratings = self.load(&teacher).await?;
        Ok(find_rating(&ratings, &auth.uid, &teacher).map(|r| r.score))
    }

    /// Rate a teacher as the signed-in user.
    ///
    /// Replaces the user's earlier score for the same teacher instead of
    /// adding a second rating. Returns the teacher's refreshed summary.
    pub async fn submit(&self, teacher: impl Into<UserId>, score: i32) -> Result<RatingSummary> {
        let auth = self.client.require_auth()?;
        let teacher = teacher.into();

        let _guard = self.client.rating_lock.lock().await;
        let ratings = self.load(&teacher).await?;

        let fields = json!({
            "userUid": auth.uid,
            "teacherUid": teacher,
            "rating": score,
        });
        match find_rating(&ratings, &auth.uid, &teacher) {
            Some(existing) => {
                log::debug!(
                    "updating rating {} of {} from {} to {}",
                    existing.id,
                    teacher,
                    existing.score,
                    score
                );
                self.client
                    .store
                    .set(RATINGS, existing.id.as_str(), fields, false)
                    .await?;
            }
            None => {
                let id = self.client.store.insert(RATINGS, fields).await?;
                log::debug!("added rating {} for {}", id, teacher);
            }
        }

        let refreshed = self.load(&teacher).await?;
        Ok(summary_for(&refreshed, &teacher))
    }

    async fn load(&self, teacher: &UserId) -> Result<Vec<Rating>> {
        let query = Query::collection(RATINGS).where_eq("teacherUid", teacher.as_str());
        self.client.store.query_as(&query).await.map_err(|e| {
            log::warn!("failed to load ratings of {}: {}", teacher, e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::{AuthInfo, SkillSwapClient},
        error::Error,
        store::MemoryStore,
    };
    use pretty_assertions::assert_eq;

    fn client(store: &MemoryStore, uid: &str) -> SkillSwapClient {
        SkillSwapClient::builder()
            .store(Arc::new(store.clone()))
            .with_auth(AuthInfo::new("token", uid))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_rating_twice_keeps_one_record() {
        let store = MemoryStore::new();
        let api = client(&store, "U").ratings();

        let first = api.submit("T", 3).await.unwrap();
        assert_eq!(first.count, 1);
        assert_eq!(first.average, 3.0);

        let second = api.submit("T", 5).await.unwrap();
        assert_eq!(second.count, 1);
        assert_eq!(second.average, 5.0);

        let all = api.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].score, 5);
        assert_eq!(all[0].rater_id.as_str(), "U");
        assert_eq!(api.mine("T").await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn test_average_over_raters() {
        let store = MemoryStore::new();
        client(&store, "a").ratings().submit("T", 5).await.unwrap();
        client(&store, "b").ratings().submit("T", 3).await.unwrap();
        let summary = client(&store, "c").ratings().submit("T", 4).await.unwrap();

        assert_eq!(summary.average, 4.0);
        assert_eq!(summary.count, 3);

        let averages = client(&store, "c").ratings().averages().await.unwrap();
        assert_eq!(averages.get(&UserId::new("T")), Some(&4.0));
    }

    #[tokio::test]
    async fn test_unrated_teacher() {
        let store = MemoryStore::new();
        let api = client(&store, "U").ratings();
        let rated = api.for_teacher("nobody").await.unwrap();
        assert!(rated.ratings.is_empty());
        assert!(!rated.summary.is_rated());
        assert_eq!(rated.summary.average, 0.0);
        assert_eq!(api.mine("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_submits_same_client() {
        let store = MemoryStore::new();
        let client = client(&store, "U");
        let a = client.ratings();
        let b = client.ratings();

        let (x, y) = tokio::join!(a.submit("T", 2), b.submit("T", 4));
        x.unwrap();
        y.unwrap();
        assert_eq!(store.count(RATINGS), 1);
    }

    #[tokio::test]
    async fn test_outage_leaves_rating_unchanged() {
        let store = MemoryStore::new();
        let api = client(&store, "U").ratings();
        api.submit("T", 3).await.unwrap();

        store.set_available(false);
        let err = api.submit("T", 5).await.unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert!(err.is_retryable());

        store.set_available(true);
        assert_eq!(api.mine("T").await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_submit_requires_auth() {
        let store = MemoryStore::new();
        let client = SkillSwapClient::builder()
            .store(Arc::new(store.clone()))
            .build()
            .unwrap();
        let err = client.ratings().submit("T", 5).await.unwrap_err();
        assert!(err.is_auth_error());
        assert_eq!(store.count(RATINGS), 0);
    }
}
