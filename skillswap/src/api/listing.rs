//! Listing API.

use std::sync::Arc;

use super::{LISTINGS, RATINGS};
use crate::{
    client::ClientInner,
    engine::{self, BrowseResult, ListingFilter, RequestGeneration},
    error::{Error, Result},
    models::{Listing, ListingId, ListingUpdate, NewListing, Rating, UserId},
    store::{DocumentStoreExt, Query, Watch},
};

/// API for skill listings.
pub struct ListingApi {
    client: Arc<ClientInner>,
}

impl ListingApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// Get a listing by ID.
    pub async fn get(&self, id: impl Into<ListingId>) -> Result<Listing> {
        let id = id.into();
        self.client
            .store
            .get_as(LISTINGS, id.as_str())
            .await?
            .ok_or_else(|| Error::not_found("Listing", id.as_str()))
    }

    /// Listings matching a filter, in store order.
    pub async fn query(&self, filter: &ListingFilter) -> Result<Vec<Listing>> {
        let query = filter.to_query(LISTINGS);
        log::debug!("listing query: {:?}", query);
        self.client.store.query_as(&query).await
    }

    /// Every listing of one user.
    pub async fn by_owner(&self, owner: impl Into<UserId>) -> Result<Vec<Listing>> {
        let owner = owner.into();
        let query = Query::collection(LISTINGS).where_eq("uid", owner.as_str());
        self.client.store.query_as(&query).await
    }

    /// Submit a new listing owned by the signed-in user.
    pub async fn create(&self, listing: NewListing) -> Result<ListingId> {
        let auth = self.client.require_auth()?;
        let fields = listing.into_fields(&auth.uid, auth.name())?;
        let id = self.client.store.insert(LISTINGS, fields).await?;
        log::debug!("created listing {} for {}", id, auth.uid);
        Ok(ListingId::new(id))
    }

    /// Edit a listing. Only its owner may do this.
    pub async fn update(&self, id: impl Into<ListingId>, update: ListingUpdate) -> Result<Listing> {
        let auth = self.client.require_auth()?;
        let id = id.into();
        let existing = self.get(&id).await?;
        if existing.owner_id != auth.uid {
            return Err(Error::PermissionDenied(format!(
                "listing {} belongs to another user",
                id
            )));
        }
        if update.is_empty() {
            return Ok(existing);
        }

        let fields = update.into_fields()?;
        self.client.store.set(LISTINGS, id.as_str(), fields, true).await?;
        self.get(id).await
    }

    /// Filtered, rating-ranked listings plus the signed-in user's matches.
    pub async fn browse(&self, filter: &ListingFilter) -> Result<BrowseResult> {
        let listings = self.query(filter).await?;
        let ratings: Vec<Rating> = self
            .client
            .store
            .query_as(&Query::collection(RATINGS))
            .await?;
        let current = self.client.auth.uid();

        Ok(engine::rank_and_match(listings, &ratings, current.as_ref()))
    }

    /// A browse view that drops superseded responses.
    pub fn browser(&self) -> Browser {
        Browser {
            api: ListingApi::new(self.client.clone()),
            generations: RequestGeneration::new(),
        }
    }

    /// Live listings matching a filter.
    pub async fn watch(&self, filter: &ListingFilter) -> Result<Watch<Listing>> {
        let subscription = self.client.store.watch(filter.to_query(LISTINGS)).await?;
        Ok(Watch::new(subscription))
    }
}

/// Browse view with request-generation tagging.
///
/// When filters change faster than the store answers, only the newest
/// request's result is returned; older ones resolve to `None`.
pub struct Browser {
    api: ListingApi,
    generations: RequestGeneration,
}

impl Browser {
    /// Browse; `Ok(None)` if a newer browse started meanwhile.
    pub async fn browse(&self, filter: &ListingFilter) -> Result<Option<BrowseResult>> {
        let ticket = self.generations.next();
        let result = self.api.browse(filter).await?;
        if ticket.is_current() {
            Ok(Some(result))
        } else {
            log::debug!("discarding stale browse #{}", ticket.generation());
            Ok(None)
        }
    }
}
