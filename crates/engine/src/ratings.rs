//! Rating submission.
//!
//! Policy decisions are pure (see [`eligibility`]); the [`RatingLedger`]
//! wires them to the store's two conditional writes. A submission that
//! loses a race re-reads and re-evaluates policy instead of blindly
//! retrying its write, so a rejection can never be bypassed by racing.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use souq_core::{Actor, ProductId, Score};
use tracing::{info, instrument, warn};

use crate::access;
use crate::aggregate::{Aggregator, ProductScore};
use crate::error::EngineError;
use crate::models::Rating;
use crate::store::{CatalogStore, NewRating, RatingInsert, StoreError};

/// What a repeat rating from the same user does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingPolicy {
    /// The first rating is final.
    OneTime,
    /// A re-rating overwrites the previous score once `window` has elapsed
    /// since the score last changed.
    Cooldown {
        /// Minimum time between score changes.
        window: Duration,
    },
}

impl Default for RatingPolicy {
    /// Cooldown with a 24-hour window.
    fn default() -> Self {
        Self::Cooldown {
            window: Duration::hours(24),
        }
    }
}

/// What one submission is allowed to do right now.
#[derive(Debug, Clone, PartialEq)]
pub enum Eligibility {
    /// No previous rating: insert a new row.
    Insert,
    /// The window has passed: overwrite the existing row.
    Update {
        /// The row as read; its `updated_at` guards the overwrite.
        existing: Rating,
    },
    /// One-time policy and the user already rated this product.
    AlreadyRated,
    /// Cooldown policy and the window is still running.
    CoolingDown {
        /// Time left until an overwrite is allowed.
        remaining: Duration,
    },
}

/// Decide what a submission may do, given the user's current rating row.
///
/// The window is measured from `updated_at`, so every accepted overwrite
/// restarts it. `elapsed == window` counts as elapsed.
#[must_use]
pub fn eligibility(
    policy: RatingPolicy,
    existing: Option<&Rating>,
    now: DateTime<Utc>,
) -> Eligibility {
    let Some(existing) = existing else {
        return Eligibility::Insert;
    };

    match policy {
        RatingPolicy::OneTime => Eligibility::AlreadyRated,
        RatingPolicy::Cooldown { window } => {
            let elapsed = now - existing.updated_at;
            if elapsed < window {
                Eligibility::CoolingDown {
                    remaining: window - elapsed,
                }
            } else {
                Eligibility::Update {
                    existing: existing.clone(),
                }
            }
        }
    }
}

/// What the caller gets back for an accepted rating.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingReceipt {
    /// The row as stored after this submission.
    pub rating: Rating,
    /// The score this submission replaced, when it was an overwrite.
    pub previous_score: Option<Score>,
    /// Fresh product aggregate including this submission.
    pub product_score: ProductScore,
}

/// The rating write path.
pub struct RatingLedger<S> {
    store: Arc<S>,
    policy: RatingPolicy,
    aggregator: Aggregator<S>,
}

impl<S> Clone for RatingLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy,
            aggregator: self.aggregator.clone(),
        }
    }
}

impl<S: CatalogStore> RatingLedger<S> {
    /// Lost races trigger a re-read and policy re-evaluation; after this
    /// many, the submission gives up.
    const MAX_ATTEMPTS: u32 = 3;

    /// Create a ledger applying `policy` to every submission.
    pub fn new(store: Arc<S>, policy: RatingPolicy, aggregator: Aggregator<S>) -> Self {
        Self {
            store,
            policy,
            aggregator,
        }
    }

    /// The policy this ledger applies.
    #[must_use]
    pub const fn policy(&self) -> RatingPolicy {
        self.policy
    }

    /// Submit a star rating for a product.
    ///
    /// Inserts the user's first rating of the product; under a cooldown
    /// policy, later submissions overwrite the existing row in place once
    /// the window has elapsed. The product's cached score is refreshed
    /// before the receipt is returned.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthenticated`] for anonymous callers
    /// - [`EngineError::InvalidScore`] when `score` is outside 1-5
    /// - [`EngineError::NotFound`] when the product does not exist
    /// - [`EngineError::AlreadyRated`] under the one-time policy
    /// - [`EngineError::CooldownActive`] while the window is running
    /// - [`EngineError::Store`] when persistence fails or the submission
    ///   keeps losing races
    #[instrument(skip(self, actor), fields(product_id = %product_id))]
    pub async fn submit(
        &self,
        actor: Option<&Actor>,
        product_id: ProductId,
        score: u8,
    ) -> Result<RatingReceipt, EngineError> {
        let actor = access::require_actor(actor)?;
        let score = Score::new(score)?;

        if self.store.product(product_id).await?.is_none() {
            return Err(EngineError::NotFound("product"));
        }

        for attempt in 1..=Self::MAX_ATTEMPTS {
            let now = Utc::now();
            let existing = self
                .store
                .rating_by_product_and_user(product_id, &actor.user_id)
                .await?;

            match eligibility(self.policy, existing.as_ref(), now) {
                Eligibility::Insert => {
                    let outcome = self
                        .store
                        .insert_rating_if_absent(NewRating {
                            product_id,
                            user_id: actor.user_id.clone(),
                            score,
                            created_at: now,
                        })
                        .await?;
                    match outcome {
                        RatingInsert::Inserted(rating) => return self.accept(rating, None).await,
                        RatingInsert::AlreadyPresent(_) => {
                            warn!(attempt, "insert lost a race, re-checking policy");
                        }
                    }
                }
                Eligibility::Update { existing } => {
                    let updated = self
                        .store
                        .update_rating_guarded(existing.id, existing.updated_at, score, now)
                        .await?;
                    if let Some(rating) = updated {
                        return self.accept(rating, Some(existing.score)).await;
                    }
                    warn!(attempt, "guarded update lost a race, re-checking policy");
                }
                Eligibility::AlreadyRated => return Err(EngineError::AlreadyRated),
                Eligibility::CoolingDown { remaining } => {
                    return Err(EngineError::CooldownActive { remaining });
                }
            }
        }

        Err(EngineError::Store(StoreError::Conflict(
            "rating submission kept losing races".to_owned(),
        )))
    }

    async fn accept(
        &self,
        rating: Rating,
        previous_score: Option<Score>,
    ) -> Result<RatingReceipt, EngineError> {
        self.aggregator.invalidate_product(rating.product_id).await;
        let product_score = self.aggregator.score_for_product(rating.product_id).await?;
        info!(
            rating_id = %rating.id,
            score = %rating.score,
            rerated = previous_score.is_some(),
            "rating accepted"
        );
        Ok(RatingReceipt {
            rating,
            previous_score,
            product_score,
        })
    }

    /// The rating the signed-in user gave a product, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthenticated`] for anonymous callers, or
    /// [`EngineError::Store`] when the lookup fails.
    pub async fn own_rating(
        &self,
        actor: Option<&Actor>,
        product_id: ProductId,
    ) -> Result<Option<Rating>, EngineError> {
        let actor = access::require_actor(actor)?;
        Ok(self
            .store
            .rating_by_product_and_user(product_id, &actor.user_id)
            .await?)
    }

    /// All rating rows of one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the listing fails.
    pub async fn ratings_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Rating>, EngineError> {
        Ok(self.store.ratings_by_product(product_id).await?)
    }
}
