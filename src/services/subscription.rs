// Subscription service. One subscription row per user, upserted on the
// user id, and the user's is_premium flag is recomputed from the resulting
// status in the same transaction so the two can never disagree.

use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DieselPool,
    models::{NewSubscription, Subscription, SubscriptionStatus, UpsertSubscriptionRequest},
    schema::{subscriptions, users},
    utils::ServiceError,
};

#[derive(Clone)]
pub struct SubscriptionService {
    pool: DieselPool,
}

impl SubscriptionService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// Create or replace the subscription for a user and sync is_premium.
    #[instrument(skip(self, request))]
    pub async fn upsert_subscription(
        &self,
        request: UpsertSubscriptionRequest,
    ) -> Result<Subscription, ServiceError> {
        request.validate()?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        conn.transaction::<Subscription, ServiceError, _>(|tx| {
            Box::pin(async move {
                let owner_exists: bool = diesel::select(diesel::dsl::exists(
                    users::table.filter(users::id.eq(request.user_id)),
                ))
                .get_result(tx)
                .await
                .map_err(|e| {
                    ServiceError::DatabaseError(format!("Failed to check user: {}", e))
                })?;

                if !owner_exists {
                    return Err(ServiceError::ValidationError(format!(
                        "User {} does not exist",
                        request.user_id
                    )));
                }

                let new_subscription = NewSubscription {
                    id: Uuid::new_v4(),
                    user_id: request.user_id,
                    stripe_customer_id: request.stripe_customer_id,
                    stripe_subscription_id: request.stripe_subscription_id,
                    plan_type: request.plan_type,
                    status: request.status,
                    start_date: request.start_date,
                    end_date: request.end_date,
                };

                let subscription: Subscription = diesel::insert_into(subscriptions::table)
                    .values(&new_subscription)
                    .on_conflict(subscriptions::user_id)
                    .do_update()
                    .set((
                        subscriptions::stripe_customer_id
                            .eq(&new_subscription.stripe_customer_id),
                        subscriptions::stripe_subscription_id
                            .eq(&new_subscription.stripe_subscription_id),
                        subscriptions::plan_type.eq(new_subscription.plan_type),
                        subscriptions::status.eq(new_subscription.status),
                        subscriptions::start_date.eq(new_subscription.start_date),
                        subscriptions::end_date.eq(new_subscription.end_date),
                        subscriptions::updated_at.eq(diesel::dsl::now),
                    ))
                    .get_result(tx)
                    .await
                    .map_err(|e| {
                        ServiceError::DatabaseError(format!("Failed to upsert subscription: {}", e))
                    })?;

                Self::sync_premium_flag(tx, subscription.user_id, subscription.status).await?;

                Ok(subscription)
            })
        })
        .await
    }

    pub async fn get_subscription_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Subscription, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to load subscription: {}", e)))?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn get_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Subscription, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        subscriptions::table
            .filter(subscriptions::stripe_subscription_id.eq(stripe_subscription_id))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to load subscription: {}", e)))?
            .ok_or(ServiceError::NotFound)
    }

    /// Mark a user's subscription canceled and drop their premium flag.
    #[instrument(skip(self))]
    pub async fn cancel_subscription(&self, user_id: Uuid) -> Result<Subscription, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        conn.transaction::<Subscription, ServiceError, _>(|tx| {
            Box::pin(async move {
                let subscription: Subscription = diesel::update(
                    subscriptions::table.filter(subscriptions::user_id.eq(user_id)),
                )
                .set((
                    subscriptions::status.eq(SubscriptionStatus::Canceled),
                    subscriptions::end_date.eq(Some(chrono::Utc::now())),
                    subscriptions::updated_at.eq(diesel::dsl::now),
                ))
                .get_result(tx)
                .await
                .optional()
                .map_err(|e| {
                    ServiceError::DatabaseError(format!("Failed to cancel subscription: {}", e))
                })?
                .ok_or(ServiceError::NotFound)?;

                Self::sync_premium_flag(tx, user_id, subscription.status).await?;

                tracing::info!(user_id = %user_id, "Subscription canceled");

                Ok(subscription)
            })
        })
        .await
    }

    async fn sync_premium_flag(
        conn: &mut diesel_async::AsyncPgConnection,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<(), ServiceError> {
        diesel::update(users::table.find(user_id))
            .set((
                users::is_premium.eq(status.grants_premium()),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(conn)
            .await
            .map_err(|e| {
                ServiceError::DatabaseError(format!("Failed to sync premium flag: {}", e))
            })?;

        Ok(())
    }
}
