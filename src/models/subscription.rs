// Subscription model mirroring the payment provider's view of a user's plan.
// One subscription per user, upserted from webhook-style calls.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::subscriptions;

// =============================================================================
// ENUMS
// =============================================================================

/// Subscription plan type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    diesel::expression::AsExpression,
    diesel::FromSqlRow,
)]
#[diesel(sql_type = diesel::sql_types::Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    Free,
    Premium,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Free => "FREE",
            PlanType::Premium => "PREMIUM",
        }
    }
}

impl FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(PlanType::Free),
            "PREMIUM" => Ok(PlanType::Premium),
            _ => Err(format!("Invalid plan type: {}", s)),
        }
    }
}

impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for PlanType
where
    DB: diesel::backend::Backend,
    String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        Self::from_str(&value).map_err(|e| e.into())
    }
}

impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for PlanType
where
    DB: diesel::backend::Backend,
    str: diesel::serialize::ToSql<diesel::sql_types::Text, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        self.as_str().to_sql(out)
    }
}

/// Subscription status as reported by the payment provider.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    diesel::expression::AsExpression,
    diesel::FromSqlRow,
)]
#[diesel(sql_type = diesel::sql_types::Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Canceled,
    PastDue,
    Trialing,
    Unpaid,
    Completed,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Inactive => "INACTIVE",
            SubscriptionStatus::Canceled => "CANCELED",
            SubscriptionStatus::PastDue => "PAST_DUE",
            SubscriptionStatus::Trialing => "TRIALING",
            SubscriptionStatus::Unpaid => "UNPAID",
            SubscriptionStatus::Completed => "COMPLETED",
        }
    }

    /// Statuses that grant the owning user premium access.
    pub fn grants_premium(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(SubscriptionStatus::Active),
            "INACTIVE" => Ok(SubscriptionStatus::Inactive),
            "CANCELED" => Ok(SubscriptionStatus::Canceled),
            "PAST_DUE" => Ok(SubscriptionStatus::PastDue),
            "TRIALING" => Ok(SubscriptionStatus::Trialing),
            "UNPAID" => Ok(SubscriptionStatus::Unpaid),
            "COMPLETED" => Ok(SubscriptionStatus::Completed),
            _ => Err(format!("Invalid subscription status: {}", s)),
        }
    }
}

impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for SubscriptionStatus
where
    DB: diesel::backend::Backend,
    String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        Self::from_str(&value).map_err(|e| e.into())
    }
}

impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for SubscriptionStatus
where
    DB: diesel::backend::Backend,
    str: diesel::serialize::ToSql<diesel::sql_types::Text, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        self.as_str().to_sql(out)
    }
}

// =============================================================================
// DATABASE MODELS
// =============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: String,
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct NewSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: String,
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Upsert request, typically driven by a payment-provider webhook.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertSubscriptionRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Stripe customer id cannot be empty"))]
    pub stripe_customer_id: String,

    #[validate(length(min = 1, max = 255, message = "Stripe subscription id cannot be empty"))]
    pub stripe_subscription_id: String,

    pub plan_type: PlanType,

    pub status: SubscriptionStatus,

    pub start_date: DateTime<Utc>,

    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            user_id: subscription.user_id,
            plan_type: subscription.plan_type,
            status: subscription.status,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_granting_statuses() {
        assert!(SubscriptionStatus::Active.grants_premium());
        assert!(SubscriptionStatus::Trialing.grants_premium());
        assert!(!SubscriptionStatus::Canceled.grants_premium());
        assert!(!SubscriptionStatus::PastDue.grants_premium());
        assert!(!SubscriptionStatus::Inactive.grants_premium());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Inactive,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Trialing,
            SubscriptionStatus::Unpaid,
            SubscriptionStatus::Completed,
        ] {
            assert_eq!(SubscriptionStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn test_plan_type_serde() {
        assert_eq!(
            serde_json::to_string(&PlanType::Premium).unwrap(),
            "\"PREMIUM\""
        );
    }
}
