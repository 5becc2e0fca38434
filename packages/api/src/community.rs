//! Household discovery and follows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::gateway::Gateway;
use crate::models::{Household, HouseholdFollow};

pub const SEARCH_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowedHousehold {
    pub follow_id: String,
    pub household: Household,
}

/// Households the user follows, in follow order. Follows whose household is
/// no longer visible are dropped.
pub async fn followed_households(
    gateway: &impl Gateway,
    user_id: &str,
) -> ApiResult<Vec<FollowedHousehold>> {
    let follows: Vec<HouseholdFollow> = gateway
        .from("household_follows")
        .eq("follower_user_id", user_id)
        .order("created_at", true)
        .fetch()
        .await?;
    if follows.is_empty() {
        return Ok(Vec::new());
    }

    let households: Vec<Household> = gateway
        .from("households")
        .in_list(
            "id",
            follows.iter().map(|f| f.followed_household_id.clone()),
        )
        .fetch()
        .await?;
    let mut by_id: HashMap<String, Household> =
        households.into_iter().map(|h| (h.id.clone(), h)).collect();

    Ok(follows
        .into_iter()
        .filter_map(|f| {
            by_id.remove(&f.followed_household_id).map(|household| FollowedHousehold {
                follow_id: f.id,
                household,
            })
        })
        .collect())
}

/// Case-insensitive substring search on household names.
pub async fn search_households(gateway: &impl Gateway, query: &str) -> ApiResult<Vec<Household>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    gateway
        .from("households")
        .ilike("name", &format!("%{query}%"))
        .limit(SEARCH_LIMIT)
        .fetch()
        .await
}

pub async fn follow(
    gateway: &impl Gateway,
    user_id: &str,
    household_id: &str,
) -> ApiResult<HouseholdFollow> {
    let follow = gateway
        .from("household_follows")
        .insert(&serde_json::json!({
            "follower_user_id": user_id,
            "followed_household_id": household_id,
        }))
        .await?;
    tracing::info!(%user_id, %household_id, "followed household");
    Ok(follow)
}

pub async fn unfollow(gateway: &impl Gateway, user_id: &str, household_id: &str) -> ApiResult<()> {
    gateway
        .from("household_follows")
        .eq("follower_user_id", user_id)
        .eq("followed_household_id", household_id)
        .delete()
        .await
}

/// Whether `household_id` appears in `follows`.
pub fn is_following(follows: &[FollowedHousehold], household_id: &str) -> bool {
    follows.iter().any(|f| f.household.id == household_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use serde_json::json;

    async fn seeded() -> MemoryGateway {
        let gateway = MemoryGateway::new();
        gateway
            .insert(
                "households",
                vec![
                    json!({ "id": "h1", "name": "Lovelace Kitchen", "owner_id": "u1" }),
                    json!({ "id": "h2", "name": "The Babbage Bakery", "owner_id": "u2" }),
                    json!({ "id": "h3", "name": "kitchen table", "owner_id": "u3" }),
                ],
            )
            .await
            .unwrap();
        gateway
    }

    #[tokio::test]
    async fn test_search_households() {
        let gateway = seeded().await;
        let found = search_households(&gateway, "KITCHEN").await.unwrap();
        let mut ids: Vec<_> = found.iter().map(|h| h.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["h1", "h3"]);
        assert!(search_households(&gateway, "   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_follow_and_unfollow() {
        let gateway = seeded().await;
        follow(&gateway, "u9", "h2").await.unwrap();
        follow(&gateway, "u9", "h1").await.unwrap();

        let follows = followed_households(&gateway, "u9").await.unwrap();
        assert_eq!(follows.len(), 2);
        assert!(is_following(&follows, "h1"));
        assert!(!is_following(&follows, "h3"));

        unfollow(&gateway, "u9", "h2").await.unwrap();
        let follows = followed_households(&gateway, "u9").await.unwrap();
        assert_eq!(follows.len(), 1);
        assert_eq!(follows[0].household.name, "Lovelace Kitchen");
        assert!(followed_households(&gateway, "nobody").await.unwrap().is_empty());
    }
}
