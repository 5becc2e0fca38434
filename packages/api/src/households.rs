//! Household and profile lookups for the settings page.

use crate::error::ApiResult;
use crate::gateway::Gateway;
use crate::models::{Household, HouseholdInfo, HouseholdMember, UserProfile};

/// The user's household with their role and the household's head count.
pub async fn load_household_info(gateway: &impl Gateway, user_id: &str) -> ApiResult<HouseholdInfo> {
    let membership: HouseholdMember = gateway
        .from("household_members")
        .eq("user_id", user_id)
        .single()
        .await?;
    let household: Household = gateway
        .from("households")
        .eq("id", membership.household_id.as_str())
        .single()
        .await?;
    let member_count = gateway
        .from("household_members")
        .eq("household_id", household.id.as_str())
        .count()
        .await?;

    Ok(HouseholdInfo {
        id: household.id,
        name: household.name,
        invite_code: household.invite_code,
        role: membership.role,
        member_count: member_count.max(1),
    })
}

pub async fn load_profile(gateway: &impl Gateway, user_id: &str) -> ApiResult<Option<UserProfile>> {
    gateway.from("users").eq("id", user_id).maybe_single().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::gateway::MemoryGateway;
    use crate::models::HouseholdRole;
    use serde_json::json;

    #[tokio::test]
    async fn test_household_info() {
        let gateway = MemoryGateway::new();
        gateway
            .insert(
                "households",
                vec![json!({ "id": "h1", "name": "Lovelace Kitchen", "owner_id": "u1", "invite_code": "ABCD1234" })],
            )
            .await
            .unwrap();
        gateway
            .insert(
                "household_members",
                vec![
                    json!({ "household_id": "h1", "user_id": "u1", "role": "owner" }),
                    json!({ "household_id": "h1", "user_id": "u2", "role": "member" }),
                    json!({ "household_id": "h2", "user_id": "u3", "role": "owner" }),
                ],
            )
            .await
            .unwrap();

        let info = load_household_info(&gateway, "u2").await.unwrap();
        assert_eq!(info.name, "Lovelace Kitchen");
        assert_eq!(info.invite_code.as_deref(), Some("ABCD1234"));
        assert_eq!(info.role, HouseholdRole::Member);
        assert_eq!(info.member_count, 2);

        assert!(matches!(
            load_household_info(&gateway, "stranger").await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_load_profile() {
        let gateway = MemoryGateway::new();
        gateway
            .insert("users", vec![json!({ "id": "u1", "email": "ada@example.com" })])
            .await
            .unwrap();
        let profile = load_profile(&gateway, "u1").await.unwrap().unwrap();
        assert_eq!(profile.name(), "ada@example.com");
        assert!(load_profile(&gateway, "u2").await.unwrap().is_none());
    }
}
