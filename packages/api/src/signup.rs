//! # Signup orchestration
//!
//! Creating an account touches four tables and the auth service, and some of
//! those writes bypass row-level security. It therefore runs server-side with the
//! service-role key, behind the `POST /api/signup` server function:
//!
//! 1. validate the form,
//! 2. create an auto-confirmed auth user,
//! 3. insert the `users` profile,
//! 4. join the household named by the invite code, or create a fresh one,
//! 5. insert the `household_members` row.
//!
//! A failed step aborts the remaining ones; earlier writes are not rolled back.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::AdminAuth;
use crate::error::{ApiError, ApiResult};
use crate::gateway::Gateway;
use crate::models::{Household, HouseholdRole};
use crate::token::{random_string, UPPER_ALNUM};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const INVITE_CODE_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    #[serde(default)]
    pub household_name: Option<String>,
    #[serde(default)]
    pub invite_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignupOutcome {
    pub user_id: String,
    pub household_id: String,
    pub role: HouseholdRole,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SignupRequest {
    pub fn validate(&self) -> ApiResult<()> {
        if !self.email.contains('@') {
            return Err(ApiError::Validation("Please enter a valid email address".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.display_name.trim().is_empty() {
            return Err(ApiError::Validation("Display name is required".into()));
        }
        Ok(())
    }
}

pub fn generate_invite_code() -> String {
    random_string(UPPER_ALNUM, INVITE_CODE_LEN)
}

pub async fn create_user_and_household(
    gateway: &impl Gateway,
    admin: &impl AdminAuth,
    request: SignupRequest,
) -> ApiResult<SignupOutcome> {
    request.validate()?;
    let email = request.email.trim();
    let display_name = request.display_name.trim();

    let user = admin
        .create_user(email, &request.password, display_name)
        .await?;

    gateway
        .from("users")
        .insert::<_, serde_json::Value>(&json!({
            "id": user.id,
            "email": email,
            "display_name": display_name,
        }))
        .await?;

    let (household_id, role) = match non_empty(&request.invite_code) {
        Some(code) => {
            let household: Option<Household> = gateway
                .from("households")
                .eq("invite_code", code)
                .maybe_single()
                .await?;
            let household = household.ok_or(ApiError::InvalidInviteCode)?;
            (household.id, HouseholdRole::Member)
        }
        None => {
            let name = non_empty(&request.household_name)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{display_name}'s Household"));
            let household: Household = gateway
                .from("households")
                .insert(&json!({
                    "name": name,
                    "owner_id": user.id,
                    "invite_code": generate_invite_code(),
                }))
                .await?;
            (household.id, HouseholdRole::Owner)
        }
    };

    gateway
        .from("household_members")
        .insert::<_, serde_json::Value>(&json!({
            "household_id": household_id,
            "user_id": user.id,
            "role": role,
        }))
        .await?;

    tracing::info!(user_id = %user.id, %household_id, role = role.as_str(), "signed up");
    Ok(SignupOutcome {
        user_id: user.id,
        household_id,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthBackend, MemoryAuth};
    use crate::gateway::MemoryGateway;
    use crate::models::HouseholdMember;

    fn request(email: &str, invite_code: Option<String>) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: "secret1".into(),
            display_name: "Ada".into(),
            household_name: None,
            invite_code,
        }
    }

    #[tokio::test]
    async fn test_signup_creates_then_joins_household() {
        let gateway = MemoryGateway::new();
        let admin = MemoryAuth::new();

        let owner = create_user_and_household(&gateway, &admin, request("ada@example.com", None))
            .await
            .unwrap();
        assert_eq!(owner.role, HouseholdRole::Owner);

        let household: Household = gateway
            .from("households")
            .eq("id", owner.household_id.as_str())
            .single()
            .await
            .unwrap();
        assert_eq!(household.name, "Ada's Household");
        assert_eq!(household.owner_id, owner.user_id);
        let code = household.invite_code.clone().unwrap();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

        let member = create_user_and_household(
            &gateway,
            &admin,
            request("bob@example.com", Some(code)),
        )
        .await
        .unwrap();
        assert_eq!(member.role, HouseholdRole::Member);
        assert_eq!(member.household_id, owner.household_id);

        let members: Vec<HouseholdMember> = gateway
            .from("household_members")
            .eq("household_id", owner.household_id.as_str())
            .fetch()
            .await
            .unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(gateway.rows("users").len(), 2);

        // The new account can sign in with the same password
        admin
            .sign_in_with_password("bob@example.com", "secret1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_invite_code() {
        let gateway = MemoryGateway::new();
        let err = create_user_and_household(
            &gateway,
            &MemoryAuth::new(),
            request("ada@example.com", Some("NOPE1234".into())),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInviteCode));
        assert!(gateway.rows("household_members").is_empty());
    }

    #[tokio::test]
    async fn test_named_household() {
        let gateway = MemoryGateway::new();
        let mut req = request("ada@example.com", Some("  ".into()));
        req.household_name = Some("Lovelace Kitchen".into());
        let outcome = create_user_and_household(&gateway, &MemoryAuth::new(), req)
            .await
            .unwrap();
        assert_eq!(outcome.role, HouseholdRole::Owner);
        assert_eq!(gateway.rows("households")[0]["name"], "Lovelace Kitchen");
    }

    #[test]
    fn test_validation() {
        let mut req = request("not-an-email", None);
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
        req.email = "ada@example.com".into();
        req.password = "12345".into();
        assert!(req.validate().is_err());
        req.password = "123456".into();
        req.display_name = "   ".into();
        assert!(req.validate().is_err());
        req.display_name = "Ada".into();
        assert!(req.validate().is_ok());
    }
}
