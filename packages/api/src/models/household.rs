use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdRole {
    Owner,
    Admin,
    Member,
}

impl HouseholdRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            HouseholdRole::Owner => "owner",
            HouseholdRole::Admin => "admin",
            HouseholdRole::Member => "member",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Household {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    #[serde(default)]
    pub invite_code: Option<String>,
    #[serde(default)]
    pub allow_member_edits: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HouseholdMember {
    #[serde(default)]
    pub id: String,
    pub household_id: String,
    pub user_id: String,
    pub role: HouseholdRole,
    #[serde(default)]
    pub joined_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HouseholdFollow {
    #[serde(default)]
    pub id: String,
    pub follower_user_id: String,
    pub followed_household_id: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeShare {
    #[serde(default)]
    pub id: String,
    pub recipe_id: String,
    pub token: String,
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserFavorite {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub recipe_id: String,
    #[serde(default)]
    pub created_at: String,
}

/// The signed-in user's household as the settings page shows it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HouseholdInfo {
    pub id: String,
    pub name: String,
    pub invite_code: Option<String>,
    pub role: HouseholdRole,
    pub member_count: usize,
}
