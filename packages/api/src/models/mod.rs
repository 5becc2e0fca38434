//! Rows of the user, household and social tables.

mod household;
mod user;

pub use household::{
    Household, HouseholdFollow, HouseholdInfo, HouseholdMember, HouseholdRole, RecipeShare,
    UserFavorite,
};
pub use user::UserProfile;
