mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod home;
pub use home::HomeView;

mod login;
pub use login::LoginView;

mod signup;
pub use signup::SignupView;

mod recipe_list;
pub use recipe_list::RecipeListView;

mod recipe_detail;
pub use recipe_detail::RecipeDetailView;

mod new_recipe;
pub use new_recipe::NewRecipeView;

mod edit_recipe;
pub use edit_recipe::EditRecipeView;

mod settings;
pub use settings::SettingsView;

mod community;
pub use community::CommunityView;

mod shared_recipe;
pub use shared_recipe::SharedRecipeView;

mod offline_recipes;
pub use offline_recipes::{OfflineRecipeView, OfflineRecipesView};

mod recipe_body;
pub(crate) use recipe_body::{RecipeBody, RecipeNotFound};
