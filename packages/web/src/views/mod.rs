mod account;
pub use account::{Login, Settings, Signup};

mod recipes;
pub use recipes::{EditRecipe, NewRecipe, RecipeDetail, Recipes};

mod community;
pub use community::Community;

mod offline;
pub use offline::{OfflineRecipe, OfflineRecipes};

mod share;
pub use share::SharedRecipe;
