mod spinner;
pub use spinner::Spinner;

mod favorite_button;
pub use favorite_button::FavoriteButton;

mod offline_control;
pub use offline_control::OfflineControl;

mod scale_control;
pub use scale_control::ScaleControl;

mod recipe_card;
pub use recipe_card::{RecipeCard, ViewMode};

mod cooking_note_modal;
pub use cooking_note_modal::CookingNoteModal;

mod share_modal;
pub use share_modal::ShareModal;

mod image_upload;
pub use image_upload::ImageUpload;

mod ingredient_input;
pub use ingredient_input::IngredientInput;

mod instruction_input;
pub use instruction_input::InstructionInput;

mod recipe_form;
pub use recipe_form::RecipeForm;

mod biometric_setup;
pub use biometric_setup::BiometricSetup;

/// Parse a numeric form field; blank or malformed input is `None`.
pub(crate) fn parse_field<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// Render an optional number back into a form field.
pub(crate) fn field_value<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fields() {
        assert_eq!(parse_field::<f64>(" 1.5 "), Some(1.5));
        assert_eq!(parse_field::<u32>(""), None);
        assert_eq!(parse_field::<u32>("ten"), None);
        assert_eq!(field_value(Some(30u32)), "30");
        assert_eq!(field_value::<f64>(None), "");
    }
}
