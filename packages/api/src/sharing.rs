//! Public share links.
//!
//! A recipe has at most one live share token. Anyone holding the token can read
//! the recipe through the `get_shared_recipe` remote procedure, which runs with
//! elevated rights and returns the whole recipe as one document.

use serde::Deserialize;
use serde_json::json;
use store::models::attach_step_images;

use crate::error::ApiResult;
use crate::gateway::Gateway;
use crate::models::RecipeShare;
use crate::recipes::RecipeDetail;
use crate::token::{random_string, LOWER_ALNUM};

pub const SHARE_TOKEN_LEN: usize = 26;

#[derive(Deserialize)]
struct TokenRow {
    token: String,
}

pub async fn get_share_token(gateway: &impl Gateway, recipe_id: &str) -> ApiResult<Option<String>> {
    let row: Option<TokenRow> = gateway
        .from("recipe_shares")
        .select("token")
        .eq("recipe_id", recipe_id)
        .maybe_single()
        .await?;
    Ok(row.map(|r| r.token))
}

/// Mint a new token for `recipe_id` and return it.
pub async fn create_share_link(gateway: &impl Gateway, recipe_id: &str, user_id: &str) -> ApiResult<String> {
    let share: RecipeShare = gateway
        .from("recipe_shares")
        .insert(&json!({
            "recipe_id": recipe_id,
            "token": random_string(LOWER_ALNUM, SHARE_TOKEN_LEN),
            "created_by": user_id,
        }))
        .await?;
    tracing::info!(%recipe_id, "created share link");
    Ok(share.token)
}

/// Delete every share of `recipe_id`; existing links stop resolving.
pub async fn revoke_share_link(gateway: &impl Gateway, recipe_id: &str) -> ApiResult<()> {
    gateway
        .from("recipe_shares")
        .eq("recipe_id", recipe_id)
        .delete()
        .await?;
    tracing::info!(%recipe_id, "revoked share link");
    Ok(())
}

pub fn share_url(origin: &str, token: &str) -> String {
    format!("{}/share/{token}", origin.trim_end_matches('/'))
}

/// Resolve a share token. Unknown or revoked tokens yield `None`.
pub async fn get_shared_recipe(gateway: &impl Gateway, token: &str) -> ApiResult<Option<RecipeDetail>> {
    let doc = gateway
        .rpc("get_shared_recipe", json!({ "token_input": token }))
        .await?;
    if doc.is_null() {
        return Ok(None);
    }
    let mut detail: RecipeDetail = serde_json::from_value(doc)?;
    detail.ingredients.sort_by_key(|i| i.sort_order);
    detail.instructions.sort_by_key(|i| i.step_number);
    attach_step_images(&mut detail.instructions, &detail.images);
    Ok(Some(detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{IngredientDraft, InstructionDraft, RecipeDraft};
    use crate::gateway::MemoryGateway;
    use crate::recipes::create_recipe;
    use store::models::ImageRef;

    async fn recipe(gateway: &MemoryGateway) -> String {
        gateway
            .insert(
                "users",
                vec![json!({ "id": "u1", "email": "ada@example.com", "display_name": "Ada" })],
            )
            .await
            .unwrap();
        gateway
            .insert(
                "household_members",
                vec![json!({ "household_id": "h1", "user_id": "u1", "role": "owner" })],
            )
            .await
            .unwrap();
        let draft = RecipeDraft {
            title: "Shortbread".into(),
            ingredients: vec![IngredientDraft {
                name: "Butter".into(),
                ..Default::default()
            }],
            instructions: vec![InstructionDraft {
                content: "Cream butter and sugar".into(),
                image: Some(ImageRef {
                    url: "https://cdn/cream.jpg".into(),
                    storage_path: "cream.jpg".into(),
                }),
                ..Default::default()
            }],
            ..Default::default()
        };
        create_recipe(gateway, "u1", &draft).await.unwrap().id
    }

    #[tokio::test]
    async fn test_share_token_lifecycle() {
        let gateway = MemoryGateway::new();
        let recipe_id = recipe(&gateway).await;
        assert!(get_share_token(&gateway, &recipe_id).await.unwrap().is_none());

        let token = create_share_link(&gateway, &recipe_id, "u1").await.unwrap();
        assert_eq!(token.len(), SHARE_TOKEN_LEN);
        assert!(token.bytes().all(|b| LOWER_ALNUM.contains(&b)));
        assert_eq!(
            get_share_token(&gateway, &recipe_id).await.unwrap().as_deref(),
            Some(token.as_str())
        );

        let shared = get_shared_recipe(&gateway, &token).await.unwrap().unwrap();
        assert_eq!(shared.recipe.title, "Shortbread");
        assert_eq!(shared.author.as_ref().unwrap().name(), "Ada");
        assert_eq!(shared.ingredients[0].name, "Butter");
        assert_eq!(
            shared.instructions[0].image.as_ref().unwrap().storage_path,
            "cream.jpg"
        );

        revoke_share_link(&gateway, &recipe_id).await.unwrap();
        assert!(get_shared_recipe(&gateway, &token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let gateway = MemoryGateway::new();
        assert!(get_shared_recipe(&gateway, "nope").await.unwrap().is_none());
    }

    #[test]
    fn test_share_url() {
        assert_eq!(
            share_url("https://recipes.example.com/", "abc"),
            "https://recipes.example.com/share/abc"
        );
    }
}
