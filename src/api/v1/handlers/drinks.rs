/*
 * Responsibility
 * - /drinks CRUD handlers
 * - Shape stored rows into the short (public) / long (privileged)
 *   representations
 * - Protected handlers receive the verified Claims via the AuthClaims
 *   extractor; the permission itself is enforced by the route's gate
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::v1::{
        dto::drinks::{
            CreateDrinkRequest, DeleteResponse, DrinkLong, DrinkShort, DrinksResponse,
            RecipePart, ShortRecipePart, UpdateDrinkRequest,
        },
        extractors::AuthClaims,
    },
    error::AppError,
    repos::drink_repo::{self, DrinkRow},
    state::AppState,
};

fn parse_recipe(row: &DrinkRow) -> Result<Vec<RecipePart>, AppError> {
    serde_json::from_str(&row.recipe).map_err(|err| {
        tracing::error!(error = %err, drink_id = row.id, "stored recipe is not valid JSON");
        AppError::Internal
    })
}

fn row_to_long(row: DrinkRow) -> Result<DrinkLong, AppError> {
    let recipe = parse_recipe(&row)?;
    Ok(DrinkLong {
        id: row.id,
        title: row.title,
        recipe,
    })
}

fn row_to_short(row: DrinkRow) -> Result<DrinkShort, AppError> {
    let recipe = parse_recipe(&row)?
        .into_iter()
        .map(ShortRecipePart::from)
        .collect();
    Ok(DrinkShort {
        id: row.id,
        title: row.title,
        recipe,
    })
}

/// GET /drinks. Public menu; an empty menu is a success with an empty list.
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let rows = drink_repo::list(&state.db).await?;

    let mut drinks = Vec::with_capacity(rows.len());
    for row in rows {
        drinks.push(row_to_short(row)?);
    }

    Ok(Json(DrinksResponse::new(drinks)))
}

/// GET /drinks-detail. Requires `get:drinks-detail`.
pub async fn list_drinks_detail(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let rows = drink_repo::list(&state.db).await?;

    let mut drinks = Vec::with_capacity(rows.len());
    for row in rows {
        drinks.push(row_to_long(row)?);
    }

    Ok(Json(DrinksResponse::new(drinks)))
}

/// POST /drinks. Requires `post:drinks`.
pub async fn create_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(req): Json<CreateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let (Some(title), Some(recipe)) = (req.title, req.recipe) else {
        return Err(AppError::Unprocessable);
    };

    let serialized = serde_json::to_string(&recipe).map_err(|_| AppError::Internal)?;
    let row = drink_repo::create(&state.db, &title, &serialized).await?;

    tracing::info!(sub = %claims.sub, drink_id = row.id, "drink created");
    Ok(Json(DrinksResponse::new(vec![row_to_long(row)?])))
}

/// PATCH /drinks/{id}. Requires `patch:drinks`; 404 when the id is unknown.
pub async fn update_drink(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AuthClaims(_claims): AuthClaims,
    Json(req): Json<UpdateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let recipe_json = match &req.recipe {
        Some(recipe) => Some(serde_json::to_string(recipe).map_err(|_| AppError::Internal)?),
        None => None,
    };

    let row = drink_repo::update(&state.db, id, req.title.as_deref(), recipe_json.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("drink"))?;

    Ok(Json(DrinksResponse::new(vec![row_to_long(row)?])))
}

/// DELETE /drinks/{id}. Requires `delete:drinks`; 404 when the id is unknown.
pub async fn delete_drink(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AuthClaims(claims): AuthClaims,
) -> Result<Json<DeleteResponse>, AppError> {
    if !drink_repo::delete(&state.db, id).await? {
        return Err(AppError::not_found("drink"));
    }

    tracing::info!(sub = %claims.sub, drink_id = id, "drink deleted");
    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(recipe: &str) -> DrinkRow {
        DrinkRow {
            id: 7,
            title: "matcha shake".to_owned(),
            recipe: recipe.to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn long_view_keeps_the_full_recipe() {
        let row = row(r#"[{"name":"milk","color":"white","parts":3}]"#);
        let long = row_to_long(row).unwrap();

        assert_eq!(long.id, 7);
        assert_eq!(long.recipe.len(), 1);
        assert_eq!(long.recipe[0].name, "milk");
    }

    #[test]
    fn short_view_hides_ingredient_names() {
        let row = row(r#"[{"name":"matcha","color":"green","parts":1}]"#);
        let short = row_to_short(row).unwrap();

        let value = serde_json::to_value(&short.recipe).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "color": "green", "parts": 1 }])
        );
    }

    #[test]
    fn corrupt_stored_recipe_is_an_internal_error() {
        let row = row("not json");
        assert!(matches!(row_to_long(row), Err(AppError::Internal)));
    }
}
