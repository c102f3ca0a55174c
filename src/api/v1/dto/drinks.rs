/*
 * Responsibility
 * - Drinks request/response DTOs
 * - Two response shapes: "short" (public menu) hides ingredient names,
 *   "long" (privileged) is the full recipe
 */
use serde::{Deserialize, Serialize};

/// One ingredient of a recipe as stored and as served to privileged callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePart {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// Public view of an ingredient: proportions and color only.
#[derive(Debug, Serialize)]
pub struct ShortRecipePart {
    pub color: String,
    pub parts: i64,
}

impl From<RecipePart> for ShortRecipePart {
    fn from(part: RecipePart) -> Self {
        Self {
            color: part.color,
            parts: part.parts,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortRecipePart>,
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

/// Both fields are required; they are `Option` so their absence maps to a
/// 422 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<RecipePart>>,
}

/// Partial update: absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<RecipePart>>,
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}
