use std::collections::HashMap;

use axum::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::schema::{Ingredient, NutritionalInfo, Receipt, Tag};

/// Flat row shape for the joined point lookup. Nutrition columns come from
/// the LEFT JOIN and are all nullable; `n_id` being present is what tells us
/// a nutrition row matched.
#[derive(Debug, FromRow)]
pub struct ReceiptRow {
    pub id: Uuid,
    pub nutritional_info_id: Option<Uuid>,
    pub language: String,
    pub slug: String,
    pub title: String,
    pub perfect_for: Option<String>,
    pub image_url: Option<String>,
    pub image_alt_text: Option<String>,
    pub prep_time: Option<String>,
    pub calories: Option<String>,
    pub ingredients: Option<Json<Vec<Ingredient>>>,
    pub benefits: Option<Json<Vec<String>>>,
    pub how_to_prepare: Option<String>,
    pub quote: Option<String>,
    pub tags: Option<Json<Vec<Tag>>>,
    pub category: Option<String>,
    pub created_at: OffsetDateTime,
    pub n_id: Option<Uuid>,
    pub n_calories_kcal: Option<f64>,
    pub n_protein_g: Option<f64>,
    pub n_carbohydrates_g: Option<f64>,
    pub n_fats_g: Option<f64>,
    pub n_fiber_g: Option<f64>,
    pub n_sugars_g: Option<f64>,
    pub n_sodium_mg: Option<f64>,
}

impl From<ReceiptRow> for Receipt {
    fn from(r: ReceiptRow) -> Self {
        let nutritional_info = r.n_id.map(|id| NutritionalInfo {
            id,
            calories_kcal: r.n_calories_kcal,
            protein_g: r.n_protein_g,
            carbohydrates_g: r.n_carbohydrates_g,
            fats_g: r.n_fats_g,
            fiber_g: r.n_fiber_g,
            sugars_g: r.n_sugars_g,
            sodium_mg: r.n_sodium_mg,
        });
        Self {
            id: r.id,
            nutritional_info_id: r.nutritional_info_id,
            language: r.language,
            slug: r.slug,
            title: r.title,
            perfect_for: r.perfect_for,
            image_url: r.image_url,
            image_alt_text: r.image_alt_text,
            prep_time: r.prep_time,
            calories: r.calories,
            ingredients: r.ingredients.map(|Json(v)| v).unwrap_or_default(),
            benefits: r.benefits.map(|Json(v)| v).unwrap_or_default(),
            how_to_prepare: r.how_to_prepare,
            quote: r.quote,
            tags: r.tags.map(|Json(v)| v).unwrap_or_default(),
            category: r.category,
            created_at: r.created_at,
            nutritional_info,
        }
    }
}

/// Read-only lookup seam between the view controller and the data backend.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    async fn find_by_slug(&self, slug: &str, language: &str) -> anyhow::Result<Option<Receipt>>;
}

#[async_trait]
impl ReceiptStore for PgPool {
    async fn find_by_slug(&self, slug: &str, language: &str) -> anyhow::Result<Option<Receipt>> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT r.id, r.nutritional_info_id, r.language, r.slug, r.title,
                   r.perfect_for, r.image_url, r.image_alt_text, r.prep_time, r.calories,
                   r.ingredients, r.benefits, r.how_to_prepare, r.quote, r.tags,
                   r.category, r.created_at,
                   n.id AS n_id,
                   n.calories_kcal AS n_calories_kcal,
                   n.protein_g AS n_protein_g,
                   n.carbohydrates_g AS n_carbohydrates_g,
                   n.fats_g AS n_fats_g,
                   n.fiber_g AS n_fiber_g,
                   n.sugars_g AS n_sugars_g,
                   n.sodium_mg AS n_sodium_mg
            FROM receipts r
            LEFT JOIN nutritional_info n ON n.id = r.nutritional_info_id
            WHERE r.slug = $1 AND r.language = $2
            LIMIT 1
            "#,
        )
        .bind(slug)
        .bind(language)
        .fetch_optional(self)
        .await?;
        Ok(row.map(Receipt::from))
    }
}

/// In-memory store keyed by `(slug, language)`; backs `AppState::fake()` and
/// the controller tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    receipts: HashMap<(String, String), Receipt>,
}

impl MemoryStore {
    pub fn insert(&mut self, receipt: Receipt) {
        self.receipts
            .insert((receipt.slug.clone(), receipt.language.clone()), receipt);
    }
}

#[async_trait]
impl ReceiptStore for MemoryStore {
    async fn find_by_slug(&self, slug: &str, language: &str) -> anyhow::Result<Option<Receipt>> {
        Ok(self
            .receipts
            .get(&(slug.to_string(), language.to_string()))
            .cloned())
    }
}
