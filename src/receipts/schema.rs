use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Nutrition breakdown owned by exactly one receipt. Every measurement is
/// independently nullable; a missing value is expected data, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub id: Uuid,
    pub calories_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbohydrates_g: Option<f64>,
    pub fats_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub sugars_g: Option<f64>,
    pub sodium_mg: Option<f64>,
}

/// One recipe record ("receipt" in this catalog's vocabulary — not a payment
/// receipt). `(slug, language)` identifies at most one row; everything past
/// `title` is optional display material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub nutritional_info_id: Option<Uuid>,
    pub language: String,
    pub slug: String,
    pub title: String,
    pub perfect_for: Option<String>,
    pub image_url: Option<String>,
    pub image_alt_text: Option<String>,
    pub prep_time: Option<String>,
    /// Display string, independent of `NutritionalInfo::calories_kcal`.
    pub calories: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub benefits: Vec<String>,
    pub how_to_prepare: Option<String>,
    pub quote: Option<String>,
    pub tags: Vec<Tag>,
    pub category: Option<String>,
    pub created_at: OffsetDateTime,
    pub nutritional_info: Option<NutritionalInfo>,
}

/// The backing JSONB column holds either bare strings or structured entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredient {
    Text(String),
    Detailed {
        name: String,
        #[serde(default)]
        quantity: Option<String>,
    },
}

impl Ingredient {
    pub fn display(&self) -> String {
        match self {
            Ingredient::Text(s) => s.clone(),
            Ingredient::Detailed {
                name,
                quantity: Some(q),
            } => format!("{} ({})", name, q),
            Ingredient::Detailed { name, .. } => name.clone(),
        }
    }
}

/// A tag is text plus an optional style classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Text(String),
    Styled {
        label: String,
        #[serde(default)]
        style: Option<String>,
    },
}

impl Tag {
    pub fn label(&self) -> &str {
        match self {
            Tag::Text(s) => s,
            Tag::Styled { label, .. } => label,
        }
    }

    pub fn style(&self) -> &str {
        match self {
            Tag::Styled { style: Some(s), .. } => s,
            _ => "default",
        }
    }
}
