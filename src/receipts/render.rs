use std::fmt::Write as _;

use super::schema::{NutritionalInfo, Receipt};
use super::view::ViewState;

/// Placeholder shown for missing optional scalars and nutrition values.
const PLACEHOLDER: &str = "N/A";

/// Presentation tree for one receipt. Each optional block's presence is
/// decided by a single null/empty check in [`blocks`], which keeps the render
/// pass a pure function of the record.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Header {
        title: String,
        category: Option<String>,
        perfect_for: String,
        prep_time: String,
        calories: String,
    },
    Image {
        url: String,
        alt: String,
    },
    Ingredients(Vec<String>),
    Benefits(Vec<String>),
    Preparation(String),
    Nutrition(NutritionalInfo),
    Quote(String),
    Tags(Vec<(String, String)>),
}

pub fn blocks(receipt: &Receipt) -> Vec<Block> {
    let mut out = vec![Block::Header {
        title: receipt.title.clone(),
        category: receipt.category.clone(),
        perfect_for: placeholder_or(&receipt.perfect_for),
        prep_time: placeholder_or(&receipt.prep_time),
        calories: placeholder_or(&receipt.calories),
    }];

    if let Some(url) = &receipt.image_url {
        out.push(Block::Image {
            url: url.clone(),
            alt: receipt
                .image_alt_text
                .clone()
                .unwrap_or_else(|| receipt.title.clone()),
        });
    }
    if !receipt.ingredients.is_empty() {
        out.push(Block::Ingredients(
            receipt.ingredients.iter().map(|i| i.display()).collect(),
        ));
    }
    if !receipt.benefits.is_empty() {
        out.push(Block::Benefits(receipt.benefits.clone()));
    }
    if let Some(text) = &receipt.how_to_prepare {
        out.push(Block::Preparation(text.clone()));
    }
    if let Some(nutrition) = &receipt.nutritional_info {
        out.push(Block::Nutrition(nutrition.clone()));
    }
    if let Some(quote) = &receipt.quote {
        out.push(Block::Quote(quote.clone()));
    }
    if !receipt.tags.is_empty() {
        out.push(Block::Tags(
            receipt
                .tags
                .iter()
                .map(|t| (t.label().to_string(), t.style().to_string()))
                .collect(),
        ));
    }
    out
}

/// Render the controller state as an HTML fragment. Priority order: loading
/// indicator, then error message, then the record, then the no-match notice.
pub fn render_view(state: &ViewState, slug: Option<&str>, language: &str) -> String {
    match state {
        ViewState::Loading => r#"<p class="loading">Loading receipt…</p>"#.to_string(),
        ViewState::Failed(e) => format!(r#"<p class="error">{}</p>"#, esc(&e.to_string())),
        ViewState::Loaded(receipt) => render_receipt(receipt),
        ViewState::Idle => match slug.filter(|s| !s.is_empty()) {
            Some(slug) => format!(
                r#"<p class="error">No receipt found for slug {} in language {}.</p>"#,
                esc(slug),
                esc(language)
            ),
            None => r#"<p class="error">No receipt slug provided.</p>"#.to_string(),
        },
    }
}

pub fn render_receipt(receipt: &Receipt) -> String {
    let mut html = String::new();
    for block in blocks(receipt) {
        render_block(&mut html, &block);
    }
    html
}

fn render_block(html: &mut String, block: &Block) {
    match block {
        Block::Header {
            title,
            category,
            perfect_for,
            prep_time,
            calories,
        } => {
            let _ = write!(html, "<h1>{}</h1>", esc(title));
            if let Some(category) = category {
                let _ = write!(html, r#"<p class="category">{}</p>"#, esc(category));
            }
            let _ = write!(
                html,
                r#"<ul class="meta"><li>Perfect for: {}</li><li>Prep time: {}</li><li>Calories: {}</li></ul>"#,
                esc(perfect_for),
                esc(prep_time),
                esc(calories)
            );
        }
        Block::Image { url, alt } => {
            let _ = write!(html, r#"<img src="{}" alt="{}">"#, esc(url), esc(alt));
        }
        Block::Ingredients(items) => render_list(html, "Ingredients", "ingredients", items),
        Block::Benefits(items) => render_list(html, "Benefits", "benefits", items),
        Block::Preparation(text) => {
            let _ = write!(
                html,
                r#"<section class="preparation"><h2>How to prepare</h2><p>{}</p></section>"#,
                esc(text)
            );
        }
        Block::Nutrition(n) => {
            let _ = write!(
                html,
                r#"<section class="nutrition"><h2>Nutritional information</h2><ul>{}{}{}{}{}{}{}</ul></section>"#,
                nutrition_item("Calories", n.calories_kcal, "kcal"),
                nutrition_item("Protein", n.protein_g, "g"),
                nutrition_item("Carbohydrates", n.carbohydrates_g, "g"),
                nutrition_item("Fats", n.fats_g, "g"),
                nutrition_item("Fiber", n.fiber_g, "g"),
                nutrition_item("Sugars", n.sugars_g, "g"),
                nutrition_item("Sodium", n.sodium_mg, "mg"),
            );
        }
        Block::Quote(quote) => {
            let _ = write!(html, "<blockquote>{}</blockquote>", esc(quote));
        }
        Block::Tags(tags) => {
            let _ = write!(html, r#"<ul class="tags">"#);
            for (label, style) in tags {
                let _ = write!(
                    html,
                    r#"<li class="tag tag-{}">{}</li>"#,
                    esc(style),
                    esc(label)
                );
            }
            html.push_str("</ul>");
        }
    }
}

fn render_list(html: &mut String, heading: &str, class: &str, items: &[String]) {
    let _ = write!(html, r#"<section class="{}"><h2>{}</h2><ul>"#, class, heading);
    for item in items {
        let _ = write!(html, "<li>{}</li>", esc(item));
    }
    html.push_str("</ul></section>");
}

/// One measurement line; a null value renders as the placeholder, unit-less.
fn nutrition_item(label: &str, value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("<li>{}: {} {}</li>", label, v, unit),
        None => format!("<li>{}: {}</li>", label, PLACEHOLDER),
    }
}

fn placeholder_or(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Minimal deterministic HTML escaping for user/content fields.
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::receipts::schema::{Ingredient, Tag};
    use crate::receipts::testing::{receipt, receipt_with_nutrition};
    use crate::receipts::view::ViewError;

    #[test]
    fn loading_state_renders_only_the_indicator() {
        let html = render_view(&ViewState::Loading, Some("mango-smoothie"), "en");
        assert!(html.contains("Loading receipt"));
        assert!(!html.contains("<h1>"));
    }

    #[test]
    fn error_state_renders_only_the_message() {
        let state = ViewState::Failed(ViewError::NotFound);
        let html = render_view(&state, Some("unknown-slug"), "en");
        assert_eq!(html, r#"<p class="error">Receipt not found.</p>"#);
    }

    #[test]
    fn idle_state_names_the_missing_pair() {
        let html = render_view(&ViewState::Idle, Some("mango-smoothie"), "es");
        assert!(html.contains("No receipt found for slug mango-smoothie in language es."));

        let html = render_view(&ViewState::Idle, None, "en");
        assert!(html.contains("No receipt slug provided."));
    }

    #[test]
    fn empty_sequences_omit_their_sections() {
        let bare = receipt("plain-toast", "en", "Plain Toast");
        let html = render_receipt(&bare);
        assert!(!html.contains("Ingredients"));
        assert!(!html.contains("Benefits"));
        assert!(!html.contains("How to prepare"));
        assert!(!html.contains("Nutritional information"));
        assert!(!html.contains("<blockquote>"));
        assert!(!html.contains(r#"class="tags""#));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn non_empty_sequences_keep_input_order() {
        let mut r = receipt("mango-smoothie", "en", "Mango Smoothie");
        r.ingredients = vec![
            Ingredient::Text("mango".into()),
            Ingredient::Text("yogurt".into()),
            Ingredient::Text("ice".into()),
        ];
        let html = render_receipt(&r);
        let mango = html.find("<li>mango</li>").unwrap();
        let yogurt = html.find("<li>yogurt</li>").unwrap();
        let ice = html.find("<li>ice</li>").unwrap();
        assert!(mango < yogurt && yogurt < ice);
    }

    #[test]
    fn missing_scalars_render_the_placeholder() {
        let r = receipt("plain-toast", "en", "Plain Toast");
        let html = render_receipt(&r);
        assert!(html.contains("Perfect for: N/A"));
        assert!(html.contains("Prep time: N/A"));
        assert!(html.contains("Calories: N/A"));
    }

    #[test]
    fn nutrition_values_render_with_units_and_nulls_as_placeholder() {
        let r = receipt_with_nutrition("mango-smoothie", "en", "Mango Smoothie", Some(180.0));
        let html = render_receipt(&r);
        assert!(html.contains("Calories: 180 kcal"));
        assert!(html.contains("<li>Protein: N/A</li>"));
        assert!(html.contains("<li>Sodium: N/A</li>"));
    }

    #[test]
    fn loaded_scenario_shows_title_ingredients_and_calories() {
        let mut r = receipt_with_nutrition("mango-smoothie", "en", "Mango Smoothie", Some(180.0));
        r.ingredients = vec![
            Ingredient::Text("mango".into()),
            Ingredient::Text("yogurt".into()),
        ];
        let html = render_view(&ViewState::Loaded(r), Some("mango-smoothie"), "en");
        assert!(html.contains("<h1>Mango Smoothie</h1>"));
        assert_eq!(html.matches("<li>mango</li>").count(), 1);
        assert_eq!(html.matches("<li>yogurt</li>").count(), 1);
        assert!(html.contains("Calories: 180 kcal"));
    }

    #[test]
    fn tags_render_with_style_classifier_or_default() {
        let mut r = receipt("mango-smoothie", "en", "Mango Smoothie");
        r.tags = vec![
            Tag::Text("vegan".into()),
            Tag::Styled {
                label: "summer".into(),
                style: Some("highlight".into()),
            },
        ];
        let html = render_receipt(&r);
        assert!(html.contains(r#"<li class="tag tag-default">vegan</li>"#));
        assert!(html.contains(r#"<li class="tag tag-highlight">summer</li>"#));
    }

    #[test]
    fn content_fields_are_html_escaped() {
        let mut r = receipt("sneaky", "en", "<script>alert(1)</script>");
        r.quote = Some(r#"say "cheese" & smile"#.into());
        let html = render_receipt(&r);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("say &quot;cheese&quot; &amp; smile"));
    }

    #[test]
    fn image_block_present_only_with_url_and_falls_back_to_title_alt() {
        let mut r = receipt("mango-smoothie", "en", "Mango Smoothie");
        r.image_url = Some("https://img.example/mango.jpg".into());
        let html = render_receipt(&r);
        assert!(html.contains(r#"<img src="https://img.example/mango.jpg" alt="Mango Smoothie">"#));
    }
}
