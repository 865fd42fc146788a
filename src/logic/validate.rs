//! Field-level checks and sanitizing for catalog form submissions.
//!
//! Every `validate_*` function is a pure transform: it trims and escapes the
//! raw submission and either builds the typed record or hands the sanitized
//! form back together with the per-field errors, so the caller can show each
//! message next to the value that caused it.

use chrono::NaiveDate;
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::model::{Condition, NewCategory, NewItem, NewItemInstance};

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_PRICE_SCALE: u32 = 2;
pub const PRICE_LIMIT: i64 = 10_000_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered list of field errors; never empty when returned inside [`Invalid`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages recorded against `field`, in submission order
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.for_field(field).next().is_some()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .join("; ");
        write!(f, "{}", joined)
    }
}

/// A rejected submission: the sanitized input plus what is wrong with it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invalid<F> {
    pub form: F,
    pub errors: ValidationErrors,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    /// Accepts a single id or a list of ids
    #[serde(deserialize_with = "one_or_many")]
    pub category: Vec<String>,
    pub launch_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemInstanceForm {
    pub item: String,
    pub condition: String,
    /// Accepts a JSON string or number
    #[serde(deserialize_with = "string_or_number")]
    pub price: String,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Submitted {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Submitted>::deserialize(deserializer)? {
        Some(Submitted::One(value)) => vec![value],
        Some(Submitted::Many(values)) => values,
        None => Vec::new(),
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Submitted {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Submitted>::deserialize(deserializer)? {
        Some(Submitted::Text(value)) => value,
        Some(Submitted::Number(value)) => value.to_string(),
        None => String::new(),
    })
}

/// Escape the characters that could open markup when the text is rendered
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Reverse `escape_html`, used to pre-fill update forms with the text as typed
pub fn unescape_html(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&#x5C;", "\\")
        .replace("&#96;", "`")
        // Last, so an escaped entity such as `&amp;lt;` comes back as `&lt;`
        .replace("&amp;", "&")
}

fn sanitize_text(input: &str) -> String {
    escape_html(input.trim())
}

fn check_name(errors: &mut ValidationErrors, raw: &str, required_message: &str) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push("name", required_message);
    } else if trimmed.chars().count() > MAX_NAME_LENGTH {
        errors.push(
            "name",
            format!("Name must be at most {} characters", MAX_NAME_LENGTH),
        );
    }
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub fn parse_launch_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| "Invalid date".to_string())
}

pub fn parse_price(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Price required".to_string());
    }
    let price = Decimal::from_str(trimmed).map_err(|_| "Price must be a decimal number".to_string())?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err("Price must not be negative".to_string());
    }
    // Stored as NUMERIC(12, 2): at most two fractional and ten integer digits.
    let price = price.normalize();
    if price.scale() > MAX_PRICE_SCALE {
        return Err(format!(
            "Price must have at most {} decimal places",
            MAX_PRICE_SCALE
        ));
    }
    if price.abs() >= Decimal::from(PRICE_LIMIT) {
        return Err(format!("Price must be below {}", PRICE_LIMIT));
    }
    Ok(price)
}

pub fn parse_condition(raw: &str) -> Result<Condition, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Condition::default());
    }
    trimmed.parse::<Condition>().map_err(|_| {
        format!(
            "Condition must be one of: {}",
            Condition::ALL.iter().map(|c| c.as_str()).join(", ")
        )
    })
}

pub fn validate_category(form: CategoryForm) -> Result<NewCategory, Invalid<CategoryForm>> {
    let mut errors = ValidationErrors::new();
    check_name(&mut errors, &form.name, "Category name required");

    let sanitized = CategoryForm {
        name: sanitize_text(&form.name),
        description: sanitize_text(&form.description),
    };

    if !errors.is_empty() {
        return Err(Invalid {
            form: sanitized,
            errors,
        });
    }

    Ok(NewCategory {
        name: sanitized.name,
        description: none_if_empty(sanitized.description),
    })
}

pub fn validate_item(form: ItemForm) -> Result<NewItem, Invalid<ItemForm>> {
    let mut errors = ValidationErrors::new();
    check_name(&mut errors, &form.name, "Item name required");

    if form.description.trim().is_empty() {
        errors.push("description", "Description required");
    }

    let category: Vec<String> = form
        .category
        .iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unique()
        .collect();
    if category.is_empty() {
        errors.push("category", "Select at least one category");
    }

    let launch_date = match parse_launch_date(&form.launch_date) {
        Ok(date) => date,
        Err(message) => {
            errors.push("launch_date", message);
            None
        }
    };

    let sanitized = ItemForm {
        name: sanitize_text(&form.name),
        description: sanitize_text(&form.description),
        category,
        launch_date: form.launch_date.trim().to_string(),
    };

    if !errors.is_empty() {
        return Err(Invalid {
            form: sanitized,
            errors,
        });
    }

    Ok(NewItem {
        name: sanitized.name,
        description: sanitized.description,
        category: sanitized.category,
        launch_date,
    })
}

pub fn validate_item_instance(
    form: ItemInstanceForm,
) -> Result<NewItemInstance, Invalid<ItemInstanceForm>> {
    let mut errors = ValidationErrors::new();

    let item = form.item.trim().to_string();
    if item.is_empty() {
        errors.push("item", "Item must be specified");
    }

    let condition = parse_condition(&form.condition)
        .map_err(|message| errors.push("condition", message))
        .ok();
    let price = parse_price(&form.price)
        .map_err(|message| errors.push("price", message))
        .ok();

    let sanitized = ItemInstanceForm {
        item,
        condition: form.condition.trim().to_string(),
        price: form.price.trim().to_string(),
    };

    match (condition, price) {
        (Some(condition), Some(price)) if errors.is_empty() => Ok(NewItemInstance {
            item: sanitized.item,
            condition,
            price,
        }),
        _ => Err(Invalid {
            form: sanitized,
            errors,
        }),
    }
}
