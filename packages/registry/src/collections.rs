//! # Collection edits
//!
//! Adds and removes sub-items of list-valued sections. Parallel arrays
//! (`cards`: titles / descriptions / imageUrls) are validated as a group and
//! updated together or not at all, and the `count` field tracks their length.
//! Every function takes the current bag by reference and returns a new one.

use crate::data::DataBag;
use crate::section::{Collection, SectionType};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    #[error("Section type {0} has no repeatable items")]
    NoCollection(SectionType),

    #[error("Field {0} is missing or not an array")]
    MissingField(String),

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Parallel fields disagree on length: {0:?}")]
    LengthMismatch(Vec<(String, usize)>),
}

/// Template used when a new item is appended
fn item_template(section: SectionType) -> Option<Vec<Value>> {
    let template = match section {
        SectionType::Navbar => vec![json!({ "label": "New Link", "href": "#" })],
        SectionType::Buttons => vec![json!({ "label": "New Button", "href": "#" })],
        SectionType::Cards => vec![json!("New Card"), json!("New description"), json!("")],
        SectionType::Testimonials => vec![json!({
            "name": "New Person",
            "role": "Role",
            "quote": "Add a quote here.",
            "imageUrl": ""
        })],
        SectionType::Pricing => vec![json!({
            "name": "New Plan",
            "price": "$0",
            "features": ["Feature"],
            "highlighted": false,
            "buttonLabel": "Get Started",
            "buttonHref": "#"
        })],
        SectionType::Features | SectionType::FeaturesGrid | SectionType::Timeline => {
            vec![json!({ "title": "New Item", "description": "Describe it here." })]
        }
        SectionType::Stats => vec![json!({ "label": "Label", "value": "0" })],
        SectionType::Faq => vec![json!({ "question": "New question?", "answer": "Answer." })],
        SectionType::LogoGrid => vec![json!("")],
        SectionType::Hero
        | SectionType::RichText
        | SectionType::Text
        | SectionType::Image
        | SectionType::Contact
        | SectionType::Video
        | SectionType::Cta
        | SectionType::Divider
        | SectionType::Footer => return None,
    };
    Some(template)
}

fn array_len(data: &DataBag, field: &str) -> Result<usize, CollectionError> {
    data.get_array(field)
        .map(Vec::len)
        .ok_or_else(|| CollectionError::MissingField(field.to_string()))
}

/// Length shared by every parallel field, or the mismatch
fn parallel_len(data: &DataBag, fields: &[&str]) -> Result<usize, CollectionError> {
    let lengths = fields
        .iter()
        .map(|f| array_len(data, f).map(|len| (f.to_string(), len)))
        .collect::<Result<Vec<_>, _>>()?;

    match lengths.first() {
        Some((_, first)) if lengths.iter().all(|(_, len)| len == first) => Ok(*first),
        Some(_) => Err(CollectionError::LengthMismatch(lengths)),
        None => Ok(0),
    }
}

/// Number of items in the section's collection
pub fn item_count(section: SectionType, data: &DataBag) -> Result<usize, CollectionError> {
    match section.spec().collection {
        Some(Collection::Items { field }) => array_len(data, field),
        Some(Collection::Parallel { fields, .. }) => parallel_len(data, fields),
        None => Err(CollectionError::NoCollection(section)),
    }
}

/// Whether every parallel array (and the count field, if any) agrees
pub fn parallel_arrays_consistent(section: SectionType, data: &DataBag) -> bool {
    match section.spec().collection {
        Some(Collection::Parallel { fields, count }) => match parallel_len(data, fields) {
            Ok(len) => count
                .and_then(|c| data.get(c))
                .and_then(Value::as_u64)
                .map_or(true, |n| n as usize == len),
            Err(_) => false,
        },
        _ => true,
    }
}

/// Append a new item built from the section's template
pub fn add_item(section: SectionType, data: &DataBag) -> Result<DataBag, CollectionError> {
    let collection = section
        .spec()
        .collection
        .ok_or(CollectionError::NoCollection(section))?;
    let template = item_template(section).ok_or(CollectionError::NoCollection(section))?;

    let mut next = data.clone();
    match collection {
        Collection::Items { field } => {
            let mut items = data
                .get_array(field)
                .cloned()
                .ok_or_else(|| CollectionError::MissingField(field.to_string()))?;
            items.extend(template);
            next.set(field, items);
        }
        Collection::Parallel { fields, count } => {
            let len = parallel_len(data, fields)?;
            for (field, value) in fields.iter().zip(template) {
                let mut items = data.get_array(field).cloned().unwrap_or_default();
                items.push(value);
                next.set(*field, items);
            }
            if let Some(count) = count {
                next.set(count, len + 1);
            }
        }
    }
    Ok(next)
}

/// Remove the item at `index`
pub fn remove_item(
    section: SectionType,
    data: &DataBag,
    index: usize,
) -> Result<DataBag, CollectionError> {
    let collection = section
        .spec()
        .collection
        .ok_or(CollectionError::NoCollection(section))?;

    let mut next = data.clone();
    match collection {
        Collection::Items { field } => {
            let mut items = data
                .get_array(field)
                .cloned()
                .ok_or_else(|| CollectionError::MissingField(field.to_string()))?;
            if index >= items.len() {
                return Err(CollectionError::IndexOutOfRange { index, len: items.len() });
            }
            items.remove(index);
            next.set(field, items);
        }
        Collection::Parallel { fields, count } => {
            let len = parallel_len(data, fields)?;
            if index >= len {
                return Err(CollectionError::IndexOutOfRange { index, len });
            }
            for field in fields {
                let mut items = data.get_array(field).cloned().unwrap_or_default();
                items.remove(index);
                next.set(*field, items);
            }
            if let Some(count) = count {
                next.set(count, len - 1);
            }
        }
    }
    Ok(next)
}

fn plan_features(data: &DataBag, plan: usize) -> Result<(Vec<Value>, Vec<Value>), CollectionError> {
    let plans = data
        .get_array("plans")
        .cloned()
        .ok_or_else(|| CollectionError::MissingField("plans".to_string()))?;
    let features = plans
        .get(plan)
        .ok_or(CollectionError::IndexOutOfRange { index: plan, len: plans.len() })?
        .get("features")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| CollectionError::MissingField(format!("plans[{}].features", plan)))?;
    Ok((plans, features))
}

fn with_plan_features(data: &DataBag, mut plans: Vec<Value>, plan: usize, features: Vec<Value>) -> DataBag {
    if let Some(Value::Object(entry)) = plans.get_mut(plan) {
        entry.insert("features".to_string(), Value::Array(features));
    }
    data.clone().with("plans", plans)
}

/// Append a feature line to pricing plan `plan`
pub fn add_plan_feature(data: &DataBag, plan: usize, feature: &str) -> Result<DataBag, CollectionError> {
    let (plans, mut features) = plan_features(data, plan)?;
    features.push(Value::String(feature.to_string()));
    Ok(with_plan_features(data, plans, plan, features))
}

/// Remove feature line `index` from pricing plan `plan`
pub fn remove_plan_feature(data: &DataBag, plan: usize, index: usize) -> Result<DataBag, CollectionError> {
    let (plans, mut features) = plan_features(data, plan)?;
    if index >= features.len() {
        return Err(CollectionError::IndexOutOfRange { index, len: features.len() });
    }
    features.remove(index);
    Ok(with_plan_features(data, plans, plan, features))
}
