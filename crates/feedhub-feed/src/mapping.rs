//! Raw row to custom-schema mapping.

use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use crate::FieldMap;
use crate::coerce::{FieldDatatype, coerce_value, value_to_text};

/// A custom field as seen by the mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetField {
    /// Custom field key.
    pub key: String,
    /// Datatype the value is coerced into.
    pub datatype: FieldDatatype,
    /// Whether the value assigns the product's category.
    pub is_category_field: bool,
}

/// The outcome of mapping one raw row.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    /// Coerced values keyed by custom field key.
    pub data: FieldMap,
    /// Category resolved from a category field, if any.
    pub category_id: Option<Uuid>,
}

/// Precomputed mapping from supplier keys to custom fields.
#[derive(Debug, Clone)]
pub struct MappingPlan {
    fields: Vec<TargetField>,
    sources: HashMap<String, Vec<String>>,
}

impl MappingPlan {
    /// Build a plan from custom fields and `(source_key, field_key)` pairs.
    ///
    /// Mappings pointing at unknown fields are ignored.
    pub fn new<'a>(
        fields: Vec<TargetField>,
        mappings: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut sources: HashMap<String, Vec<String>> = HashMap::new();
        for (source_key, field_key) in mappings {
            if fields.iter().any(|f| f.key == field_key) {
                sources
                    .entry(field_key.to_string())
                    .or_default()
                    .push(source_key.to_string());
            }
        }
        Self { fields, sources }
    }

    /// Custom fields covered by the plan.
    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    /// Map and coerce one raw row.
    ///
    /// For each field the first mapped source key present in `raw` wins;
    /// without a mapping the field's own key is read. Absent values are
    /// omitted from the result.
    pub fn apply(&self, raw: &FieldMap, categories: &CategoryMatcher) -> MappedRow {
        let mut data = FieldMap::new();
        let mut category_id = None;
        for field in &self.fields {
            let Some(value) = self.source_value(field, raw) else {
                continue;
            };
            let coerced = coerce_value(value, field.datatype);
            if field.is_category_field && category_id.is_none() {
                category_id = categories.resolve(&coerced);
            }
            data.insert(field.key.clone(), coerced);
        }
        MappedRow { data, category_id }
    }

    fn source_value<'r>(&self, field: &TargetField, raw: &'r FieldMap) -> Option<&'r Value> {
        match self.sources.get(&field.key) {
            Some(keys) => keys.iter().find_map(|k| raw.get(k)),
            None => raw.get(&field.key),
        }
    }
}

/// Case-insensitive lookup of categories by path, then by name.
#[derive(Debug, Clone, Default)]
pub struct CategoryMatcher {
    by_path: HashMap<String, Uuid>,
    by_name: HashMap<String, Uuid>,
}

impl CategoryMatcher {
    /// Build a matcher from `(id, path, name)` triples.
    ///
    /// When several categories share a name the first one wins.
    pub fn new<'a>(categories: impl IntoIterator<Item = (Uuid, &'a str, &'a str)>) -> Self {
        let mut matcher = Self::default();
        for (id, path, name) in categories {
            matcher.by_path.entry(normalize(path)).or_insert(id);
            matcher.by_name.entry(normalize(name)).or_insert(id);
        }
        matcher
    }

    /// Resolve a category value to a category id.
    pub fn resolve(&self, value: &Value) -> Option<Uuid> {
        let text = normalize(&value_to_text(value));
        if text.is_empty() {
            return None;
        }
        self.by_path
            .get(&text)
            .or_else(|| self.by_name.get(&text))
            .copied()
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(key: &str, datatype: FieldDatatype) -> TargetField {
        TargetField {
            key: key.to_string(),
            datatype,
            is_category_field: false,
        }
    }

    const NO_MAPPINGS: [(&str, &str); 0] = [];

    fn raw(v: Value) -> FieldMap {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_mapping_then_fallback() {
        let plan = MappingPlan::new(
            vec![
                field("sku", FieldDatatype::String),
                field("price", FieldDatatype::Number),
                field("stock", FieldDatatype::Number),
            ],
            [("Artikelnummer", "sku"), ("Preis", "price"), ("x", "unknown")],
        );
        let row = plan.apply(
            &raw(json!({"Artikelnummer": "A2", "Preis": "1,200", "price": "5", "stock": "3"})),
            &CategoryMatcher::default(),
        );
        assert_eq!(row.data, raw(json!({"sku": "A2", "price": 1200, "stock": 3})));
    }

    #[test]
    fn test_absent_values_are_omitted() {
        let plan = MappingPlan::new(vec![field("ean", FieldDatatype::String)], NO_MAPPINGS);
        let row = plan.apply(&raw(json!({"sku": "A1"})), &CategoryMatcher::default());
        assert!(row.data.is_empty());
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let plan = MappingPlan::new(
            vec![field("sku", FieldDatatype::String), field("price", FieldDatatype::Number)],
            NO_MAPPINGS,
        );
        let input = raw(json!({"sku": "A1", "price": "9.99"}));
        let first = plan.apply(&input, &CategoryMatcher::default());
        let second = plan.apply(&input, &CategoryMatcher::default());
        assert_eq!(first, second);
        assert_eq!(first.data["price"], json!(9.99));
    }

    #[test]
    fn test_category_matching() {
        let phones = Uuid::new_v4();
        let electronics = Uuid::new_v4();
        let categories = CategoryMatcher::new([
            (electronics, "Electronics", "Electronics"),
            (phones, "Electronics > Phones", "Phones"),
        ]);
        let mut cat = field("category", FieldDatatype::String);
        cat.is_category_field = true;
        let plan = MappingPlan::new(vec![cat], NO_MAPPINGS);

        let by_path = plan.apply(&raw(json!({"category": "electronics > PHONES"})), &categories);
        assert_eq!(by_path.category_id, Some(phones));

        let by_name = plan.apply(&raw(json!({"category": " phones "})), &categories);
        assert_eq!(by_name.category_id, Some(phones));

        let unknown = plan.apply(&raw(json!({"category": "Garden"})), &categories);
        assert_eq!(unknown.category_id, None);
        assert_eq!(unknown.data["category"], json!("Garden"));
    }
}
