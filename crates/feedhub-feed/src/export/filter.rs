//! Export row filters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ExportRow;
use crate::coerce::coerce_number;

/// Default key holding the stock level.
pub const DEFAULT_STOCK_FIELD: &str = "stock";
/// Default key holding the price.
pub const DEFAULT_PRICE_FIELD: &str = "price";

/// Row filters stored on an export profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFilters {
    /// Keep only rows whose stock value is `true` or a number above zero.
    pub in_stock_only: bool,
    /// Key of the stock value (defaults to `stock`).
    pub stock_field: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Key of the price value (defaults to `price`).
    pub price_field: Option<String>,
    /// Keep only rows assigned to one of these categories.
    pub category_ids: Vec<Uuid>,
}

impl ExportFilters {
    /// Effective stock key.
    pub fn stock_field(&self) -> &str {
        non_blank(self.stock_field.as_deref()).unwrap_or(DEFAULT_STOCK_FIELD)
    }

    /// Effective price key.
    pub fn price_field(&self) -> &str {
        non_blank(self.price_field.as_deref()).unwrap_or(DEFAULT_PRICE_FIELD)
    }

    /// Check the filters are coherent.
    pub fn validate(&self) -> Result<(), String> {
        for bound in [self.min_price, self.max_price].into_iter().flatten() {
            if !bound.is_finite() {
                return Err("price bounds must be finite numbers".to_string());
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(format!("min_price ({min}) exceeds max_price ({max})"));
            }
        }
        Ok(())
    }

    /// Whether `row` passes every configured filter.
    pub fn matches(&self, row: &ExportRow<'_>) -> bool {
        if self.in_stock_only && !in_stock(row.data.get(self.stock_field())) {
            return false;
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = row.data.get(self.price_field()).and_then(coerce_number) else {
                return false;
            };
            if self.min_price.is_some_and(|min| price < min)
                || self.max_price.is_some_and(|max| price > max)
            {
                return false;
            }
        }
        if !self.category_ids.is_empty()
            && !row
                .category_id
                .is_some_and(|id| self.category_ids.contains(&id))
        {
            return false;
        }
        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn in_stock(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(other) => coerce_number(other).is_some_and(|n| n > 0.0),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldMap;
    use serde_json::json;

    fn data(v: Value) -> FieldMap {
        v.as_object().cloned().unwrap()
    }

    fn row(data: &FieldMap) -> ExportRow<'_> {
        ExportRow {
            data,
            category_id: None,
        }
    }

    #[test]
    fn test_in_stock() {
        let filters = ExportFilters {
            in_stock_only: true,
            stock_field: Some("qty".into()),
            ..Default::default()
        };
        assert!(filters.matches(&row(&data(json!({"qty": 2})))));
        assert!(filters.matches(&row(&data(json!({"qty": true})))));
        assert!(filters.matches(&row(&data(json!({"qty": "5"})))));
        assert!(!filters.matches(&row(&data(json!({"qty": 0})))));
        assert!(!filters.matches(&row(&data(json!({"qty": false})))));
        assert!(!filters.matches(&row(&data(json!({"stock": 9})))));
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let filters = ExportFilters {
            min_price: Some(10.0),
            max_price: Some(20.0),
            ..Default::default()
        };
        assert!(filters.matches(&row(&data(json!({"price": 10})))));
        assert!(filters.matches(&row(&data(json!({"price": 20.0})))));
        assert!(!filters.matches(&row(&data(json!({"price": 20.01})))));
        assert!(!filters.matches(&row(&data(json!({"price": null})))));
        assert!(!filters.matches(&row(&data(json!({})))));
    }

    #[test]
    fn test_category_set() {
        let wanted = Uuid::new_v4();
        let filters = ExportFilters {
            category_ids: vec![wanted],
            ..Default::default()
        };
        let d = data(json!({}));
        assert!(filters.matches(&ExportRow { data: &d, category_id: Some(wanted) }));
        assert!(!filters.matches(&ExportRow { data: &d, category_id: Some(Uuid::new_v4()) }));
        assert!(!filters.matches(&row(&d)));
    }

    #[test]
    fn test_validate_bounds() {
        let bad = ExportFilters {
            min_price: Some(5.0),
            max_price: Some(1.0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!(ExportFilters::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let filters: ExportFilters = serde_json::from_value(json!({"in_stock_only": true})).unwrap();
        assert!(filters.in_stock_only);
        assert_eq!(filters.stock_field(), "stock");
        assert_eq!(filters.price_field(), "price");
    }
}
