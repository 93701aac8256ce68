//! Query evaluation: search, filters and sorting over a collection
//!
//! The visible list of a store is always [`visible_list`] of its collection
//! and criteria. Nothing here mutates the input collection.

use crate::core::entity::Listable;
use crate::core::field::FieldValue;
use crate::core::query::{Criteria, FilterOptions, SortDirection, SortDirective};
use std::cmp::Ordering;

/// Trait for stores that support searching, filtering and sorting
///
/// Implementors only provide [`list_all`](QueryableStore::list_all); the
/// query steps have default implementations shared by every store.
pub trait QueryableStore<T: Listable>: Send + Sync {
    /// Get all entities (unfiltered, unsorted)
    fn list_all(&self) -> Vec<T>;

    /// Keep entities whose searchable text contains `search`, ignoring case
    fn apply_search(&self, data: Vec<T>, search: &str) -> Vec<T> {
        let term = search.trim().to_lowercase();
        if term.is_empty() {
            return data;
        }
        data.into_iter()
            .filter(|entity| matches_search(entity, &term))
            .collect()
    }

    /// Keep entities satisfying every filter constraint
    fn apply_filters(&self, data: Vec<T>, filters: &FilterOptions) -> Vec<T> {
        data.into_iter()
            .filter(|entity| matches_filters(entity, filters))
            .collect()
    }

    /// Stable sort by a directive
    fn apply_sort(&self, mut data: Vec<T>, sort: &SortDirective) -> Vec<T> {
        sort_entities(&mut data, sort);
        data
    }

    /// Run the full criteria against [`list_all`](QueryableStore::list_all)
    fn query(&self, criteria: &Criteria) -> Vec<T> {
        visible_list(&self.list_all(), criteria)
    }
}

/// Derive the visible list from a collection and criteria
///
/// Entities satisfying the search term and every filter, in collection order,
/// then stably sorted when a sort directive is present.
pub fn visible_list<T: Listable>(collection: &[T], criteria: &Criteria) -> Vec<T> {
    let term = criteria.search_term().map(str::to_lowercase);
    let mut visible: Vec<T> = collection
        .iter()
        .filter(|entity| term.as_deref().is_none_or(|t| matches_search(*entity, t)))
        .filter(|entity| matches_filters(*entity, &criteria.filters))
        .cloned()
        .collect();

    if let Some(sort) = &criteria.sort {
        sort_entities(&mut visible, sort);
    }
    visible
}

/// Case-insensitive substring match; `term` must already be lowercase
fn matches_search<T: Listable>(entity: &T, term: &str) -> bool {
    entity
        .searchable_values()
        .iter()
        .any(|value| value.to_lowercase().contains(term))
}

fn matches_filters<T: Listable>(entity: &T, filters: &FilterOptions) -> bool {
    filters.iter().all(|(key, constraint)| {
        if constraint.is_null() {
            return true;
        }
        let rule = T::filter_rule(key);
        let attribute = entity.field_value(&rule.field);
        rule.accepts(attribute.as_ref(), constraint)
    })
}

fn sort_entities<T: Listable>(data: &mut [T], sort: &SortDirective) {
    let field = T::sort_field(&sort.field);
    let key = |entity: &T| entity.field_value(field).unwrap_or(FieldValue::Null);
    data.sort_by(|a, b| {
        let ordering = key(a).compare(&key(b));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Ordering helper exposed for callers sorting outside a store
pub fn compare_by<T: Listable>(a: &T, b: &T, field: &str) -> Ordering {
    let field = T::sort_field(field);
    let left = a.field_value(field).unwrap_or(FieldValue::Null);
    let right = b.field_value(field).unwrap_or(FieldValue::Null);
    left.compare(&right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use crate::core::query::FilterPatch;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        label: String,
        kind: String,
        price: Option<f64>,
    }

    impl Entity for Item {
        fn resource_name() -> &'static str {
            "items"
        }

        fn resource_name_singular() -> &'static str {
            "item"
        }

        fn id(&self) -> &str {
            &self.id
        }
    }

    impl Listable for Item {
        type Draft = serde_json::Value;

        fn searchable_values(&self) -> Vec<&str> {
            vec![&self.label, &self.kind]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "label" => Some(FieldValue::from(self.label.as_str())),
                "kind" => Some(FieldValue::from(self.kind.as_str())),
                "price" => self.price.map(FieldValue::Float),
                _ => None,
            }
        }

        fn sort_field(key: &str) -> &str {
            match key {
                "cost" => "price",
                other => other,
            }
        }
    }

    fn item(id: &str, label: &str, kind: &str, price: Option<f64>) -> Item {
        Item {
            id: id.to_string(),
            label: label.to_string(),
            kind: kind.to_string(),
            price,
        }
    }

    fn collection() -> Vec<Item> {
        vec![
            item("1", "Red Kettle", "kitchen", Some(30.0)),
            item("2", "Blue Mug", "kitchen", Some(8.0)),
            item("3", "Desk Lamp", "office", None),
            item("4", "Red Stapler", "office", Some(8.0)),
        ]
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    struct Fixture(Vec<Item>);

    impl QueryableStore<Item> for Fixture {
        fn list_all(&self) -> Vec<Item> {
            self.0.clone()
        }
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let data = collection();
        assert_eq!(visible_list(&data, &Criteria::default()), data);
    }

    #[test]
    fn test_search_is_case_insensitive_and_trimmed() {
        let data = collection();
        let visible = visible_list(&data, &Criteria::new().with_search("  RED "));
        assert_eq!(ids(&visible), vec!["1", "4"]);

        let visible = visible_list(&data, &Criteria::new().with_search("OFFICE"));
        assert_eq!(ids(&visible), vec!["3", "4"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let data = collection();
        let criteria = Criteria::new()
            .with_filter("kind", "office")
            .with_filter("price<=", 10.0);
        assert_eq!(ids(&visible_list(&data, &criteria)), vec!["4"]);
    }

    #[test]
    fn test_missing_attribute_fails_filter() {
        let data = collection();
        let criteria = Criteria::new().with_filter("price>=", 0.0);
        assert_eq!(ids(&visible_list(&data, &criteria)), vec!["1", "2", "4"]);
    }

    #[test]
    fn test_null_constraint_is_ignored() {
        let data = collection();
        let mut criteria = Criteria::new();
        criteria.filters.insert("kind".to_string(), FieldValue::Null);
        assert_eq!(visible_list(&data, &criteria).len(), 4);

        criteria.merge_filters(FilterPatch::new().set("kind", "kitchen"));
        assert_eq!(visible_list(&data, &criteria).len(), 2);
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let data = collection();
        let asc = visible_list(&data, &Criteria::new().with_sort(SortDirective::asc("price")));
        // missing price first, ties keep collection order
        assert_eq!(ids(&asc), vec!["3", "2", "4", "1"]);

        let desc = visible_list(&data, &Criteria::new().with_sort(SortDirective::desc("price")));
        assert_eq!(ids(&desc), vec!["1", "2", "4", "3"]);
    }

    #[test]
    fn test_sort_alias() {
        let data = collection();
        let visible = visible_list(&data, &Criteria::new().with_sort(SortDirective::desc("cost")));
        assert_eq!(ids(&visible)[0], "1");
        assert_eq!(compare_by(&data[0], &data[1], "cost"), Ordering::Greater);
    }

    #[test]
    fn test_visible_list_is_deterministic() {
        let data = collection();
        let criteria = Criteria::new()
            .with_search("e")
            .with_sort(SortDirective::asc("label"));
        assert_eq!(visible_list(&data, &criteria), visible_list(&data, &criteria));
    }

    #[test]
    fn test_queryable_store_defaults() {
        let store = Fixture(collection());
        let searched = store.apply_search(store.list_all(), "mug");
        assert_eq!(ids(&searched), vec!["2"]);

        let mut filters = FilterOptions::new();
        filters.insert("kind".to_string(), FieldValue::from("kitchen"));
        let filtered = store.apply_filters(store.list_all(), &filters);
        assert_eq!(ids(&filtered), vec!["1", "2"]);

        let sorted = store.apply_sort(filtered, &SortDirective::asc("price"));
        assert_eq!(ids(&sorted), vec!["2", "1"]);

        let queried = store.query(&Criteria::new().with_search("red"));
        assert_eq!(ids(&queried), vec!["1", "4"]);
    }
}
