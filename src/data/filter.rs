use std::collections::{BTreeMap, BTreeSet};

use super::model::{Attribute, Dataset, SaleRecord};

// ---------------------------------------------------------------------------
// Filter predicate: which values are allowed per attribute
// ---------------------------------------------------------------------------

/// Per-attribute selection state: attribute → set of allowed values.
///
/// An attribute that is absent, or whose set is empty, matches nothing.
/// Sessions start from [`FilterSelection::all`], never from an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    allowed: BTreeMap<Attribute, BTreeSet<String>>,
}

impl FilterSelection {
    /// Every distinct value of every filterable attribute selected.
    pub fn all(dataset: &Dataset) -> Self {
        let allowed = Attribute::FILTERABLE
            .iter()
            .map(|&attr| {
                let values = dataset.distinct_values(attr).iter().cloned().collect();
                (attr, values)
            })
            .collect();
        FilterSelection { allowed }
    }

    /// Replace the allowed set of one attribute.
    pub fn set(&mut self, attribute: Attribute, values: impl IntoIterator<Item = impl Into<String>>) {
        self.allowed
            .insert(attribute, values.into_iter().map(Into::<String>::into).collect());
    }

    #[cfg(test)]
    pub fn allowed(&self, attribute: Attribute) -> Option<&BTreeSet<String>> {
        self.allowed.get(&attribute)
    }

    pub fn is_selected(&self, attribute: Attribute, value: &str) -> bool {
        self.allowed
            .get(&attribute)
            .is_some_and(|set| set.contains(value))
    }

    pub fn selected_count(&self, attribute: Attribute) -> usize {
        self.allowed.get(&attribute).map_or(0, BTreeSet::len)
    }

    /// Toggle a single value in an attribute's selection.
    pub fn toggle(&mut self, attribute: Attribute, value: &str) {
        let selected = self.allowed.entry(attribute).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Select every distinct value of `attribute` in `dataset`.
    pub fn select_all(&mut self, dataset: &Dataset, attribute: Attribute) {
        self.set(attribute, dataset.distinct_values(attribute).iter().cloned());
    }

    /// Deselect all values of `attribute`.
    pub fn select_none(&mut self, attribute: Attribute) {
        self.allowed.insert(attribute, BTreeSet::new());
    }

    /// Whether `record` passes every filterable attribute.
    pub fn matches(&self, record: &SaleRecord) -> bool {
        Attribute::FILTERABLE
            .iter()
            .all(|&attr| self.is_selected(attr, record.value(attr)))
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The records of a [`Dataset`] that pass a [`FilterSelection`], in dataset
/// order. Borrows the dataset; never copies or mutates records.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over explicit dataset indices.
    pub fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        FilteredView { dataset, indices }
    }

    pub fn records(&self) -> impl Iterator<Item = &'a SaleRecord> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return indices of records that pass all filters.
///
/// A record passes when, for each of City, Customer_type, Gender, Branch and
/// Payment, its value is in the selected set. Unknown values in the
/// selection simply match nothing.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Apply `selection` to `dataset`.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView::from_indices(dataset, filtered_indices(dataset, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::small_dataset;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_selection_keeps_everything() {
        let ds = small_dataset();
        let view = filter(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_deselecting_one_attribute_empties_view() {
        let ds = small_dataset();
        for attr in Attribute::FILTERABLE {
            let mut sel = FilterSelection::all(&ds);
            sel.select_none(attr);
            assert!(filter(&ds, &sel).is_empty(), "{attr} deselected");
        }
    }

    #[test]
    fn test_absent_attribute_matches_nothing() {
        let ds = small_dataset();
        assert!(filter(&ds, &FilterSelection::default()).is_empty());
    }

    #[test]
    fn test_conjunction_across_attributes() {
        let ds = small_dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.set(Attribute::City, ["Yangon"]);
        sel.set(Attribute::Gender, ["Male"]);

        let view = filter(&ds, &sel);
        assert_eq!(view.indices(), &[2, 3]);
        for rec in view.records() {
            for attr in Attribute::FILTERABLE {
                assert!(sel.is_selected(attr, rec.value(attr)));
            }
        }
    }

    #[test]
    fn test_multiple_values_are_or_within_attribute() {
        let ds = small_dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.set(Attribute::City, ["Naypyitaw", "Mandalay"]);
        assert_eq!(filter(&ds, &sel).indices(), &[1, 4]);
    }

    #[test]
    fn test_unknown_value_matches_nothing() {
        let ds = small_dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.set(Attribute::Payment, ["Barter"]);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn test_toggle_and_select_all() {
        let ds = small_dataset();
        let mut sel = FilterSelection::all(&ds);

        sel.toggle(Attribute::Gender, "Female");
        assert!(!sel.is_selected(Attribute::Gender, "Female"));
        assert_eq!(sel.selected_count(Attribute::Gender), 1);
        assert_eq!(filter(&ds, &sel).len(), 3);

        sel.toggle(Attribute::Gender, "Female");
        assert_eq!(filter(&ds, &sel).len(), 5);

        sel.select_none(Attribute::Branch);
        sel.select_all(&ds, Attribute::Branch);
        assert_eq!(sel, FilterSelection::all(&ds));
    }

    #[test]
    fn test_product_line_is_not_a_filter() {
        let ds = small_dataset();
        let sel = FilterSelection::all(&ds);
        assert!(sel.allowed(Attribute::ProductLine).is_none());
        assert_eq!(filter(&ds, &sel).len(), ds.len());
    }
}
