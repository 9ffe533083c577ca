use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Running sum of people aboard per incident year.
///
/// One summation rule (`i64::saturating_add`) serves both the per-shard
/// pre-combine and the final merge, so partial totals compose into the same
/// result for any partitioning of the values and any merge order. Totals are
/// widened to `i64`; saturation only kicks in at the extremes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearTotals {
    totals: BTreeMap<String, i64>,
}

impl YearTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value to a year's running total.
    pub fn add(&mut self, year: &str, count: i64) {
        match self.totals.get_mut(year) {
            Some(total) => *total = total.saturating_add(count),
            None => {
                self.totals.insert(year.to_string(), count);
            }
        }
    }

    /// Fold a partial aggregation (a combiner output) into this one.
    pub fn merge(&mut self, partial: YearTotals) {
        for (year, count) in partial.totals {
            self.fold_in(year, count);
        }
    }

    fn fold_in(&mut self, year: String, count: i64) {
        match self.totals.entry(year) {
            Entry::Occupied(mut e) => {
                let total = e.get_mut();
                *total = total.saturating_add(count);
            }
            Entry::Vacant(v) => {
                v.insert(count);
            }
        }
    }

    pub fn get(&self, year: &str) -> Option<i64> {
        self.totals.get(year).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Finalized `(year, total)` rows, ordered by year string.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.totals.iter().map(|(year, total)| (year.as_str(), *total))
    }
}

impl FromIterator<(String, i64)> for YearTotals {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        let mut totals = YearTotals::new();
        for (year, count) in iter {
            totals.fold_in(year, count);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_values_under_one_key() {
        let mut totals = YearTotals::new();
        totals.add("1947", 3);
        totals.add("1947", 5);
        totals.add("1947", 2);
        assert_eq!(totals.get("1947"), Some(10));
        assert_eq!(totals.len(), 1);
    }

    #[test]
    fn partials_compose_in_any_order() {
        // one partition pre-combined [3, 5], another [2]
        let mut a = YearTotals::new();
        a.add("1947", 3);
        a.add("1947", 5);
        let mut b = YearTotals::new();
        b.add("1947", 2);

        let mut forward = YearTotals::new();
        forward.merge(a.clone());
        forward.merge(b.clone());

        let mut backward = YearTotals::new();
        backward.merge(b);
        backward.merge(a);

        assert_eq!(forward.get("1947"), Some(10));
        assert_eq!(forward, backward);
    }

    #[test]
    fn pre_combined_and_flat_aggregation_agree() {
        let flat: YearTotals = [
            ("1947".to_string(), 3),
            ("1947".to_string(), 5),
            ("1947".to_string(), 2),
        ]
        .into_iter()
        .collect();

        let mut combined = YearTotals::new();
        combined.merge([("1947".to_string(), 8)].into_iter().collect());
        combined.merge([("1947".to_string(), 2)].into_iter().collect());

        assert_eq!(flat, combined);
    }

    #[test]
    fn keys_stay_independent_and_sorted() {
        let mut totals = YearTotals::new();
        totals.add("1972", 101);
        totals.add("1908", 2);
        totals.add("1947", 10);

        let rows: Vec<(&str, i64)> = totals.iter().collect();
        assert_eq!(rows, vec![("1908", 2), ("1947", 10), ("1972", 101)]);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let mut totals = YearTotals::new();
        totals.add("1947", i64::MAX);
        totals.add("1947", 1);
        assert_eq!(totals.get("1947"), Some(i64::MAX));
    }

    #[test]
    fn merging_an_empty_partial_is_a_no_op() {
        let mut totals = YearTotals::new();
        totals.add("1908", 2);
        let before = totals.clone();
        totals.merge(YearTotals::new());
        assert_eq!(totals, before);
    }
}
