/// Print selection bookkeeping
///
/// The selection is an ordered list of photograph id references where the
/// same photo may appear several times; every occurrence stands for one
/// physical print copy. A side map keeps per-id occurrence counts so the
/// UI never has to re-scan the list, and an anchor index supports
/// shift-range selection.

use std::collections::{HashMap, HashSet};

use super::data::{Photography, PrintItem};

/// Photos are printed four to a page, so the selection length must be a
/// multiple of this before a print run is allowed.
pub const PRINT_GROUP_SIZE: usize = 4;

#[derive(Debug, Default)]
pub struct Selection {
    /// Ordered occurrences (photo ids, repeats allowed)
    entries: Vec<String>,
    /// Occurrence count per id
    counts: HashMap<String, usize>,
    /// Index of the last plainly-selected photo, for range extension
    anchor: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one occurrence of `photo` and move the range anchor to its
    /// position in the gallery list.
    pub fn select(&mut self, photo: &Photography, index: usize) {
        self.push_id(&photo.id);
        self.anchor = Some(index);
    }

    /// Shift-click selection: when `extend` is set and an anchor exists,
    /// covers the inclusive index range between the anchor and `index`
    /// (in either direction) and appends every photo in that range that is
    /// not already selected, exactly once each. Otherwise behaves like a
    /// plain `select`.
    pub fn select_range(&mut self, photos: &[Photography], index: usize, extend: bool) {
        if index >= photos.len() {
            return;
        }

        match (extend, self.anchor) {
            (true, Some(anchor)) => {
                let (lo, hi) = if anchor <= index {
                    (anchor, index)
                } else {
                    (index, anchor)
                };
                for photo in &photos[lo..=hi] {
                    if self.count_of(&photo.id) == 0 {
                        self.push_id(&photo.id);
                    }
                }
                self.anchor = Some(index);
            }
            _ => self.select(&photos[index], index),
        }
    }

    /// Remove the first occurrence matching `id`. No-op when absent.
    pub fn unselect_one(&mut self, id: &str) {
        if let Some(position) = self.entries.iter().position(|entry| entry == id) {
            self.entries.remove(position);
            match self.counts.get_mut(id) {
                Some(count) if *count > 1 => *count -= 1,
                _ => {
                    self.counts.remove(id);
                }
            }
        }
    }

    /// Remove every occurrence matching `id`.
    pub fn unselect_all(&mut self, id: &str) {
        self.entries.retain(|entry| entry != id);
        self.counts.remove(id);
    }

    /// Empty the selection and reset the range anchor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counts.clear();
        self.anchor = None;
    }

    /// Drop occurrences whose photo no longer exists in the gallery list
    /// (e.g. after a refetch under a different filter).
    pub fn prune(&mut self, photos: &[Photography]) {
        let known: HashSet<&str> = photos.iter().map(|photo| photo.id.as_str()).collect();
        self.entries.retain(|entry| known.contains(entry.as_str()));
        self.counts.retain(|id, _| known.contains(id.as_str()));
        self.anchor = None;
    }

    /// How many print copies of `id` are currently requested
    pub fn count_of(&self, id: &str) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.count_of(id) > 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A print run needs full 2x2 pages: the length must be a multiple of
    /// four (zero trivially qualifies; the UI additionally requires a
    /// non-empty selection before offering the print action).
    pub fn is_print_ready(&self) -> bool {
        self.entries.len() % PRINT_GROUP_SIZE == 0
    }

    /// Resolve the ordered occurrences back to photograph records.
    /// Unknown ids are skipped; `prune` keeps them from accumulating.
    pub fn resolve(&self, photos: &[Photography]) -> Vec<Photography> {
        self.entries
            .iter()
            .filter_map(|id| photos.iter().find(|photo| &photo.id == id))
            .cloned()
            .collect()
    }

    /// Selected ids with duplicates collapsed, in first-selected order.
    /// This is the payload shape for delete-multiple.
    pub fn unique_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }

    fn push_id(&mut self, id: &str) {
        self.entries.push(id.to_string());
        *self.counts.entry(id.to_string()).or_insert(0) += 1;
    }
}

/// Aggregate a print batch into `{id, quantity}` pairs for the
/// confirm-printed request, summing repeated occurrences per id in
/// first-seen order.
pub fn aggregate_print_items(batch: &[Photography]) -> Vec<PrintItem> {
    let mut items: Vec<PrintItem> = Vec::new();
    for photo in batch {
        match items.iter_mut().find(|item| item.id == photo.id) {
            Some(item) => item.quantity += 1,
            None => items.push(PrintItem {
                id: photo.id.clone(),
                quantity: 1,
            }),
        }
    }
    items
}

/// Round `value` up to the next multiple of `multiple_of`; exact multiples
/// (including zero) pass through unchanged. Drives the "3/4 selected"
/// progress readout.
pub fn next_multiple(value: usize, multiple_of: usize) -> usize {
    let remainder = value % multiple_of;
    if remainder == 0 {
        return value;
    }

    value + multiple_of - remainder
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn photo(id: &str) -> Photography {
        Photography {
            id: id.to_string(),
            code: format!("P-{}", id),
            url: format!("https://photos.example/{}.jpg", id),
            width: 3000,
            height: 2000,
            public_id: format!("shop/{}", id),
            printed_at: None,
            printed_quantity: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn gallery() -> Vec<Photography> {
        vec![photo("a"), photo("b"), photo("c"), photo("d")]
    }

    #[test]
    fn test_select_twice_counts_two_copies() {
        let photos = gallery();
        let mut selection = Selection::new();

        selection.select(&photos[0], 0);
        selection.select(&photos[0], 0);

        assert_eq!(selection.len(), 2);
        assert_eq!(selection.count_of("a"), 2);
    }

    #[test]
    fn test_unselect_one_removes_a_single_copy() {
        let photos = gallery();
        let mut selection = Selection::new();
        selection.select(&photos[0], 0);
        selection.select(&photos[0], 0);

        selection.unselect_one("a");
        assert_eq!(selection.count_of("a"), 1);
        assert_eq!(selection.len(), 1);

        selection.unselect_one("a");
        assert_eq!(selection.count_of("a"), 0);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_unselect_absent_id_is_a_noop() {
        let photos = gallery();
        let mut selection = Selection::new();
        selection.select(&photos[1], 1);

        selection.unselect_one("zzz");
        selection.unselect_all("zzz");

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.count_of("b"), 1);
    }

    #[test]
    fn test_unselect_all_drops_every_copy() {
        let photos = gallery();
        let mut selection = Selection::new();
        selection.select(&photos[0], 0);
        selection.select(&photos[1], 1);
        selection.select(&photos[0], 0);
        selection.select(&photos[0], 0);

        selection.unselect_all("a");

        assert_eq!(selection.count_of("a"), 0);
        assert_eq!(selection.count_of("b"), 1);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_range_select_backwards_skips_already_selected() {
        // Prior single selection of C (index 2), then shift-click A (index 0):
        // the range 0..=2 adds A and B but does not duplicate C.
        let photos = gallery();
        let mut selection = Selection::new();
        selection.select(&photos[2], 2);

        selection.select_range(&photos, 0, true);

        assert_eq!(selection.len(), 3);
        assert_eq!(selection.count_of("a"), 1);
        assert_eq!(selection.count_of("b"), 1);
        assert_eq!(selection.count_of("c"), 1);
        assert_eq!(selection.count_of("d"), 0);
    }

    #[test]
    fn test_range_select_without_anchor_is_a_plain_select() {
        let photos = gallery();
        let mut selection = Selection::new();

        selection.select_range(&photos, 3, true);

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.count_of("d"), 1);
    }

    #[test]
    fn test_range_select_without_shift_appends_a_copy() {
        let photos = gallery();
        let mut selection = Selection::new();
        selection.select(&photos[1], 1);

        selection.select_range(&photos, 1, false);

        assert_eq!(selection.count_of("b"), 2);
    }

    #[test]
    fn test_clear_resets_the_anchor() {
        let photos = gallery();
        let mut selection = Selection::new();
        selection.select(&photos[2], 2);
        selection.clear();

        // With no anchor, a shift-click falls back to a plain select
        selection.select_range(&photos, 0, true);
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.count_of("a"), 1);
    }

    #[test]
    fn test_print_readiness_boundaries() {
        let photos: Vec<Photography> = (0..8).map(|i| photo(&format!("p{}", i))).collect();
        let mut selection = Selection::new();

        for (accepted, len) in [(true, 0), (false, 1), (false, 2), (false, 3), (true, 4)] {
            while selection.len() < len {
                let index = selection.len();
                selection.select(&photos[index], index);
            }
            assert_eq!(selection.is_print_ready(), accepted, "length {}", len);
        }

        while selection.len() < 8 {
            let index = selection.len();
            selection.select(&photos[index], index);
        }
        assert!(selection.is_print_ready());

        selection.unselect_one("p0");
        assert_eq!(selection.len(), 7);
        assert!(!selection.is_print_ready());
    }

    #[test]
    fn test_resolve_preserves_occurrence_order() {
        let photos = gallery();
        let mut selection = Selection::new();
        selection.select(&photos[2], 2);
        selection.select(&photos[0], 0);
        selection.select(&photos[2], 2);

        let resolved = selection.resolve(&photos);
        let ids: Vec<&str> = resolved.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "c"]);
    }

    #[test]
    fn test_unique_ids_collapses_duplicates() {
        let photos = gallery();
        let mut selection = Selection::new();
        selection.select(&photos[1], 1);
        selection.select(&photos[1], 1);
        selection.select(&photos[3], 3);
        selection.select(&photos[1], 1);

        assert_eq!(selection.unique_ids(), vec!["b".to_string(), "d".to_string()]);
    }

    #[test]
    fn test_aggregate_print_items_sums_quantities_per_id() {
        let batch = vec![photo("a"), photo("b"), photo("a"), photo("a")];

        let items = aggregate_print_items(&batch);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[1].id, "b");
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn test_prune_drops_unknown_ids() {
        let photos = gallery();
        let mut selection = Selection::new();
        selection.select(&photos[0], 0);
        selection.select(&photos[3], 3);
        selection.select(&photos[3], 3);

        let shorter = vec![photo("a")];
        selection.prune(&shorter);

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.count_of("a"), 1);
        assert_eq!(selection.count_of("d"), 0);
    }

    #[test]
    fn test_next_multiple_tightest_upper_bound() {
        assert_eq!(next_multiple(0, 4), 0);
        assert_eq!(next_multiple(3, 4), 4);
        assert_eq!(next_multiple(4, 4), 4);
        assert_eq!(next_multiple(5, 4), 8);
        assert_eq!(next_multiple(8, 4), 8);

        for value in 0..50 {
            let result = next_multiple(value, 4);
            assert!(result >= value);
            assert_eq!(result % 4, 0);
            assert!(result < value + 4);
        }
    }
}
