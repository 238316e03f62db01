/// Printable page planning
///
/// Pure layout logic: partitions an ordered photo sequence into pages of
/// four fixed slots arranged as two rows of two. Independent of any
/// rendering engine so it can be reused (and tested) on its own.

/// Slots per printable page (2x2 grid)
pub const PAGE_SLOTS: usize = 4;

/// Cells per row on a printable page
pub const PAGE_COLUMNS: usize = 2;

/// One printable page: up to four items in reading order. Slots past the
/// end of the input stay `None` on a partial last page.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintPage<'a, T> {
    pub slots: [Option<&'a T>; PAGE_SLOTS],
}

impl<'a, T> PrintPage<'a, T> {
    /// The page's slots grouped into rows of two
    pub fn rows(&self) -> impl Iterator<Item = &[Option<&'a T>]> {
        self.slots.chunks(PAGE_COLUMNS)
    }

    /// How many slots are actually filled
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Plan the printable pages for an ordered sequence of items.
///
/// Page `p`, slot `s` holds input index `p * 4 + s`; the page count is
/// `ceil(len / 4)`. A non-multiple-of-4 input simply leaves trailing slots
/// empty on the last page, even though the screens upstream normally
/// enforce full pages before reaching this point.
pub fn plan_pages<T>(items: &[T]) -> Vec<PrintPage<'_, T>> {
    items
        .chunks(PAGE_SLOTS)
        .map(|chunk| {
            let mut slots = [None; PAGE_SLOTS];
            for (slot, item) in slots.iter_mut().zip(chunk) {
                *slot = Some(item);
            }
            PrintPage { slots }
        })
        .collect()
}

/// Number of pages needed for `len` items
pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SLOTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_is_ceiling_division() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(4), 1);
        assert_eq!(page_count(5), 2);
        assert_eq!(page_count(8), 2);
        assert_eq!(page_count(9), 3);
    }

    #[test]
    fn test_slots_reproduce_the_input_order() {
        for len in 0..13 {
            let items: Vec<usize> = (0..len).collect();
            let pages = plan_pages(&items);

            assert_eq!(pages.len(), page_count(len));

            let flattened: Vec<usize> = pages
                .iter()
                .flat_map(|page| page.slots.iter().filter_map(|slot| slot.copied()))
                .collect();
            assert_eq!(flattened, items);
        }
    }

    #[test]
    fn test_partial_last_page() {
        let items = ["a", "b", "c", "d", "e"];
        let pages = plan_pages(&items);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].filled(), 4);
        assert_eq!(pages[1].filled(), 1);
        assert_eq!(pages[1].slots[0], Some(&"e"));
        assert_eq!(pages[1].slots[1], None);
    }

    #[test]
    fn test_slot_maps_to_input_index() {
        let items: Vec<usize> = (0..8).collect();
        let pages = plan_pages(&items);

        for (p, page) in pages.iter().enumerate() {
            for (s, slot) in page.slots.iter().enumerate() {
                assert_eq!(*slot, Some(&items[p * PAGE_SLOTS + s]));
            }
        }
    }

    #[test]
    fn test_rows_are_two_by_two() {
        let items = [10, 20, 30];
        let pages = plan_pages(&items);
        let rows: Vec<&[Option<&i32>]> = pages[0].rows().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], &[Some(&10), Some(&20)][..]);
        assert_eq!(rows[1], &[Some(&30), None][..]);
    }
}
