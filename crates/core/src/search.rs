//! Binary search with duplicate expansion over a key-sorted record slice.

use std::ops::Range;

use crate::record::{Field, FieldValue, Record};

/// Locate every record whose `field` equals `target`.
///
/// Precondition: `records` is sorted ascending by `field` with unset values
/// after all set values. Equal keys are then necessarily contiguous, so a
/// single binary probe plus a linear scan in both directions captures them
/// all. Returns the matching index range in sequence order, or `None`.
///
/// A descending sort is only ever a display order: the probe's comparisons
/// assume ascending placement, and [`AddressBook::find_by`] re-sorts
/// ascending before every lookup, so a descending sequence is never
/// searched.
///
/// [`AddressBook::find_by`]: crate::book::AddressBook::find_by
pub fn find_range(records: &[Record], field: Field, target: &FieldValue) -> Option<Range<usize>> {
    let mut low = 0isize;
    let mut high = records.len() as isize - 1;

    while low <= high {
        let mid = ((low + high) / 2) as usize;
        match records[mid].value_of(field) {
            Some(key) if key == *target => {
                let mut first = mid;
                while first > 0 && records[first - 1].value_of(field).as_ref() == Some(target) {
                    first -= 1;
                }
                let mut last = mid;
                while last + 1 < records.len()
                    && records[last + 1].value_of(field).as_ref() == Some(target)
                {
                    last += 1;
                }
                return Some(first..last + 1);
            }
            // Unset keys sort after every set value, so they send the probe left.
            Some(key) if key > *target => high = mid as isize - 1,
            None => high = mid as isize - 1,
            Some(_) => low = mid as isize + 1,
        }
    }
    None
}
