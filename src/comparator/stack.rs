use std::cmp::Ordering;

use tracing::debug;

use super::{CompareError, FieldComparator, FieldValue};
use crate::item::Record;

/// Primary, secondary, ... sort keys: each comparator breaks the ties left by the previous one.
#[derive(Clone, Debug, Default)]
pub struct ComparatorStack {
    comparators: Vec<FieldComparator>,
}

impl ComparatorStack {
    pub fn new(comparators: Vec<FieldComparator>) -> Self {
        Self { comparators }
    }

    pub fn comparators(&self) -> &[FieldComparator] {
        &self.comparators
    }

    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Result<Ordering, CompareError> {
        for comparator in &self.comparators {
            let ordering = comparator.compare(a, b)?;
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }

    /// Stable sort of `records`.
    ///
    /// Every record's keys are computed once up front. A field whose present values mix
    /// numbers with text that is not an integer fails the whole sort with the first offending
    /// value; no partial order is returned.
    pub fn sort<R: Record>(&self, records: Vec<R>) -> Result<Vec<R>, CompareError> {
        let mut keyed: Vec<(Vec<Option<FieldValue>>, R)> = records
            .into_iter()
            .map(|record| {
                let keys = self
                    .comparators
                    .iter()
                    .map(|c| c.sort_key(&record))
                    .collect();
                (keys, record)
            })
            .collect();

        for (col, comparator) in self.comparators.iter().enumerate() {
            coerce_numeric(
                keyed.iter_mut().map(|(keys, _)| &mut keys[col]),
                comparator.field_name(),
            )?;
        }

        // Columns are uniform now, so comparing keys cannot fail.
        keyed.sort_by(|(a, _), (b, _)| {
            self.compare_rows(a, b).unwrap_or(Ordering::Equal)
        });
        debug!(
            records = keyed.len(),
            fields = self.comparators.len(),
            "sorted records"
        );
        Ok(keyed.into_iter().map(|(_, record)| record).collect())
    }

    fn compare_rows(
        &self,
        a: &[Option<FieldValue>],
        b: &[Option<FieldValue>],
    ) -> Result<Ordering, CompareError> {
        for ((comparator, x), y) in self.comparators.iter().zip(a).zip(b) {
            let ordering = comparator.compare_keys(x.as_ref(), y.as_ref())?;
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }
}

/// Sort `records` by a single field. See [`ComparatorStack::sort`].
pub fn sort_records<R: Record>(
    records: Vec<R>,
    comparator: &FieldComparator,
) -> Result<Vec<R>, CompareError> {
    ComparatorStack::new(vec![comparator.clone()]).sort(records)
}

/// If any value in the column is numeric, parse every text value as an integer too.
fn coerce_numeric<'a>(
    column: impl Iterator<Item = &'a mut Option<FieldValue>>,
    field: &str,
) -> Result<(), CompareError> {
    let mut present: Vec<&mut FieldValue> = column.flatten().collect();
    if !present.iter().any(|v| matches!(v, FieldValue::Numeric(_))) {
        return Ok(());
    }
    for value in present.iter_mut() {
        **value = FieldValue::Numeric(value.as_integer(field)?);
    }
    Ok(())
}
