// Pure summaries of the row store, regenerated on every render.

use tracing::trace;

use crate::record::{Attribute, Record, RowStore, YesNo, UNKNOWN_CATEGORY};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCount {
    pub sub_category: YesNo,
    pub count: usize,
}

/// Histogram input: one category with its counts split by depression status.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSeries {
    pub category: String,
    pub values: Vec<StatusCount>,
}

impl GroupedSeries {
    pub fn total(&self) -> usize {
        self.values.iter().map(|v| v.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub key: String,
    pub count: usize,
}

/// Stacking order of depression statuses, bottom to top.
const STATUS_ORDER: [YesNo; 2] = [YesNo::No, YesNo::Yes];

/// Count each attribute value by depression status.
///
/// Categories appear in first-encountered order. Records without a value are
/// grouped under [`UNKNOWN_CATEGORY`] so the grand total always equals the
/// number of records.
pub fn group_by_attribute_and_depression(store: &RowStore, attribute: Attribute) -> Vec<GroupedSeries> {
    let mut groups: Vec<(String, [usize; 2])> = Vec::new();

    for record in store.records() {
        let category = record.attribute(attribute).unwrap_or(UNKNOWN_CATEGORY);
        let slot = match record.depression {
            YesNo::No => 0,
            YesNo::Yes => 1,
        };
        match groups.iter_mut().find(|(c, _)| c == category) {
            Some((_, counts)) => counts[slot] += 1,
            None => {
                let mut counts = [0, 0];
                counts[slot] = 1;
                groups.push((category.to_string(), counts));
            }
        }
    }

    trace!(%attribute, categories = groups.len(), "grouped by attribute and depression");

    groups
        .into_iter()
        .map(|(category, counts)| GroupedSeries {
            category,
            values: STATUS_ORDER
                .iter()
                .zip(counts)
                .filter(|(_, count)| *count > 0)
                .map(|(status, count)| StatusCount {
                    sub_category: *status,
                    count,
                })
                .collect(),
        })
        .collect()
}

/// Count attribute values among depressed respondents, skipping missing values.
pub fn count_by_attribute_where_depressed(store: &RowStore, attribute: Attribute) -> Vec<PieSlice> {
    count_values(
        store
            .records()
            .iter()
            .filter(|r| r.depression == YesNo::Yes),
        attribute,
    )
    .into_iter()
    .map(|c| PieSlice {
        key: c.category,
        count: c.count,
    })
    .collect()
}

/// Count attribute values across all respondents, skipping missing values.
pub fn count_by_attribute(store: &RowStore, attribute: Attribute) -> Vec<CategoryCount> {
    count_values(store.records().iter(), attribute)
}

fn count_values<'a, I>(records: I, attribute: Attribute) -> Vec<CategoryCount>
where
    I: Iterator<Item = &'a Record>,
{
    let mut counts: Vec<CategoryCount> = Vec::new();
    for value in records.filter_map(|r| r.attribute(attribute)) {
        match counts.iter_mut().find(|c| c.category == value) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                category: value.to_string(),
                count: 1,
            }),
        }
    }
    counts
}
