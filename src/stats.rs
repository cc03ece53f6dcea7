//! Descriptive statistics over grouped rows.
//!
//! Quantiles use the R-7 method: linear interpolation between order
//! statistics at fractional index `p * (n - 1)`.

use crate::error::DataError;
use std::collections::HashMap;
use std::hash::Hash;

/// min, first quartile, median, third quartile, max
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Summarise an unsorted slice. Returns `None` for empty input.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Summarise a slice already sorted ascending
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        Some(Self {
            min: quantile_sorted(sorted, 0.0)?,
            q1: quantile_sorted(sorted, 0.25)?,
            median: quantile_sorted(sorted, 0.5)?,
            q3: quantile_sorted(sorted, 0.75)?,
            max: quantile_sorted(sorted, 1.0)?,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// R-7 quantile of an ascending slice. `p` is clamped to [0, 1].
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (rank.ceil() as usize).min(n - 1);

    if lower_idx == upper_idx {
        Some(sorted[lower_idx])
    } else {
        let weight = rank - lower_idx as f64;
        Some(sorted[lower_idx] + (sorted[upper_idx] - sorted[lower_idx]) * weight)
    }
}

/// (min, max) of the values, `None` when empty
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Key→value mapping that iterates in first-appearance order of its keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for Grouped<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Eq, V> Grouped<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn map_values<W, F>(self, mut f: F) -> Grouped<K, W>
    where
        F: FnMut(V) -> W,
    {
        Grouped {
            entries: self.entries.into_iter().map(|(k, v)| (k, f(v))).collect(),
        }
    }
}

impl<K, V> IntoIterator for Grouped<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Partition rows by key, preserving first-appearance order of keys
pub fn group_by<'a, R, K, FK>(rows: &'a [R], mut key_fn: FK) -> Result<Grouped<K, Vec<&'a R>>, DataError>
where
    K: Eq + Hash + Clone,
    FK: FnMut(&R) -> Result<K, DataError>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut entries: Vec<(K, Vec<&R>)> = Vec::new();

    for row in rows {
        let key = key_fn(row)?;
        match index.get(&key) {
            Some(&slot) => entries[slot].1.push(row),
            None => {
                index.insert(key.clone(), entries.len());
                entries.push((key, vec![row]));
            }
        }
    }

    Ok(Grouped { entries })
}

/// Extract each group's values
fn grouped_values<R, K, FK, FV>(rows: &[R], key_fn: FK, mut value_fn: FV) -> Result<Grouped<K, Vec<f64>>, DataError>
where
    K: Eq + Hash + Clone,
    FK: FnMut(&R) -> Result<K, DataError>,
    FV: FnMut(&R) -> Result<f64, DataError>,
{
    let groups = group_by(rows, key_fn)?;
    let mut entries = Vec::with_capacity(groups.len());
    for (key, members) in groups {
        let values = members
            .into_iter()
            .map(&mut value_fn)
            .collect::<Result<Vec<f64>, DataError>>()?;
        entries.push((key, values));
    }
    Ok(Grouped { entries })
}

/// Five-number summary per group.
///
/// Fails with the first [`DataError`] raised by `key_fn` or `value_fn`;
/// empty input yields an empty mapping.
pub fn aggregate<R, K, FK, FV>(rows: &[R], key_fn: FK, value_fn: FV) -> Result<Grouped<K, FiveNumberSummary>, DataError>
where
    K: Eq + Hash + Clone,
    FK: FnMut(&R) -> Result<K, DataError>,
    FV: FnMut(&R) -> Result<f64, DataError>,
{
    let entries = grouped_values(rows, key_fn, value_fn)?
        .into_iter()
        .filter_map(|(key, values)| FiveNumberSummary::from_values(&values).map(|s| (key, s)))
        .collect();
    Ok(Grouped { entries })
}

/// Arithmetic mean per group
pub fn mean_by<R, K, FK, FV>(rows: &[R], key_fn: FK, value_fn: FV) -> Result<Grouped<K, f64>, DataError>
where
    K: Eq + Hash + Clone,
    FK: FnMut(&R) -> Result<K, DataError>,
    FV: FnMut(&R) -> Result<f64, DataError>,
{
    let groups = grouped_values(rows, key_fn, value_fn)?;
    Ok(groups.map_values(|values| values.iter().sum::<f64>() / values.len() as f64))
}
