//! Fixed-width bucketing of non-negative samples
//!
//! A [`BucketSpec`] partitions `[0, ∞)` into `bounded` half-open buckets of
//! equal width followed by one unbounded tail bucket:
//!
//! ```text
//! [0, w), [w, 2w), ..., [(n-1)w, nw), [nw, ∞)
//! ```
//!
//! With the default width of 10 and 13 bounded buckets this yields the
//! labels `"0-10"` through `"120-130"` and `"130+"`.
//!
//! Negative, NaN and missing samples fall into no bucket.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for invalid bucket layouts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinningError {
    #[error("bucket width must be finite and positive, got {0}")]
    InvalidWidth(f64),

    #[error("at least one bounded bucket is required")]
    NoBoundedBuckets,
}

/// Significant digits kept when printing bucket edges
const EDGE_DIGITS: i32 = 10;

/// Layout of the fixed-width buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBucketSpec")]
pub struct BucketSpec {
    width: f64,
    bounded: usize,
}

/// Unchecked form of [`BucketSpec`], validated on deserialization
#[derive(Deserialize)]
struct RawBucketSpec {
    width: f64,
    bounded: usize,
}

impl TryFrom<RawBucketSpec> for BucketSpec {
    type Error = BinningError;

    fn try_from(raw: RawBucketSpec) -> Result<Self, Self::Error> {
        BucketSpec::new(raw.width, raw.bounded)
    }
}

impl BucketSpec {
    /// Width used by the telemetry current-range view
    pub const DEFAULT_WIDTH: f64 = 10.0;

    /// Bounded buckets before the tail, covering `[0, 130)` at the default width
    pub const DEFAULT_BOUNDED: usize = 13;

    /// Create a bucket layout
    pub fn new(width: f64, bounded: usize) -> Result<Self, BinningError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(BinningError::InvalidWidth(width));
        }
        if bounded == 0 {
            return Err(BinningError::NoBoundedBuckets);
        }
        Ok(Self { width, bounded })
    }

    /// Width of every bounded bucket
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Number of bounded buckets
    pub fn bounded(&self) -> usize {
        self.bounded
    }

    /// Total number of buckets, tail included
    pub fn num_buckets(&self) -> usize {
        self.bounded + 1
    }

    /// Lower edge of the tail bucket
    pub fn tail_start(&self) -> f64 {
        self.bounded as f64 * self.width
    }

    /// Index of the bucket holding `value`, if any
    ///
    /// Buckets are closed on the left and open on the right, so a value on an
    /// edge belongs to the bucket that starts there.
    pub fn assign(&self, value: Option<f64>) -> Option<usize> {
        let value = value?;
        if value.is_nan() || value < 0.0 {
            return None;
        }
        if value >= self.tail_start() {
            return Some(self.bounded);
        }

        let mut index = ((value / self.width).floor() as usize).min(self.bounded - 1);
        // Keep the division consistent with the edges reported by `lower`
        if index + 1 < self.bounded && value >= self.lower(index + 1) {
            index += 1;
        } else if index > 0 && value < self.lower(index) {
            index -= 1;
        }
        Some(index)
    }

    /// Label of the bucket holding `value`, if any
    pub fn assign_label(&self, value: Option<f64>) -> Option<String> {
        self.assign(value).map(|index| self.label(index))
    }

    /// Lower edge of bucket `index`
    pub fn lower(&self, index: usize) -> f64 {
        index as f64 * self.width
    }

    /// Upper edge of bucket `index`, `None` for the tail
    pub fn upper(&self, index: usize) -> Option<f64> {
        if index >= self.bounded {
            None
        } else {
            Some(self.lower(index + 1))
        }
    }

    /// Display label of bucket `index`
    ///
    /// Edges are printed with at most ten significant digits, so a width of
    /// `0.1` gives `"0.2-0.3"` rather than the raw product of the width.
    pub fn label(&self, index: usize) -> String {
        match self.upper(index) {
            Some(upper) => format!("{}-{}", format_edge(self.lower(index)), format_edge(upper)),
            None => format!("{}+", format_edge(self.tail_start())),
        }
    }

    /// All labels in ascending bucket order
    pub fn labels(&self) -> Vec<String> {
        (0..self.num_buckets()).map(|i| self.label(i)).collect()
    }

    /// All buckets in ascending order
    pub fn buckets(&self) -> Vec<Bucket> {
        (0..self.num_buckets())
            .map(|index| Bucket {
                index,
                lower: self.lower(index),
                upper: self.upper(index),
                label: self.label(index),
            })
            .collect()
    }
}

impl Default for BucketSpec {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            bounded: Self::DEFAULT_BOUNDED,
        }
    }
}

/// Print a bucket edge without floating-point noise
fn format_edge(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value.abs());
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (EDGE_DIGITS - 1 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// A single half-open bucket `[lower, upper)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub index: usize,
    pub lower: f64,
    /// `None` for the unbounded tail
    pub upper: Option<f64>,
    pub label: String,
}

/// Assign a sample to one of the default buckets
///
/// Returns the bucket label, or `None` for negative, NaN and missing samples.
pub fn assign_bucket(value: Option<f64>) -> Option<String> {
    BucketSpec::default().assign_label(value)
}

/// Per-bucket sample counts for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCounts {
    spec: BucketSpec,
    counts: Vec<u64>,
    excluded: u64,
}

impl BucketCounts {
    /// Count samples into buckets
    ///
    /// Samples that fall into no bucket are tallied as excluded.
    pub fn from_values<I>(spec: BucketSpec, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut counts = vec![0u64; spec.num_buckets()];
        let mut excluded = 0u64;

        for value in values {
            match spec.assign(value) {
                Some(index) => counts[index] += 1,
                None => excluded += 1,
            }
        }

        Self {
            spec,
            counts,
            excluded,
        }
    }

    /// Bucket layout used for counting
    pub fn spec(&self) -> &BucketSpec {
        &self.spec
    }

    /// Counts in ascending bucket order
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of samples assigned to a bucket
    pub fn included(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of samples assigned to no bucket
    pub fn excluded(&self) -> u64 {
        self.excluded
    }

    /// Iterate over `(label, count)` in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(index, &count)| (self.spec.label(index), count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let labels = BucketSpec::default().labels();
        assert_eq!(labels.len(), 14);
        assert_eq!(labels[0], "0-10");
        assert_eq!(labels[12], "120-130");
        assert_eq!(labels[13], "130+");
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(assign_bucket(Some(0.0)).as_deref(), Some("0-10"));
        assert_eq!(assign_bucket(Some(9.999)).as_deref(), Some("0-10"));
        assert_eq!(assign_bucket(Some(10.0)).as_deref(), Some("10-20"));
        assert_eq!(assign_bucket(Some(129.999)).as_deref(), Some("120-130"));
        assert_eq!(assign_bucket(Some(130.0)).as_deref(), Some("130+"));
        assert_eq!(assign_bucket(Some(f64::INFINITY)).as_deref(), Some("130+"));
    }

    #[test]
    fn test_excluded_values() {
        assert_eq!(assign_bucket(None), None);
        assert_eq!(assign_bucket(Some(f64::NAN)), None);
        assert_eq!(assign_bucket(Some(-0.001)), None);
        assert_eq!(assign_bucket(Some(f64::NEG_INFINITY)), None);
    }

    #[test]
    fn test_negative_zero_is_first_bucket() {
        assert_eq!(assign_bucket(Some(-0.0)).as_deref(), Some("0-10"));
    }

    #[test]
    fn test_invalid_specs() {
        assert_eq!(
            BucketSpec::new(0.0, 13),
            Err(BinningError::InvalidWidth(0.0))
        );
        assert!(BucketSpec::new(f64::NAN, 13).is_err());
        assert_eq!(BucketSpec::new(10.0, 0), Err(BinningError::NoBoundedBuckets));
    }

    #[test]
    fn test_fractional_width_labels() {
        let spec = BucketSpec::new(2.5, 2).unwrap();
        assert_eq!(spec.labels(), vec!["0-2.5", "2.5-5", "5+"]);
        assert_eq!(spec.assign(Some(2.5)), Some(1));
        assert_eq!(spec.assign(Some(4.99)), Some(1));
        assert_eq!(spec.assign(Some(5.0)), Some(2));
    }

    #[test]
    fn test_small_width_labels_have_no_float_noise() {
        let spec = BucketSpec::new(0.1, 10).unwrap();
        assert_eq!(
            spec.labels(),
            vec![
                "0-0.1", "0.1-0.2", "0.2-0.3", "0.3-0.4", "0.4-0.5", "0.5-0.6", "0.6-0.7",
                "0.7-0.8", "0.8-0.9", "0.9-1", "1+",
            ]
        );
    }

    #[test]
    fn test_format_edge() {
        assert_eq!(format_edge(0.0), "0");
        assert_eq!(format_edge(-0.0), "0");
        assert_eq!(format_edge(130.0), "130");
        assert_eq!(format_edge(2.5), "2.5");
        assert_eq!(format_edge(0.30000000000000004), "0.3");
        assert_eq!(format_edge(1e12), "1000000000000");
    }

    #[test]
    fn test_deserialize_validates_layout() {
        let spec: BucketSpec = serde_json::from_str(r#"{"width": 5.0, "bounded": 4}"#).unwrap();
        assert_eq!(spec.labels().last().map(String::as_str), Some("20+"));

        assert!(serde_json::from_str::<BucketSpec>(r#"{"width": 0.0, "bounded": 0}"#).is_err());
        assert!(serde_json::from_str::<BucketSpec>(r#"{"width": 10.0, "bounded": 0}"#).is_err());
    }

    #[test]
    fn test_small_width_edges_agree_with_labels() {
        let spec = BucketSpec::new(0.1, 10).unwrap();
        for (index, bucket) in spec.buckets().iter().enumerate() {
            assert_eq!(spec.assign(Some(bucket.lower)), Some(index));
        }
    }

    #[test]
    fn test_buckets() {
        let buckets = BucketSpec::default().buckets();
        assert_eq!(buckets.len(), 14);
        assert_eq!(buckets[1].lower, 10.0);
        assert_eq!(buckets[1].upper, Some(20.0));
        assert_eq!(buckets[13].lower, 130.0);
        assert_eq!(buckets[13].upper, None);
        assert_eq!(buckets[13].label, "130+");
    }

    #[test]
    fn test_bucket_counts() {
        let values = [Some(5.0), Some(15.0), Some(15.0), Some(135.0), Some(-3.0), None];
        let counts = BucketCounts::from_values(BucketSpec::default(), values);

        assert_eq!(counts.included(), 4);
        assert_eq!(counts.excluded(), 2);
        assert_eq!(counts.counts()[0], 1);
        assert_eq!(counts.counts()[1], 2);
        assert_eq!(counts.counts()[13], 1);
    }
}
