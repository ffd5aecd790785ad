use std::fmt;

use serde::Serialize;

/// Derived age bucket. Bins are half-open except the last one,
/// which includes 90.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeGroup {
    #[serde(rename = "18-29")]
    Young,
    #[serde(rename = "30-44")]
    Adult,
    #[serde(rename = "45-59")]
    MiddleAged,
    #[serde(rename = "60+")]
    Senior,
}

impl AgeGroup {
    /// Name of the derived column.
    pub const COLUMN: &'static str = "age_group";

    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Young,
        AgeGroup::Adult,
        AgeGroup::MiddleAged,
        AgeGroup::Senior,
    ];

    /// Bucket an age; ages below 18 or above 90 have no group.
    pub fn bucket(age: f64) -> Option<Self> {
        match age {
            a if (18.0..30.0).contains(&a) => Some(AgeGroup::Young),
            a if (30.0..45.0).contains(&a) => Some(AgeGroup::Adult),
            a if (45.0..60.0).contains(&a) => Some(AgeGroup::MiddleAged),
            a if (60.0..=90.0).contains(&a) => Some(AgeGroup::Senior),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Young => "18-29",
            AgeGroup::Adult => "30-44",
            AgeGroup::MiddleAged => "45-59",
            AgeGroup::Senior => "60+",
        }
    }

    pub fn labels() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::label)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_edges() {
        assert_eq!(AgeGroup::bucket(18.0), Some(AgeGroup::Young));
        assert_eq!(AgeGroup::bucket(29.0), Some(AgeGroup::Young));
        assert_eq!(AgeGroup::bucket(30.0), Some(AgeGroup::Adult));
        assert_eq!(AgeGroup::bucket(44.9), Some(AgeGroup::Adult));
        assert_eq!(AgeGroup::bucket(45.0), Some(AgeGroup::MiddleAged));
        assert_eq!(AgeGroup::bucket(59.0), Some(AgeGroup::MiddleAged));
        assert_eq!(AgeGroup::bucket(60.0), Some(AgeGroup::Senior));
        assert_eq!(AgeGroup::bucket(90.0), Some(AgeGroup::Senior));
    }

    #[test]
    fn outside_the_bins_is_unbucketed() {
        assert_eq!(AgeGroup::bucket(17.0), None);
        assert_eq!(AgeGroup::bucket(90.5), None);
        assert_eq!(AgeGroup::bucket(f64::NAN), None);
    }

    #[test]
    fn labels_in_bin_order() {
        let labels: Vec<_> = AgeGroup::labels().collect();
        assert_eq!(labels, vec!["18-29", "30-44", "45-59", "60+"]);
    }
}
