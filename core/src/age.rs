//! Audience age buckets and their reduction to a numeric range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound stored for the open-ended `55+` bucket.
pub const OPEN_UPPER_BOUND: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55+")]
    Over55,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::From18To24,
        AgeGroup::From25To34,
        AgeGroup::From35To44,
        AgeGroup::From45To54,
        AgeGroup::Over55,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::From18To24 => "18-24",
            AgeGroup::From25To34 => "25-34",
            AgeGroup::From35To44 => "35-44",
            AgeGroup::From45To54 => "45-54",
            AgeGroup::Over55 => "55+",
        }
    }

    /// Inclusive bounds of the bucket.
    pub fn bounds(self) -> (u8, u8) {
        match self {
            AgeGroup::From18To24 => (18, 24),
            AgeGroup::From25To34 => (25, 34),
            AgeGroup::From35To44 => (35, 44),
            AgeGroup::From45To54 => (45, 54),
            AgeGroup::Over55 => (55, OPEN_UPPER_BOUND),
        }
    }

    fn position(self) -> usize {
        AgeGroup::ALL
            .iter()
            .position(|g| *g == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AgeGroup::ALL
            .into_iter()
            .find(|g| g.label() == s)
            .or_else(|| (s == ">55").then_some(AgeGroup::Over55))
            .ok_or_else(|| format!("unknown age group: {s}"))
    }
}

/// Target age range sent with creator requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgeRange {
    pub min: Option<u8>,
    pub max: Option<u8>,
    /// False when the selected buckets leave a gap, so the range also covers
    /// ages nobody selected.
    pub contiguous: bool,
}

/// Reduce selected buckets to `[min lower bound, max upper bound]`.
/// No selection gives an open range on both ends.
pub fn age_range(groups: &[AgeGroup]) -> AgeRange {
    let mut positions: Vec<usize> = groups.iter().map(|g| g.position()).collect();
    positions.sort_unstable();
    positions.dedup();
    let contiguous = positions.windows(2).all(|w| w[1] == w[0] + 1);

    AgeRange {
        min: groups.iter().map(|g| g.bounds().0).min(),
        max: groups.iter().map(|g| g.bounds().1).max(),
        contiguous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_to_min_and_max_bounds() {
        let range = age_range(&[AgeGroup::From25To34, AgeGroup::Over55]);
        assert_eq!(range.min, Some(25));
        assert_eq!(range.max, Some(100));
        assert!(!range.contiguous);
    }

    #[test]
    fn empty_selection_is_open() {
        let range = age_range(&[]);
        assert_eq!((range.min, range.max), (None, None));
        assert!(range.contiguous);
    }

    #[test]
    fn adjacent_buckets_are_contiguous() {
        let range = age_range(&[AgeGroup::From35To44, AgeGroup::From25To34]);
        assert_eq!((range.min, range.max), (Some(25), Some(44)));
        assert!(range.contiguous);
    }

    #[test]
    fn labels_parse_back() {
        for group in AgeGroup::ALL {
            assert_eq!(group.label().parse::<AgeGroup>().unwrap(), group);
        }
        assert_eq!(">55".parse::<AgeGroup>().unwrap(), AgeGroup::Over55);
        assert!("60-70".parse::<AgeGroup>().is_err());
    }
}
