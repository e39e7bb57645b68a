//! Resolution tiers and a small fixed-size tier set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Real-world resolution of each tier, indexed by tier.
const RESOLUTIONS: [u32; Tier::COUNT] = [64, 128, 256, 512];

/// One of the four processing resolutions (0 = 64px .. 3 = 512px).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    /// Number of tiers.
    pub const COUNT: usize = 4;
    /// Cheapest tier (maximum compression).
    pub const SMALLEST: Tier = Tier(0);
    /// Most expensive tier.
    pub const LARGEST: Tier = Tier(3);
    /// All tiers in ascending order.
    pub const ALL: [Tier; Tier::COUNT] = [Tier(0), Tier(1), Tier(2), Tier(3)];

    /// Tier from a 0-based index; `None` when out of range.
    pub fn new(index: usize) -> Option<Tier> {
        if index < Self::COUNT {
            Some(Tier(index as u8))
        } else {
            None
        }
    }

    /// Tier whose resolution equals `px` (64/128/256/512).
    pub fn from_resolution(px: u32) -> Option<Tier> {
        RESOLUTIONS
            .iter()
            .position(|&r| r == px)
            .and_then(Tier::new)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Resolution in pixels.
    pub fn resolution(self) -> u32 {
        RESOLUTIONS[self.index()]
    }

    /// Tiers from the smallest up to and including `self`.
    pub fn up_to(self) -> impl DoubleEndedIterator<Item = Tier> {
        (0..=self.0).map(Tier)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.resolution())
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::new(value as usize).ok_or_else(|| format!("tier index {} out of range 0..=3", value))
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.0
    }
}

/// Set of tiers, e.g. the tiers whose setup cost has already been charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierSet(u8);

impl TierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tier: Tier) {
        self.0 |= 1 << tier.0;
    }

    pub fn contains(self, tier: Tier) -> bool {
        self.0 & (1 << tier.0) != 0
    }

    pub fn union(self, other: TierSet) -> TierSet {
        TierSet(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Tier> {
        Tier::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl FromIterator<Tier> for TierSet {
    fn from_iter<I: IntoIterator<Item = Tier>>(iter: I) -> Self {
        let mut set = TierSet::new();
        for tier in iter {
            set.insert(tier);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_resolution_roundtrip() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_resolution(tier.resolution()), Some(tier));
        }
        assert_eq!(Tier::from_resolution(100), None);
        assert_eq!(Tier::new(4), None);
    }

    #[test]
    fn tier_up_to_is_inclusive() {
        let tiers: Vec<_> = Tier(2).up_to().collect();
        assert_eq!(tiers, vec![Tier(0), Tier(1), Tier(2)]);
        let rev: Vec<_> = Tier::LARGEST.up_to().rev().collect();
        assert_eq!(rev[0], Tier::LARGEST);
    }

    #[test]
    fn tier_set_insert_and_iter() {
        let mut set = TierSet::new();
        assert!(set.is_empty());
        set.insert(Tier(3));
        set.insert(Tier(1));
        set.insert(Tier(3));
        assert_eq!(set.len(), 2);
        assert!(set.contains(Tier(1)));
        assert!(!set.contains(Tier(0)));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Tier(1), Tier(3)]);
    }

    #[test]
    fn tier_deserialize_rejects_out_of_range() {
        let ok: Tier = serde_json::from_str("2").unwrap();
        assert_eq!(ok, Tier(2));
        assert!(serde_json::from_str::<Tier>("7").is_err());
    }
}
