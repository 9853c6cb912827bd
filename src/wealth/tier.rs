use std::ops::{Index, IndexMut};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Wealth percentile band. The five variants partition the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    TopPt1,
    RemainingTop1,
    Next9,
    Next40,
    Bottom50,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::TopPt1,
        Tier::RemainingTop1,
        Tier::Next9,
        Tier::Next40,
        Tier::Bottom50,
    ];

    /// Share of all households that belong to the tier.
    pub fn population_share(&self) -> Decimal {
        match self {
            Tier::TopPt1 => dec!(0.001),
            Tier::RemainingTop1 => dec!(0.009),
            Tier::Next9 => dec!(0.09),
            Tier::Next40 => dec!(0.40),
            Tier::Bottom50 => dec!(0.50),
        }
    }

    /// Category label used by the quarterly asset source.
    pub fn source_label(&self) -> &'static str {
        match self {
            Tier::TopPt1 => "TopPt1",
            Tier::RemainingTop1 => "RemainingTop1",
            Tier::Next9 => "Next9",
            Tier::Next40 => "Next40",
            Tier::Bottom50 => "Bottom50",
        }
    }

    pub fn from_source_label(label: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|tier| tier.source_label() == label)
    }

    pub fn assets_column(&self) -> &'static str {
        match self {
            Tier::TopPt1 => "top_pt1_assets",
            Tier::RemainingTop1 => "remaining_top_1_assets",
            Tier::Next9 => "next9_assets",
            Tier::Next40 => "next40_assets",
            Tier::Bottom50 => "bottom50_assets",
        }
    }

    /// Column name of the per-household figure in the result artifact.
    pub fn per_household_column(&self) -> &'static str {
        match self {
            Tier::TopPt1 => "top_pt1_per_household",
            Tier::RemainingTop1 => "remaining_top_1_per_household",
            Tier::Next9 => "next9_per_household",
            Tier::Next40 => "next40_per_household",
            Tier::Bottom50 => "bottom50_per_household",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            Tier::TopPt1 => "Top 0.1%",
            Tier::RemainingTop1 => "Remaining Top 0.9%",
            Tier::Next9 => "Next 9%",
            Tier::Next40 => "Next 40%",
            Tier::Bottom50 => "Bottom 50%",
        }
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

/// One value per tier, iterated in tier order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TierValues<T>([T; 5]);

impl<T> TierValues<T> {
    pub fn from_fn(f: impl FnMut(Tier) -> T) -> TierValues<T> {
        TierValues(Tier::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &T)> {
        Tier::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(Tier, &T) -> U) -> TierValues<U> {
        TierValues::from_fn(|tier| f(tier, &self[tier]))
    }
}

impl<T> Index<Tier> for TierValues<T> {
    type Output = T;

    fn index(&self, tier: Tier) -> &T {
        &self.0[tier.position()]
    }
}

impl<T> IndexMut<Tier> for TierValues<T> {
    fn index_mut(&mut self, tier: Tier) -> &mut T {
        &mut self.0[tier.position()]
    }
}
