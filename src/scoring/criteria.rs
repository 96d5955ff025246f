use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// A rated aspect of a supplier.
///
/// Variant order is the canonical column order used by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Quality,
    Delivery,
    Price,
    Support,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Quality,
        Criterion::Delivery,
        Criterion::Price,
        Criterion::Support,
    ];

    /// Criteria present in every submission, so they always need a weight
    pub const REQUIRED: [Criterion; 2] = [Criterion::Quality, Criterion::Delivery];

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Quality => "quality",
            Criterion::Delivery => "delivery",
            Criterion::Price => "price",
            Criterion::Support => "support",
        }
    }

    /// Human-readable label for terminal and prompt output
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::Quality => "Quality",
            Criterion::Delivery => "Delivery",
            Criterion::Price => "Price",
            Criterion::Support => "Support",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quality" => Ok(Criterion::Quality),
            "delivery" | "time" => Ok(Criterion::Delivery),
            "price" => Ok(Criterion::Price),
            "support" => Ok(Criterion::Support),
            other => Err(format!("unknown criterion '{}'", other)),
        }
    }
}

/// Per-criterion ratings of one evaluation.
///
/// Quality and delivery are always rated; price and support are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ratings {
    pub quality: u8,
    pub delivery: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<u8>,
}

impl Ratings {
    pub fn new(quality: u8, delivery: u8) -> Self {
        Self {
            quality,
            delivery,
            price: None,
            support: None,
        }
    }

    pub fn get(&self, criterion: Criterion) -> Option<u8> {
        match criterion {
            Criterion::Quality => Some(self.quality),
            Criterion::Delivery => Some(self.delivery),
            Criterion::Price => self.price,
            Criterion::Support => self.support,
        }
    }

    /// Present ratings keyed by criterion, in canonical order
    pub fn to_map(&self) -> BTreeMap<Criterion, u8> {
        Criterion::ALL
            .iter()
            .filter_map(|c| self.get(*c).map(|r| (*c, r)))
            .collect()
    }
}

pub fn in_range(rating: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}
