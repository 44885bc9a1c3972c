use crate::utils::Result;
use once_cell::sync::Lazy;
use std::fmt;

/// Region that gets a heavier error weight in the copy-number objective.
pub static PCE_REGION: Lazy<GeneRegion> = Lazy::new(|| GeneRegion::new(11, "pce"));

/// Structural sub-unit of a gene copy (exon, intron, ...), written as `e9`, `pce11`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneRegion {
    pub number: u32,
    pub kind: String,
}

impl GeneRegion {
    pub fn new(number: u32, kind: impl Into<String>) -> Self {
        Self {
            number,
            kind: kind.into(),
        }
    }

    pub fn from_string(encoding: &str) -> Result<Self> {
        let error_msg = || format!("Invalid region encoding: {}", encoding);
        let split = encoding
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(error_msg)?;
        let (kind, number) = encoding.split_at(split);
        if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(error_msg());
        }
        let number: u32 = number.parse().map_err(|_| error_msg())?;
        Ok(Self::new(number, kind))
    }

    pub fn is_pce(&self) -> bool {
        *self == *PCE_REGION
    }
}

impl fmt::Display for GeneRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.number)
    }
}

/// Half-open reference interval `[start, end)` covered by a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSpan {
    pub start: u64,
    pub end: u64,
}

impl RegionSpan {
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start >= end {
            return Err(format!("Invalid region: start {} >= end {}", start, end));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, pos: u64) -> bool {
        pos >= self.start && pos < self.end
    }
}
