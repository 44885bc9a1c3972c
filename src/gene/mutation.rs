use crate::utils::Result;
use std::fmt;

/// Sequence change at a reference position; `op` is `REF>ALT`, `insX`, `delX` or `_` for the reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mutation {
    pub pos: u64,
    pub op: String,
    pub functional: bool,
}

impl Mutation {
    pub fn new(pos: u64, op: impl Into<String>, functional: bool) -> Self {
        Self {
            pos,
            op: op.into(),
            functional,
        }
    }

    /// Parses `POS:OP`.
    pub fn from_string(encoding: &str, functional: bool) -> Result<Self> {
        let error_msg = || format!("Mutation must be in 'pos:op' format: '{}'", encoding);
        let (pos, op) = encoding.split_once(':').ok_or_else(error_msg)?;
        if op.is_empty() {
            return Err(error_msg());
        }
        let pos = pos.parse().map_err(|_| error_msg())?;
        Ok(Self::new(pos, op, functional))
    }

    pub fn is_functional(&self) -> bool {
        self.functional
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pos, self.op)
    }
}
