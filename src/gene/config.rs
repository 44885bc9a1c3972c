use super::{GeneRegion, Mutation};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Copy count of every region of every gene copy (0 = main gene, 1.. = pseudogenes).
pub type CnVector = BTreeMap<usize, BTreeMap<GeneRegion, i32>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CnConfigKind {
    Normal,
    Deletion,
    LeftFusion,
    RightFusion,
}

impl CnConfigKind {
    /// Kinds that never receive extra main-gene-only copies.
    pub fn allows_weak_copies(&self) -> bool {
        !matches!(self, CnConfigKind::Deletion | CnConfigKind::LeftFusion)
    }
}

impl FromStr for CnConfigKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(CnConfigKind::Normal),
            "deletion" => Ok(CnConfigKind::Deletion),
            "left_fusion" => Ok(CnConfigKind::LeftFusion),
            "right_fusion" => Ok(CnConfigKind::RightFusion),
            _ => Err(format!(
                "Invalid configuration kind '{}'. Options are: normal, deletion, left_fusion, right_fusion",
                s
            )),
        }
    }
}

impl fmt::Display for CnConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CnConfigKind::Normal => "normal",
            CnConfigKind::Deletion => "deletion",
            CnConfigKind::LeftFusion => "left_fusion",
            CnConfigKind::RightFusion => "right_fusion",
        };
        f.write_str(name)
    }
}

/// Named copy-number configuration from the gene database.
#[derive(Debug, Clone, PartialEq)]
pub struct CnConfig {
    pub kind: CnConfigKind,
    pub cn: CnVector,
    pub defining_mutations: BTreeSet<Mutation>,
}

impl CnConfig {
    pub fn new(kind: CnConfigKind, cn: CnVector) -> Self {
        Self {
            kind,
            cn,
            defining_mutations: BTreeSet::new(),
        }
    }

    pub fn with_mutations(mut self, mutations: impl IntoIterator<Item = Mutation>) -> Self {
        self.defining_mutations.extend(mutations);
        self
    }

    /// Configurations without defining mutations are pure copy-number descriptions.
    pub fn is_cn_only(&self) -> bool {
        self.defining_mutations.is_empty()
    }

    pub fn region_cn(&self, gene_copy: usize, region: &GeneRegion) -> i32 {
        self.cn
            .get(&gene_copy)
            .and_then(|regions| regions.get(region))
            .copied()
            .unwrap_or(0)
    }
}
