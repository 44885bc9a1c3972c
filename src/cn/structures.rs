use crate::gene::{CnConfig, CnConfigKind, CnVector, GeneRegion};
use std::collections::BTreeMap;
use std::fmt;

/// ILP atom: configuration name plus variant index.
///
/// Indices 0 and -1 are full copies of the configuration (two of them make a
/// diploid genome); indices above 0 are weak copies that add one more
/// main-gene copy without its pseudogene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureId {
    pub name: String,
    pub index: i32,
}

impl StructureId {
    pub fn new(name: impl Into<String>, index: i32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    pub fn is_full(&self) -> bool {
        self.index <= 0
    }

    /// Structure that must be selected whenever this one is.
    pub fn predecessor(&self) -> Option<StructureId> {
        match self.index {
            -1 => Some(Self::new(self.name.clone(), 0)),
            i if i > 0 => Some(Self::new(self.name.clone(), i - 1)),
            _ => None,
        }
    }

    pub fn var_name(&self) -> String {
        format!("A_{}_{}", self.name, self.index)
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*{}#{}", self.name, self.index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub kind: CnConfigKind,
    pub cn: CnVector,
}

impl Structure {
    pub fn region_cn(&self, gene_copy: usize, region: &GeneRegion) -> i32 {
        self.cn
            .get(&gene_copy)
            .and_then(|regions| regions.get(region))
            .copied()
            .unwrap_or(0)
    }
}

pub type Structures = BTreeMap<StructureId, Structure>;

/// Derives the full and weak structures of every configuration. Weak copies
/// (`1..max_cn`) share one vector: the configuration with every pseudogene
/// region lowered by one. Their order is enforced by the model, not by the vectors.
pub fn expand_structures(configs: &BTreeMap<String, CnConfig>, max_cn: i32) -> Structures {
    let mut structures = Structures::new();
    for (name, config) in configs {
        let full = Structure {
            kind: config.kind,
            cn: config.cn.clone(),
        };
        structures.insert(StructureId::new(name.as_str(), 0), full.clone());
        structures.insert(StructureId::new(name.as_str(), -1), full);

        if !config.kind.allows_weak_copies() {
            continue;
        }
        let weak = Structure {
            kind: config.kind,
            cn: config
                .cn
                .iter()
                .map(|(gene_copy, regions)| {
                    let regions = if *gene_copy == 0 {
                        regions.clone()
                    } else {
                        regions.iter().map(|(r, cn)| (r.clone(), cn - 1)).collect()
                    };
                    (*gene_copy, regions)
                })
                .collect(),
        };
        for index in 1..max_cn {
            structures.insert(StructureId::new(name.as_str(), index), weak.clone());
        }
    }
    structures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs() -> BTreeMap<String, CnConfig> {
        let e1 = GeneRegion::new(1, "e");
        let vector = |main: i32, pseudo: i32| {
            CnVector::from([
                (0, BTreeMap::from([(e1.clone(), main)])),
                (1, BTreeMap::from([(e1.clone(), pseudo)])),
            ])
        };
        BTreeMap::from([
            ("1".to_string(), CnConfig::new(CnConfigKind::Normal, vector(1, 1))),
            ("5".to_string(), CnConfig::new(CnConfigKind::Deletion, vector(0, 1))),
            ("68".to_string(), CnConfig::new(CnConfigKind::LeftFusion, vector(1, 2))),
            ("36".to_string(), CnConfig::new(CnConfigKind::RightFusion, vector(1, 2))),
        ])
    }

    #[test]
    fn full_structures_for_every_config() {
        let structures = expand_structures(&configs(), 1);
        assert_eq!(structures.len(), 8);
        for name in ["1", "5", "68", "36"] {
            assert_eq!(
                structures[&StructureId::new(name, 0)],
                structures[&StructureId::new(name, -1)]
            );
        }
    }

    #[test]
    fn weak_structures_drop_one_pseudogene_copy() {
        let configs = configs();
        let structures = expand_structures(&configs, 4);
        let e1 = GeneRegion::new(1, "e");

        // 1 and 36: 0, -1, 1, 2, 3; 5 and 68: 0, -1
        assert_eq!(structures.len(), 14);
        for index in 1..4 {
            let weak = &structures[&StructureId::new("1", index)];
            assert_eq!(weak.region_cn(0, &e1), 1);
            assert_eq!(weak.region_cn(1, &e1), 0);
            assert_eq!(
                structures[&StructureId::new("36", index)].region_cn(1, &e1),
                1
            );
        }
        assert!(!structures.contains_key(&StructureId::new("5", 1)));
        assert!(!structures.contains_key(&StructureId::new("68", 1)));
        assert_eq!(configs, self::configs());
    }

    #[test]
    fn structure_predecessors() {
        assert_eq!(
            StructureId::new("1", -1).predecessor(),
            Some(StructureId::new("1", 0))
        );
        assert_eq!(
            StructureId::new("1", 3).predecessor(),
            Some(StructureId::new("1", 2))
        );
        assert_eq!(StructureId::new("1", 0).predecessor(), None);
        assert!(StructureId::new("1", -1).is_full());
        assert!(!StructureId::new("1", 1).is_full());
        assert_eq!(StructureId::new("4", -1).var_name(), "A_4_-1");
    }
}
