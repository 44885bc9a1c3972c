use super::{CnConfig, GeneRegion, RegionSpan};
use std::collections::BTreeMap;

/// Gene model: region layout of the main gene and its pseudogenes, plus the
/// catalog of known copy-number configurations.
#[derive(Debug, Clone, Default)]
pub struct Gene {
    pub name: String,
    pub regions: BTreeMap<usize, BTreeMap<GeneRegion, RegionSpan>>,
    pub unique_regions: Vec<GeneRegion>,
    pub cn_configs: BTreeMap<String, CnConfig>,
}

impl Gene {
    pub fn has_pseudogenes(&self) -> bool {
        self.regions.get(&1).is_some_and(|regions| !regions.is_empty())
    }

    pub fn has_region(&self, gene_copy: usize, region: &GeneRegion) -> bool {
        self.regions
            .get(&gene_copy)
            .is_some_and(|regions| regions.contains_key(region))
    }

    /// Returns the gene copy and region that contain `pos`.
    pub fn region_at(&self, pos: u64) -> Option<(usize, &GeneRegion)> {
        self.regions.iter().find_map(|(gene_copy, regions)| {
            regions
                .iter()
                .find(|(_, span)| span.contains(pos))
                .map(|(region, _)| (*gene_copy, region))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene() -> Gene {
        let mut gene = Gene {
            name: "CYP2D6".to_string(),
            ..Default::default()
        };
        let main = gene.regions.entry(0).or_default();
        main.insert(GeneRegion::new(1, "e"), RegionSpan::new(100, 200).unwrap());
        main.insert(GeneRegion::new(1, "i"), RegionSpan::new(200, 300).unwrap());
        gene.regions
            .entry(1)
            .or_default()
            .insert(GeneRegion::new(1, "e"), RegionSpan::new(1100, 1200).unwrap());
        gene
    }

    #[test]
    fn locate_positions() {
        let gene = gene();
        assert_eq!(gene.region_at(150), Some((0, &GeneRegion::new(1, "e"))));
        assert_eq!(gene.region_at(250), Some((0, &GeneRegion::new(1, "i"))));
        assert_eq!(gene.region_at(1100), Some((1, &GeneRegion::new(1, "e"))));
        assert_eq!(gene.region_at(50), None);
    }

    #[test]
    fn detect_pseudogenes() {
        let mut gene = gene();
        assert!(gene.has_pseudogenes());
        assert!(gene.has_region(1, &GeneRegion::new(1, "e")));
        assert!(!gene.has_region(1, &GeneRegion::new(1, "i")));
        gene.regions.remove(&1);
        assert!(!gene.has_pseudogenes());
    }
}
