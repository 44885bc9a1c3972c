use super::MAX_CN;
use crate::coverage::Coverage;
use crate::gene::{CnConfig, Gene, Mutation};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Drops configurations whose defining mutations have no read support. The
/// minimum coverage is divided by `MAX_CN` so that alleles present in a single
/// copy out of many are still kept.
pub fn filter_configs(gene: &Gene, coverage: &Coverage) -> BTreeMap<String, CnConfig> {
    let cov = coverage.filtered(|mutation, cov, total, thres| {
        Coverage::basic_filter(mutation, cov, total, thres / MAX_CN)
    });

    let mut configs = BTreeMap::new();
    for (name, config) in &gene.cn_configs {
        if config.is_cn_only() {
            configs.insert(name.clone(), config.clone());
            continue;
        }
        let unsupported: Vec<&Mutation> = config
            .defining_mutations
            .iter()
            .filter(|m| cov.coverage(m) <= 0.0)
            .collect();
        if unsupported.is_empty() {
            configs.insert(name.clone(), config.clone());
            continue;
        }
        log::trace!(
            "Removing {} because of {}",
            name,
            unsupported
                .iter()
                .map(|m| match gene.region_at(m.pos) {
                    Some((gene_copy, region)) => format!("{} in {}/{}", m, gene_copy, region),
                    None => format!("{} outside of the gene", m),
                })
                .join(" and ")
        );
    }
    configs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::{CnConfigKind, CnVector};

    fn gene() -> Gene {
        let config = || CnConfig::new(CnConfigKind::Normal, CnVector::new());
        let mut gene = Gene {
            name: "CYP2D6".to_string(),
            ..Default::default()
        };
        gene.cn_configs.insert("1".to_string(), config());
        gene.cn_configs.insert(
            "4".to_string(),
            config().with_mutations([Mutation::new(100, "G>A", true)]),
        );
        gene.cn_configs.insert(
            "10".to_string(),
            config().with_mutations([
                Mutation::new(100, "G>A", true),
                Mutation::new(200, "C>T", true),
            ]),
        );
        gene
    }

    #[test]
    fn unsupported_configs_removed() {
        let gene = gene();
        let mut cov = Coverage::new(0.5);
        cov.add_mutation_coverage(100, "G>A", 10.0);
        cov.add_mutation_coverage(200, "_", 30.0);

        let configs = filter_configs(&gene, &cov);
        assert_eq!(configs.keys().collect::<Vec<_>>(), vec!["1", "4"]);
        assert_eq!(gene.cn_configs.len(), 3);
    }

    #[test]
    fn low_fraction_mutation_kept() {
        // 3 reads out of 100 fail the 0.5 threshold but pass 0.5 / MAX_CN
        let mut cov = Coverage::new(0.5);
        cov.add_mutation_coverage(100, "G>A", 3.0);
        cov.add_mutation_coverage(100, "_", 97.0);
        cov.add_mutation_coverage(200, "C>T", 3.0);
        cov.add_mutation_coverage(200, "_", 97.0);

        let configs = filter_configs(&gene(), &cov);
        assert_eq!(configs.keys().collect::<Vec<_>>(), vec!["1", "10", "4"]);
    }

    #[test]
    fn cn_only_configs_always_kept() {
        let configs = filter_configs(&gene(), &Coverage::new(0.5));
        assert_eq!(configs.keys().collect::<Vec<_>>(), vec!["1"]);
    }
}
