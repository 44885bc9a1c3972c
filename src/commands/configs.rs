use super::format_cn;
use crate::cli::ConfigsArgs;
use crate::gene::Gene;
use crate::solutions::allele_sort_key;
use crate::utils::Result;
use itertools::Itertools;

pub fn configs(args: ConfigsArgs) -> Result<()> {
    let gene = Gene::from_path(&args.gene_path)?;
    log::info!("Listing {} configurations of {}", gene.cn_configs.len(), gene.name);
    println!("#config\tkind\tcn");
    for line in config_lines(&gene) {
        println!("{}", line);
    }
    Ok(())
}

fn config_lines(gene: &Gene) -> Vec<String> {
    gene.cn_configs
        .iter()
        .sorted_by_cached_key(|(name, _)| allele_sort_key(name))
        .map(|(name, config)| format!("{}\t{}\t{}", name, config.kind, format_cn(&config.cn)))
        .collect()
}
