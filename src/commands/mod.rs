pub mod configs;
pub mod estimate;

use crate::gene::GeneRegion;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Writes per-copy region counts the way the gene model encodes them: `0:e1=1,e2=1;1:e1=1`.
pub(crate) fn format_cn<T: Display>(cn: &BTreeMap<usize, BTreeMap<GeneRegion, T>>) -> String {
    if cn.is_empty() {
        return ".".to_string();
    }
    cn.iter()
        .map(|(gene_copy, regions)| {
            let regions = regions
                .iter()
                .map(|(region, count)| format!("{}={}", region, count))
                .join(",");
            format!("{}:{}", gene_copy, regions)
        })
        .join(";")
}
