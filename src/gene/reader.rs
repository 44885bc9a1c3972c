use super::{CnConfig, CnConfigKind, CnVector, Gene, GeneRegion, Mutation, RegionSpan};
use crate::utils::{open_table_reader, Result};
use std::io::BufRead;
use std::path::Path;

impl Gene {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = open_table_reader(path)?;
        Self::from_reader(reader).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Reads a whitespace-separated gene model:
    ///
    /// ```text
    /// gene    CYP2D6
    /// region  0  e1  42130500  42130800
    /// unique  e1,e2,pce11
    /// config  1  normal  0:e1=1,e2=1;1:e1=1,e2=1,pce11=1  .
    /// ```
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut gene = Gene::default();

        for (line_number, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|e| format!("Error reading line {}: {}", line_number + 1, e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            parse_line(&mut gene, line)
                .map_err(|e| format!("Error at gene model line {}: {}", line_number + 1, e))?;
        }

        if gene.name.is_empty() {
            return Err("Gene model is missing the 'gene' line".to_string());
        }
        Ok(gene)
    }
}

fn parse_line(gene: &mut Gene, line: &str) -> Result<()> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match &fields[..] {
        ["gene", name] => {
            gene.name = name.to_string();
        }
        ["region", gene_copy, region, start, end] => {
            let gene_copy = parse_gene_copy(gene_copy)?;
            let region = GeneRegion::from_string(region)?;
            let start = start
                .parse()
                .map_err(|_| format!("Invalid region start: {}", start))?;
            let end = end
                .parse()
                .map_err(|_| format!("Invalid region end: {}", end))?;
            let span = RegionSpan::new(start, end)?;
            if gene
                .regions
                .entry(gene_copy)
                .or_default()
                .insert(region.clone(), span)
                .is_some()
            {
                return Err(format!(
                    "Duplicate region {} for gene copy {}",
                    region, gene_copy
                ));
            }
        }
        ["unique", regions] => {
            gene.unique_regions = regions
                .split(',')
                .map(GeneRegion::from_string)
                .collect::<Result<Vec<_>>>()?;
        }
        ["config", name, kind, vector, rest @ ..] if rest.len() <= 1 => {
            let kind: CnConfigKind = kind.parse()?;
            let mut config = CnConfig::new(kind, decode_vector(vector)?);
            if let Some(mutations) = rest.first().filter(|m| **m != ".") {
                config = config.with_mutations(
                    mutations
                        .split(',')
                        .map(|m| Mutation::from_string(m, true))
                        .collect::<Result<Vec<_>>>()?,
                );
            }
            if gene.cn_configs.insert(name.to_string(), config).is_some() {
                return Err(format!("Duplicate configuration: {}", name));
            }
        }
        _ => return Err(format!("Unrecognized record: {}", line)),
    }
    Ok(())
}

fn parse_gene_copy(encoding: &str) -> Result<usize> {
    encoding
        .parse()
        .map_err(|_| format!("Invalid gene copy: {}", encoding))
}

/// Decodes `COPY:R=N,R=N;COPY:R=N`.
fn decode_vector(encoding: &str) -> Result<CnVector> {
    let mut cn = CnVector::new();
    for copy_encoding in encoding.split(';') {
        let (gene_copy, counts) = copy_encoding
            .split_once(':')
            .ok_or_else(|| format!("Copy vector must be in 'copy:region=cn' format: '{}'", copy_encoding))?;
        let gene_copy = parse_gene_copy(gene_copy)?;
        let regions = cn.entry(gene_copy).or_default();
        for count in counts.split(',').filter(|c| !c.is_empty()) {
            let (region, value) = count
                .split_once('=')
                .ok_or_else(|| format!("Field must be in 'region=cn' format: '{}'", count))?;
            let region = GeneRegion::from_string(region)?;
            let value: i32 = value
                .parse()
                .ok()
                .filter(|v| *v >= 0)
                .ok_or_else(|| format!("Invalid copy number for {}: {}", region, value))?;
            if regions.insert(region.clone(), value).is_some() {
                return Err(format!("Duplicate region in copy vector: {}", region));
            }
        }
    }
    Ok(cn)
}
