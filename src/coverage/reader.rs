use super::Coverage;
use crate::gene::GeneRegion;
use crate::utils::{open_table_reader, Result};
use std::io::BufRead;
use std::path::Path;

impl Coverage {
    pub fn from_path(path: &Path, threshold: f64) -> Result<Self> {
        let reader = open_table_reader(path)?;
        Self::from_reader(reader, threshold).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Reads `region COPY REGION VALUE` and `mutation POS OP READS` records.
    pub fn from_reader<R: BufRead>(reader: R, threshold: f64) -> Result<Self> {
        let mut coverage = Coverage::new(threshold);

        for (line_number, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|e| format!("Error reading line {}: {}", line_number + 1, e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            parse_line(&mut coverage, line)
                .map_err(|e| format!("Error at coverage line {}: {}", line_number + 1, e))?;
        }
        Ok(coverage)
    }
}

fn parse_line(coverage: &mut Coverage, line: &str) -> Result<()> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match &fields[..] {
        ["region", gene_copy, region, value] => {
            let gene_copy = gene_copy
                .parse()
                .map_err(|_| format!("Invalid gene copy: {}", gene_copy))?;
            let region = GeneRegion::from_string(region)?;
            let value = parse_non_negative(value)?;
            coverage.set_region_coverage(gene_copy, region, value);
        }
        ["mutation", pos, op, reads] => {
            let pos = pos
                .parse()
                .map_err(|_| format!("Invalid position: {}", pos))?;
            let reads = parse_non_negative(reads)?;
            coverage.add_mutation_coverage(pos, *op, reads);
        }
        _ => return Err(format!("Unrecognized record: {}", line)),
    }
    Ok(())
}

fn parse_non_negative(value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| format!("Invalid coverage value: {}", value))
}
