//! Immutable result records: the copy-number solution produced by `cn` and
//! the allele-level records that downstream callers build on top of it.

use crate::cn::CnError;
use crate::gene::{CnVector, Gene, GeneRegion, Mutation};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub type RegionCn = BTreeMap<usize, BTreeMap<GeneRegion, u32>>;

fn check_score(score: f64) -> Result<f64, CnError> {
    if score.is_nan() || score < 0.0 {
        return Err(CnError::InvalidScore(score));
    }
    Ok(score)
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortChunk {
    Number(u64),
    Text(String),
}

/// Natural ordering of allele names (`2` < `10` < `10.001` < `10A`).
pub fn allele_sort_key(name: &str) -> Vec<impl Ord> {
    name.chars()
        .chunk_by(|c| c.is_ascii_digit())
        .into_iter()
        .map(|(is_digit, chunk)| {
            let chunk: String = chunk.collect();
            match chunk.parse::<u64>() {
                Ok(number) if is_digit => SortChunk::Number(number),
                _ => SortChunk::Text(chunk),
            }
        })
        .collect()
}

/// Copy-number configuration of a sample.
///
/// `score` is the model error (0 for user-provided solutions, +inf when no
/// configuration fits the coverage), `solution` counts the copies of each
/// configuration and `region_cn` holds the total copy number of every region
/// of every gene copy.
#[derive(Debug, Clone)]
pub struct CnSolution<'a> {
    score: f64,
    solution: BTreeMap<String, usize>,
    region_cn: RegionCn,
    gene: &'a Gene,
}

impl<'a> CnSolution<'a> {
    pub fn new(
        score: f64,
        solution: BTreeMap<String, usize>,
        region_cn: &CnVector,
        gene: &'a Gene,
    ) -> Result<Self, CnError> {
        let score = check_score(score)?;
        let mut checked = RegionCn::new();
        for (gene_copy, regions) in region_cn {
            let target = checked.entry(*gene_copy).or_default();
            for (region, cn) in regions {
                let cn = u32::try_from(*cn).map_err(|_| CnError::NegativeCopyNumber {
                    gene_copy: *gene_copy,
                    region: region.clone(),
                    cn: *cn,
                })?;
                target.insert(region.clone(), cn);
            }
        }
        Ok(Self {
            score,
            solution,
            region_cn: checked,
            gene,
        })
    }

    /// Placeholder returned when the copy-number model has no feasible solution.
    pub fn infeasible(gene: &'a Gene) -> Self {
        Self {
            score: f64::INFINITY,
            solution: BTreeMap::new(),
            region_cn: RegionCn::new(),
            gene,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        self.score.is_infinite()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn solution(&self) -> &BTreeMap<String, usize> {
        &self.solution
    }

    pub fn region_cn(&self) -> &RegionCn {
        &self.region_cn
    }

    pub fn gene(&self) -> &'a Gene {
        self.gene
    }

    /// Copy number of the region containing `pos`, 0 outside the gene.
    pub fn position_cn(&self, pos: u64) -> u32 {
        self.gene
            .region_at(pos)
            .and_then(|(gene_copy, region)| self.region_cn.get(&gene_copy)?.get(region))
            .copied()
            .unwrap_or(0)
    }

    fn solution_nice(&self) -> String {
        self.solution
            .iter()
            .sorted_by_cached_key(|(name, _)| allele_sort_key(name))
            .map(|(name, count)| format!("{}x*{}", count, name))
            .join(",")
    }
}

impl PartialEq for CnSolution<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
            && self.solution == other.solution
            && self.region_cn == other.region_cn
    }
}

impl fmt::Display for CnSolution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regions: BTreeSet<&GeneRegion> = self.region_cn.values().flat_map(|r| r.keys()).collect();
        let cn = self
            .region_cn
            .values()
            .map(|cns| {
                regions
                    .iter()
                    .map(|r| cns.get(*r).map_or("_".to_string(), |cn| cn.to_string()))
                    .join("")
            })
            .join("|");
        write!(
            f,
            "CNSol[{:.2}; sol=({}); cn={}]",
            self.score,
            self.solution_nice(),
            cn
        )
    }
}

/// One called copy of a major (and optionally minor) star-allele, with the
/// mutations it gained or lost relative to its database definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolvedAllele {
    major: String,
    minor: Option<String>,
    added: Vec<Mutation>,
    missing: Vec<Mutation>,
}

impl SolvedAllele {
    pub fn new(
        major: impl Into<String>,
        minor: Option<String>,
        added: impl IntoIterator<Item = Mutation>,
        missing: impl IntoIterator<Item = Mutation>,
    ) -> Self {
        Self {
            major: major.into(),
            minor,
            added: added.into_iter().sorted().dedup().collect(),
            missing: missing.into_iter().sorted().dedup().collect(),
        }
    }

    pub fn major(&self) -> &str {
        &self.major
    }

    pub fn minor(&self) -> Option<&str> {
        self.minor.as_deref()
    }

    pub fn added(&self) -> &[Mutation] {
        &self.added
    }

    pub fn missing(&self) -> &[Mutation] {
        &self.missing
    }

    /// Major allele name followed by its added functional mutations.
    pub fn major_repr(&self) -> String {
        let added = self
            .added
            .iter()
            .filter(|m| m.is_functional())
            .map(|m| format!(" +{}", m))
            .join("");
        format!("*{}{}", self.major, added)
    }
}

impl fmt::Display for SolvedAllele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.minor.as_deref().unwrap_or(&self.major);
        let added = self
            .added
            .iter()
            .sorted_by_key(|m| (!m.is_functional(), m.pos, m.op.clone()))
            .map(|m| format!(" +{}", m))
            .join("");
        let missing = self.missing.iter().map(|m| format!(" -{}", m)).join("");
        write!(f, "*{}{}{}", name, added, missing)
    }
}

/// Major star-allele assignment built on a copy-number solution.
#[derive(Debug, Clone, PartialEq)]
pub struct MajorSolution<'a> {
    score: f64,
    solution: BTreeMap<SolvedAllele, usize>,
    cn_solution: CnSolution<'a>,
}

impl<'a> MajorSolution<'a> {
    pub fn new(
        score: f64,
        solution: BTreeMap<SolvedAllele, usize>,
        cn_solution: CnSolution<'a>,
    ) -> Result<Self, CnError> {
        Ok(Self {
            score: check_score(score)?,
            solution,
            cn_solution,
        })
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn solution(&self) -> &BTreeMap<SolvedAllele, usize> {
        &self.solution
    }

    pub fn cn_solution(&self) -> &CnSolution<'a> {
        &self.cn_solution
    }
}

impl fmt::Display for MajorSolution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let solution = self
            .solution
            .iter()
            .sorted_by_cached_key(|(allele, _)| allele_sort_key(allele.major()))
            .map(|(allele, count)| format!("{}x{}", count, allele))
            .join(", ");
        write!(
            f,
            "MajorSol[{:.2}; sol=({}); cn={}]",
            self.score, solution, self.cn_solution
        )
    }
}

/// Minor star-allele assignment refining a major solution.
#[derive(Debug, Clone, PartialEq)]
pub struct MinorSolution<'a> {
    score: f64,
    solution: Vec<SolvedAllele>,
    major_solution: MajorSolution<'a>,
    diplotype: String,
}

impl<'a> MinorSolution<'a> {
    pub fn new(
        score: f64,
        solution: Vec<SolvedAllele>,
        major_solution: MajorSolution<'a>,
        diplotype: impl Into<String>,
    ) -> Result<Self, CnError> {
        Ok(Self {
            score: check_score(score)?,
            solution,
            major_solution,
            diplotype: diplotype.into(),
        })
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn solution(&self) -> &[SolvedAllele] {
        &self.solution
    }

    pub fn major_solution(&self) -> &MajorSolution<'a> {
        &self.major_solution
    }

    pub fn diplotype(&self) -> &str {
        &self.diplotype
    }
}

impl fmt::Display for MinorSolution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let solution = self
            .solution
            .iter()
            .sorted_by_cached_key(|allele| allele_sort_key(allele.minor().unwrap_or(allele.major())))
            .join(", ");
        write!(
            f,
            "MinorSol[{:.2}; sol=({}); major={}]",
            self.score, solution, self.major_solution
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::RegionSpan;

    fn gene() -> Gene {
        let mut gene = Gene {
            name: "CYP2D6".to_string(),
            ..Default::default()
        };
        for (gene_copy, offset) in [(0, 0), (1, 1000)] {
            let regions = gene.regions.entry(gene_copy).or_default();
            regions.insert(
                GeneRegion::new(1, "e"),
                RegionSpan::new(offset + 100, offset + 200).unwrap(),
            );
            regions.insert(
                GeneRegion::new(2, "e"),
                RegionSpan::new(offset + 200, offset + 300).unwrap(),
            );
        }
        gene
    }

    fn vector(main: [i32; 2], pseudo: Option<[i32; 2]>) -> CnVector {
        let mut cn = CnVector::new();
        let regions = [GeneRegion::new(1, "e"), GeneRegion::new(2, "e")];
        cn.insert(0, regions.iter().cloned().zip(main).collect());
        if let Some(pseudo) = pseudo {
            cn.insert(1, regions.iter().cloned().zip(pseudo).collect());
        }
        cn
    }

    #[test]
    fn natural_allele_order() {
        let mut names = vec!["10", "2", "10.001", "1", "4N", "41"];
        names.sort_by_cached_key(|n| allele_sort_key(n));
        assert_eq!(names, vec!["1", "2", "4N", "10", "10.001", "41"]);
    }

    #[test]
    fn negative_region_cn_rejected() {
        let gene = gene();
        let err = CnSolution::new(1.0, BTreeMap::new(), &vector([1, -1], None), &gene).unwrap_err();
        assert_eq!(
            err,
            CnError::NegativeCopyNumber {
                gene_copy: 0,
                region: GeneRegion::new(2, "e"),
                cn: -1
            }
        );
    }

    #[test]
    fn invalid_score_rejected() {
        let gene = gene();
        assert!(CnSolution::new(f64::NAN, BTreeMap::new(), &CnVector::new(), &gene).is_err());
        assert!(CnSolution::new(-1.0, BTreeMap::new(), &CnVector::new(), &gene).is_err());
    }

    #[test]
    fn display_cn_solution() {
        let gene = gene();
        let solution = BTreeMap::from([("10".to_string(), 1), ("2".to_string(), 2)]);
        let sol = CnSolution::new(1.5, solution, &vector([3, 2], Some([2, 2])), &gene).unwrap();
        assert_eq!(sol.to_string(), "CNSol[1.50; sol=(2x*2,1x*10); cn=32|22]");
        assert_eq!(sol.position_cn(150), 3);
        assert_eq!(sol.position_cn(1250), 2);
        assert_eq!(sol.position_cn(5000), 0);
        assert!(!sol.is_infeasible());
    }

    #[test]
    fn display_missing_regions() {
        let gene = gene();
        let mut cn = vector([1, 1], Some([1, 1]));
        cn.get_mut(&1).unwrap().remove(&GeneRegion::new(1, "e"));
        let sol = CnSolution::new(0.0, BTreeMap::new(), &cn, &gene).unwrap();
        assert_eq!(sol.to_string(), "CNSol[0.00; sol=(); cn=11|_1]");
    }

    #[test]
    fn infeasible_sentinel() {
        let gene = gene();
        let sol = CnSolution::infeasible(&gene);
        assert!(sol.is_infeasible());
        assert!(sol.solution().is_empty());
        assert!(sol.region_cn().is_empty());
        assert_eq!(sol.to_string(), "CNSol[inf; sol=(); cn=]");
    }

    #[test]
    fn display_allele_records() {
        let gene = gene();
        let cn = CnSolution::new(
            1.0,
            BTreeMap::from([("1".to_string(), 2)]),
            &vector([2, 2], None),
            &gene,
        )
        .unwrap();
        let star4 = SolvedAllele::new(
            "4",
            Some("4.001".to_string()),
            [Mutation::new(300, "C>T", false), Mutation::new(200, "G>A", true)],
            [Mutation::new(150, "A>G", true)],
        );
        let star1 = SolvedAllele::new("1", None, [], []);
        assert_eq!(star4.major_repr(), "*4 +200:G>A");
        assert_eq!(star4.to_string(), "*4.001 +200:G>A +300:C>T -150:A>G");

        let major = MajorSolution::new(
            2.0,
            BTreeMap::from([(star4.clone(), 1), (star1.clone(), 1)]),
            cn.clone(),
        )
        .unwrap();
        assert_eq!(
            major.to_string(),
            "MajorSol[2.00; sol=(1x*1, 1x*4.001 +200:G>A +300:C>T -150:A>G); cn=CNSol[1.00; sol=(2x*1); cn=22]]"
        );
        assert_eq!(major.cn_solution(), &cn);

        let minor = MinorSolution::new(3.0, vec![star4, star1], major.clone(), "*1/*4").unwrap();
        assert_eq!(minor.diplotype(), "*1/*4");
        assert!(minor.to_string().starts_with("MinorSol[3.00; sol=(*1, *4.001 +200:G>A"));
        assert!(MinorSolution::new(f64::NAN, vec![], major, "").is_err());
    }
}
