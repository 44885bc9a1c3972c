use super::Var;
use std::collections::BTreeMap;

const ZERO_COEFF: f64 = 1e-12;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    terms: BTreeMap<Var, f64>,
    constant: f64,
}

impl LinearExpr {
    pub fn zero() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_const(v: f64) -> Self {
        let mut e = Self::zero();
        e.constant = v;
        e
    }

    pub fn from_var(v: Var, c: f64) -> Self {
        let mut e = Self::zero();
        e.add_term(v, c);
        e
    }

    pub fn add_term(&mut self, v: Var, c: f64) {
        let coeff = self.terms.entry(v).or_insert(0.0);
        *coeff += c;
        if coeff.abs() <= ZERO_COEFF {
            self.terms.remove(&v);
        }
    }

    pub fn add_inplace(&mut self, other: &LinearExpr) {
        self.constant += other.constant;
        for (v, c) in other.terms.iter() {
            self.add_term(*v, *c);
        }
    }

    pub fn sub_inplace(&mut self, other: &LinearExpr) {
        self.constant -= other.constant;
        for (v, c) in other.terms.iter() {
            self.add_term(*v, -*c);
        }
    }

    pub fn scale(&self, k: f64) -> Self {
        let mut e = Self::zero();
        e.constant = self.constant * k;
        for (v, c) in self.terms.iter() {
            e.add_term(*v, c * k);
        }
        e
    }

    pub fn sub(mut self, other: LinearExpr) -> LinearExpr {
        self.sub_inplace(&other);
        self
    }

    pub fn terms(&self) -> impl Iterator<Item = (Var, f64)> + '_ {
        self.terms.iter().map(|(v, c)| (*v, *c))
    }

    pub fn coeff(&self, v: Var) -> f64 {
        self.terms.get(&v).copied().unwrap_or(0.0)
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression; `values` is indexed by variable.
    pub fn eval(&self, values: &[f64]) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|(v, c)| c * values[v.index()])
                .sum::<f64>()
    }
}

/// Sum of `vars` with unit coefficients.
pub fn quicksum(vars: impl IntoIterator<Item = Var>) -> LinearExpr {
    let mut e = LinearExpr::zero();
    for v in vars {
        e.add_term(v, 1.0);
    }
    e
}
