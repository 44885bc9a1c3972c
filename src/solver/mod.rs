//! Narrow integer-programming interface used by the copy-number model.
//!
//! A [`Model`] collects variables and linear constraints, an [`Objective`]
//! combines linear and absolute-value terms, and a [`SolverBackend`] returns
//! every assignment that attains the optimum.

mod linear;
mod lp_format;
mod milp;

pub use linear::{quicksum, LinearExpr};
pub use lp_format::emit_lp;
pub use milp::MilpSolver;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(usize);

impl Var {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VarKind {
    Binary,
    Continuous { lb: f64, ub: f64 },
}

#[derive(Clone, Debug)]
pub struct VarInfo {
    pub name: String,
    pub kind: VarKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

#[derive(Clone, Debug)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

#[derive(Clone, Debug)]
pub struct Model {
    name: String,
    vars: Vec<VarInfo>,
    constraints: Vec<Constraint>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> Var {
        self.add_var(name.into(), VarKind::Binary)
    }

    pub fn add_continuous(&mut self, name: impl Into<String>, lb: f64, ub: f64) -> Var {
        self.add_var(name.into(), VarKind::Continuous { lb, ub })
    }

    fn add_var(&mut self, name: String, kind: VarKind) -> Var {
        self.vars.push(VarInfo { name, kind });
        Var(self.vars.len() - 1)
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) {
        let constraint = Constraint {
            name: name.into(),
            expr,
            sense,
            rhs,
        };
        log::trace!("LP constraint {}", constraint);
        self.constraints.push(constraint);
    }

    pub fn var(&self, v: Var) -> &VarInfo {
        &self.vars[v.index()]
    }

    pub fn vars(&self) -> impl Iterator<Item = (Var, &VarInfo)> + '_ {
        self.vars.iter().enumerate().map(|(i, info)| (Var(i), info))
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.sense {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "==",
        };
        write!(f, "{}: ", self.name)?;
        for (i, (v, c)) in self.expr.terms().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:+}*x{}", c, v.index())?;
        }
        if self.expr.constant() != 0.0 {
            write!(f, " {:+}", self.expr.constant())?;
        }
        write!(f, " {} {}", op, self.rhs)
    }
}

/// Minimisation objective: a linear part plus weighted absolute values of variables.
#[derive(Clone, Debug, Default)]
pub struct Objective {
    linear: LinearExpr,
    abs_terms: BTreeMap<Var, f64>,
}

impl Objective {
    /// Sum of `|v|` over `vars`; `coeffs` overrides the unit weight of individual variables.
    pub fn abssum(vars: impl IntoIterator<Item = Var>, coeffs: &HashMap<Var, f64>) -> Self {
        let mut objective = Self::default();
        for v in vars {
            let weight = coeffs.get(&v).copied().unwrap_or(1.0);
            *objective.abs_terms.entry(v).or_insert(0.0) += weight;
        }
        objective
    }

    pub fn add_linear(&mut self, expr: &LinearExpr, weight: f64) {
        self.linear.add_inplace(&expr.scale(weight));
    }

    pub fn linear(&self) -> &LinearExpr {
        &self.linear
    }

    pub fn abs_terms(&self) -> impl Iterator<Item = (Var, f64)> + '_ {
        self.abs_terms.iter().map(|(v, c)| (*v, *c))
    }

    pub fn eval(&self, values: &[f64]) -> f64 {
        self.linear.eval(values)
            + self
                .abs_terms
                .iter()
                .map(|(v, c)| c * values[v.index()].abs())
                .sum::<f64>()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => f.write_str("optimal"),
        }
    }
}

/// Values of every model variable in one optimal solution.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn value(&self, v: Var) -> f64 {
        self.values[v.index()]
    }

    pub fn is_set(&self, v: Var) -> bool {
        self.values[v.index()] > 0.5
    }
}

#[derive(Clone, Debug)]
pub struct Solved {
    pub status: SolveStatus,
    pub objective: f64,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    #[error("no feasible solution")]
    NoSolution,
    #[error("solver backend failed: {0}")]
    Backend(String),
    #[error("unknown solver '{0}'. Options are: any, microlp")]
    UnknownSolver(String),
}

pub trait SolverBackend {
    fn name(&self) -> &'static str;

    /// Minimises `objective` over `model` and returns all assignments tied at the optimum.
    fn solve_all(&self, model: &Model, objective: &Objective) -> Result<Solved, SolverError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    Microlp,
}

impl FromStr for SolverKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" | "microlp" => Ok(SolverKind::Microlp),
            _ => Err(SolverError::UnknownSolver(s.to_string())),
        }
    }
}

pub fn create_solver(kind: SolverKind) -> Box<dyn SolverBackend> {
    match kind {
        SolverKind::Microlp => Box::new(MilpSolver::default()),
    }
}
