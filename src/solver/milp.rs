use super::{
    Assignment, Constraint, LinearExpr, Model, Objective, Sense, SolveStatus, Solved,
    SolverBackend, SolverError, Var, VarKind,
};
use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};

const FEASIBILITY_TOL: f64 = 1e-9;

/// Mixed-integer backend on top of `good_lp` with the pure-Rust `microlp` solver.
///
/// Tied optima are collected by re-solving the model with a no-good cut on
/// the binaries of every assignment found so far, until the next optimum is
/// worse than the first by more than `tie_tolerance`.
#[derive(Debug, Clone)]
pub struct MilpSolver {
    tie_tolerance: f64,
}

impl Default for MilpSolver {
    fn default() -> Self {
        Self {
            tie_tolerance: 1e-6,
        }
    }
}

impl SolverBackend for MilpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve_all(&self, model: &Model, objective: &Objective) -> Result<Solved, SolverError> {
        // Rows without variables are decided here; the LP layer gets only real rows
        if let Some(row) = model
            .constraints()
            .iter()
            .find(|c| c.expr.is_empty() && !holds(c, c.expr.constant()))
        {
            log::trace!("{}: constant row {} cannot hold", model.name(), row.name);
            return Err(SolverError::NoSolution);
        }

        let binaries: Vec<Var> = model
            .vars()
            .filter(|(_, info)| info.kind == VarKind::Binary)
            .map(|(v, _)| v)
            .collect();

        let mut cuts: Vec<Vec<bool>> = Vec::new();
        let mut optimum: Option<f64> = None;
        let mut assignments = Vec::new();
        loop {
            let values = match solve_once(model, objective, &binaries, &cuts) {
                Ok(values) => values,
                Err(SolverError::NoSolution) if optimum.is_some() => break,
                Err(e) => return Err(e),
            };
            let value = objective.eval(&values);
            let opt = *optimum.get_or_insert(value);
            if value > opt + self.tie_tolerance {
                break;
            }
            cuts.push(binaries.iter().map(|v| values[v.index()] > 0.5).collect());
            assignments.push(Assignment::new(values));
            if binaries.is_empty() {
                break;
            }
        }

        let opt = optimum.ok_or(SolverError::NoSolution)?;
        log::debug!(
            "{}: {} assignment(s) at optimum {:.4}",
            model.name(),
            assignments.len(),
            opt
        );
        Ok(Solved {
            status: SolveStatus::Optimal,
            objective: opt,
            assignments,
        })
    }
}

fn holds(row: &Constraint, activity: f64) -> bool {
    match row.sense {
        Sense::Le => activity <= row.rhs + FEASIBILITY_TOL,
        Sense::Ge => activity >= row.rhs - FEASIBILITY_TOL,
        Sense::Eq => (activity - row.rhs).abs() <= FEASIBILITY_TOL,
    }
}

fn affine(expr: &LinearExpr, columns: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant());
    for (v, c) in expr.terms() {
        out.add_mul(c, columns[v.index()]);
    }
    out
}

/// One optimisation run; every pattern in `cuts` is excluded. Binary values are rounded.
fn solve_once(
    model: &Model,
    objective: &Objective,
    binaries: &[Var],
    cuts: &[Vec<bool>],
) -> Result<Vec<f64>, SolverError> {
    let mut vars = ProblemVariables::new();
    let columns: Vec<Variable> = model
        .vars()
        .map(|(_, info)| {
            let definition = match info.kind {
                VarKind::Binary => variable().binary(),
                VarKind::Continuous { lb, ub } => variable().min(lb).max(ub),
            };
            vars.add(definition.name(info.name.clone()))
        })
        .collect();

    // |v| is linearised as t >= v, t >= -v
    let mut goal = affine(objective.linear(), &columns);
    let mut abs_rows = Vec::new();
    for (v, c) in objective.abs_terms() {
        let t = vars.add(variable().min(0.0));
        goal.add_mul(c, t);
        let x = columns[v.index()];
        abs_rows.push(constraint::geq(t - x, 0.0));
        abs_rows.push(constraint::geq(t + x, 0.0));
    }

    let mut problem = vars.minimise(goal).using(microlp);
    for row in model.constraints().iter().filter(|c| !c.expr.is_empty()) {
        let lhs = affine(&row.expr, &columns);
        problem.add_constraint(match row.sense {
            Sense::Le => constraint::leq(lhs, row.rhs),
            Sense::Ge => constraint::geq(lhs, row.rhs),
            Sense::Eq => constraint::eq(lhs, row.rhs),
        });
    }
    for row in abs_rows {
        problem.add_constraint(row);
    }
    for pattern in cuts {
        // sum(x off the pattern) + sum(1 - x on it) >= 1
        let mut cut = Expression::from(0.0);
        let mut set = 0.0;
        for (v, on) in binaries.iter().zip(pattern) {
            if *on {
                cut.add_mul(-1.0, columns[v.index()]);
                set += 1.0;
            } else {
                cut.add_mul(1.0, columns[v.index()]);
            }
        }
        problem.add_constraint(constraint::geq(cut, 1.0 - set));
    }

    let solution = problem.solve().map_err(|e| match e {
        ResolutionError::Infeasible => SolverError::NoSolution,
        e => SolverError::Backend(e.to_string()),
    })?;
    Ok(model
        .vars()
        .map(|(v, info)| {
            let value = solution.value(columns[v.index()]);
            match info.kind {
                VarKind::Binary => value.round(),
                VarKind::Continuous { .. } => value,
            }
        })
        .collect())
}
