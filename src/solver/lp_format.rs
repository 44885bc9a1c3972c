use super::{LinearExpr, Model, Objective, Sense, Var, VarKind};

/// Renders the model in CPLEX LP format. Each absolute-value term `c * |v|`
/// becomes `c * abs_v` with `abs_v >= v` and `abs_v >= -v`. Row constants are
/// moved to the right-hand side.
pub fn emit_lp(model: &Model, objective: &Objective) -> String {
    let name = |v: Var| lp_name(&model.var(v).name);
    let abs_name = |v: Var| format!("abs_{}", name(v));

    let mut out = format!("\\ {}\nMinimize\n obj: ", model.name());
    let mut parts = fmt_terms(objective.linear(), &name);
    for (v, c) in objective.abs_terms() {
        parts.push(fmt_term(c, &abs_name(v)));
    }
    out.push_str(&join_terms(parts, objective.linear().constant()));
    out.push('\n');

    out.push_str("Subject To\n");
    for c in model.constraints() {
        out.push_str(&format!(
            " {}: {} {} {}\n",
            lp_name(&c.name),
            join_terms(fmt_terms(&c.expr, &name), 0.0),
            fmt_sense(c.sense),
            fmt_num(c.rhs - c.expr.constant())
        ));
    }
    for (v, _) in objective.abs_terms() {
        let (abs, var) = (abs_name(v), name(v));
        out.push_str(&format!(" {}_pos: +1 {} -1 {} >= 0\n", abs, abs, var));
        out.push_str(&format!(" {}_neg: +1 {} +1 {} >= 0\n", abs, abs, var));
    }

    out.push_str("Bounds\n");
    for (v, info) in model.vars() {
        if let VarKind::Continuous { lb, ub } = info.kind {
            out.push_str(&format!(" {} <= {} <= {}\n", fmt_num(lb), name(v), fmt_num(ub)));
        }
    }

    out.push_str("Binary\n");
    for (v, info) in model.vars() {
        if info.kind == VarKind::Binary {
            out.push_str(&format!(" {}\n", name(v)));
        }
    }
    out.push_str("End\n");
    out
}

/// LP identifiers may not contain whitespace, `-` or `:`.
fn lp_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '-' => 'm',
            c if c.is_whitespace() || c == ':' => '_',
            c => c,
        })
        .collect()
}

fn fmt_sense(s: Sense) -> &'static str {
    match s {
        Sense::Le => "<=",
        Sense::Ge => ">=",
        Sense::Eq => "=",
    }
}

fn fmt_num(v: f64) -> String {
    if v == f64::INFINITY {
        "+inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.6}", v)
    }
}

fn fmt_term(c: f64, name: &str) -> String {
    if (c - 1.0).abs() < 1e-12 {
        format!("+1 {}", name)
    } else if (c + 1.0).abs() < 1e-12 {
        format!("-1 {}", name)
    } else {
        format!("{:+.6} {}", c, name)
    }
}

fn fmt_terms(e: &LinearExpr, name: &impl Fn(Var) -> String) -> Vec<String> {
    e.terms().map(|(v, c)| fmt_term(c, &name(v))).collect()
}

fn join_terms(mut parts: Vec<String>, constant: f64) -> String {
    if parts.is_empty() {
        parts.push("+0".to_string());
    }
    if constant.abs() > 1e-12 {
        parts.push(format!("{:+.6}", constant));
    }
    parts.join(" ")
}
