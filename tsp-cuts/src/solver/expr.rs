use std::iter::FromIterator;

use minilp::ComparisonOp;

use super::Var;

/// Relation between the left-hand side expression and the right-hand side
/// of a constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sense {
    Equal,
    LessEqual,
    GreaterEqual,
}

impl Sense {
    pub fn holds(&self, lhs: f64, rhs: f64, tol: f64) -> bool {
        match self {
            Sense::Equal => (lhs - rhs).abs() <= tol,
            Sense::LessEqual => lhs <= rhs + tol,
            Sense::GreaterEqual => lhs >= rhs - tol,
        }
    }

    pub(super) fn to_op(self) -> ComparisonOp {
        match self {
            Sense::Equal => ComparisonOp::Eq,
            Sense::LessEqual => ComparisonOp::Le,
            Sense::GreaterEqual => ComparisonOp::Ge,
        }
    }
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sense::Equal => write!(f, "="),
            Sense::LessEqual => write!(f, "<="),
            Sense::GreaterEqual => write!(f, ">="),
        }
    }
}

/// A weighted sum of variables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinExpr {
    terms: Vec<(Var, f64)>,
}

impl LinExpr {
    pub fn terms(&self) -> &[(Var, f64)] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of the expression, with `values` indexed by variable.
    pub fn eval(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values[var.index()])
            .sum()
    }
}

/// Sums variables with unit coefficients.
impl FromIterator<Var> for LinExpr {
    fn from_iter<T: IntoIterator<Item = Var>>(iter: T) -> Self {
        LinExpr {
            terms: iter.into_iter().map(|var| (var, 1.0)).collect(),
        }
    }
}

impl FromIterator<(Var, f64)> for LinExpr {
    fn from_iter<T: IntoIterator<Item = (Var, f64)>>(iter: T) -> Self {
        LinExpr {
            terms: iter.into_iter().collect(),
        }
    }
}

/// A linear constraint `expr <sense> rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Constr {
    pub name: String,
    pub expr: LinExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constr {
    pub fn new(name: impl Into<String>, expr: LinExpr, sense: Sense, rhs: f64) -> Self {
        Constr {
            name: name.into(),
            expr,
            sense,
            rhs,
        }
    }

    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        self.sense.holds(self.expr.eval(values), self.rhs, tol)
    }
}
