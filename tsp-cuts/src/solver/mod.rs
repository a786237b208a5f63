//! A small branch-and-cut MIP driver on top of the [`minilp`] simplex solver.
//!
//! The interface follows the usual shape of commercial solver APIs: variables
//! and constraints are added to a [`Model`], [`Model::optimize`] runs the
//! search and reports integer candidates to a [`Callback`], which may reject
//! them by adding lazy constraints.

mod branch;
mod callback;
mod expr;
mod params;

use thiserror::Error as ThisError;

pub use callback::{Callback, CallbackCtx, Where};
pub use expr::{Constr, LinExpr, Sense};
pub use params::Params;

/// A variable of a [`Model`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(usize);

impl Var {
    pub(crate) fn new(index: usize) -> Self {
        Var(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VarType {
    Binary,
    Continuous,
}

#[derive(Debug, ThisError)]
pub enum SolverError {
    #[error("LP relaxation failed: {0}")]
    Lp(#[from] minilp::Error),
    #[error("no incumbent solution available")]
    NoIncumbent,
    #[error("lazy constraints are disabled for this model")]
    LazyDisabled,
    #[error("unknown variable {0:?}")]
    UnknownVar(Var),
    #[error("model has not been solved")]
    NotSolved,
}

/// Outcome of [`Model::optimize`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Optimal,
    Infeasible,
    TimeLimit,
    NodeLimit,
}

/// Counters collected during a search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Branch-and-bound nodes whose relaxation was solved.
    pub nodes: usize,
    /// LP (re-)solves, including re-solves after lazy constraints were added.
    pub lp_solves: usize,
    pub lazy_constraints: usize,
    /// Number of improving integer solutions found.
    pub solutions: usize,
}

#[derive(Debug, Clone)]
struct VarData {
    name: String,
    obj: f64,
    lb: f64,
    ub: f64,
    vtype: VarType,
}

#[derive(Debug, Clone)]
struct Incumbent {
    values: Vec<f64>,
    objective: f64,
}

#[derive(Debug, Clone)]
struct Outcome {
    status: Status,
    incumbent: Option<Incumbent>,
    stats: SolveStats,
}

/// A minimization problem over bounded variables.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    params: Params,
    vars: Vec<VarData>,
    constrs: Vec<Constr>,
    lazy_constraints: bool,
    outcome: Option<Outcome>,
}

impl Model {
    pub fn new(name: impl Into<String>, params: Params) -> Self {
        Model {
            name: name.into(),
            params,
            vars: vec![],
            constrs: vec![],
            lazy_constraints: false,
            outcome: None,
        }
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constrs(&self) -> usize {
        self.constrs.len()
    }

    pub fn var_name(&self, var: Var) -> Option<&str> {
        self.vars.get(var.index()).map(|v| v.name.as_str())
    }

    pub fn add_var(
        &mut self,
        name: impl Into<String>,
        obj: f64,
        lb: f64,
        ub: f64,
        vtype: VarType,
    ) -> Var {
        let var = Var::new(self.vars.len());
        self.vars.push(VarData {
            name: name.into(),
            obj,
            lb,
            ub,
            vtype,
        });
        var
    }

    pub fn add_constr(&mut self, name: impl Into<String>, expr: LinExpr, sense: Sense, rhs: f64) {
        self.constrs.push(Constr::new(name, expr, sense, rhs));
    }

    pub fn constrs(&self) -> &[Constr] {
        &self.constrs
    }

    /// Lazy constraints may only be added from a callback when this is enabled.
    pub fn set_lazy_constraints(&mut self, enabled: bool) {
        self.lazy_constraints = enabled;
    }

    pub fn lazy_constraints(&self) -> bool {
        self.lazy_constraints
    }

    /// Runs branch-and-cut, reporting to `callback` along the way.
    pub fn optimize<C: Callback>(&mut self, callback: &mut C) -> Result<Status, SolverError> {
        log::info!(
            "Optimizing model {} with {} variables and {} constraints.",
            self.name,
            self.vars.len(),
            self.constrs.len()
        );
        let outcome = branch::Search::new(self).run(callback)?;
        log::info!(
            "Finished with status {:?} after {} nodes, {} LP solves and {} lazy constraints.",
            outcome.status,
            outcome.stats.nodes,
            outcome.stats.lp_solves,
            outcome.stats.lazy_constraints
        );
        let status = outcome.status;
        self.outcome = Some(outcome);
        Ok(status)
    }

    pub fn stats(&self) -> SolveStats {
        self.outcome
            .as_ref()
            .map(|o| o.stats)
            .unwrap_or_default()
    }

    pub fn solution_count(&self) -> usize {
        self.stats().solutions
    }

    fn incumbent(&self) -> Result<&Incumbent, SolverError> {
        match &self.outcome {
            Some(Outcome {
                incumbent: Some(incumbent),
                ..
            }) => Ok(incumbent),
            Some(_) => Err(SolverError::NoIncumbent),
            None => Err(SolverError::NotSolved),
        }
    }

    /// Value of `var` in the best solution found.
    pub fn value(&self, var: Var) -> Result<f64, SolverError> {
        self.incumbent()?
            .values
            .get(var.index())
            .copied()
            .ok_or(SolverError::UnknownVar(var))
    }

    pub fn objective_value(&self) -> Result<f64, SolverError> {
        Ok(self.incumbent()?.objective)
    }
}
