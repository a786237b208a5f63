use super::{Constr, LinExpr, Sense, SolverError, Var};

/// Point of the search at which a callback is invoked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Where {
    /// A node relaxation was solved and its optimum is fractional.
    MipNode,
    /// A candidate integer solution was found.
    MipSol,
}

/// User code invoked by [`super::Model::optimize`] during the search.
///
/// Invocations are sequential. Errors cannot be returned to the driver; a
/// callback that fails has to deal with it on its own.
pub trait Callback {
    fn callback(&mut self, ctx: &mut CallbackCtx<'_>);
}

impl<F> Callback for F
where
    F: FnMut(&mut CallbackCtx<'_>),
{
    fn callback(&mut self, ctx: &mut CallbackCtx<'_>) {
        self(ctx)
    }
}

/// What a callback sees of the search when it is invoked.
pub struct CallbackCtx<'a> {
    event: Where,
    point: &'a [f64],
    objective: f64,
    lazy_enabled: bool,
    lazy: Vec<Constr>,
}

impl<'a> CallbackCtx<'a> {
    pub(crate) fn new(event: Where, point: &'a [f64], objective: f64, lazy_enabled: bool) -> Self {
        CallbackCtx {
            event,
            point,
            objective,
            lazy_enabled,
            lazy: vec![],
        }
    }

    pub fn event(&self) -> Where {
        self.event
    }

    /// Objective value of the candidate solution or node relaxation.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Value of `var` in the candidate solution. Only available on [`Where::MipSol`].
    pub fn solution(&self, var: Var) -> Result<f64, SolverError> {
        if self.event != Where::MipSol {
            return Err(SolverError::NoIncumbent);
        }
        self.point
            .get(var.index())
            .copied()
            .ok_or(SolverError::UnknownVar(var))
    }

    pub fn get_solution(&self, vars: &[Var]) -> Result<Vec<f64>, SolverError> {
        vars.iter().map(|var| self.solution(*var)).collect()
    }

    /// Adds `expr <sense> rhs` to the model for the rest of the search.
    pub fn add_lazy(&mut self, expr: LinExpr, sense: Sense, rhs: f64) -> Result<(), SolverError> {
        if !self.lazy_enabled {
            return Err(SolverError::LazyDisabled);
        }
        if let Some((var, _)) = expr.terms().iter().find(|(v, _)| v.index() >= self.point.len()) {
            return Err(SolverError::UnknownVar(*var));
        }
        let name = format!("lazy_{}", self.lazy.len());
        self.lazy.push(Constr::new(name, expr, sense, rhs));
        Ok(())
    }

    pub(crate) fn into_lazy(self) -> Vec<Constr> {
        self.lazy
    }
}
