//! Lazy subtour elimination (Dantzig-Fulkerson-Johnson cuts).

use crate::{
    graph::{EdgeVars, Graph},
    solver::{Callback, CallbackCtx, LinExpr, Sense, SolverError, Where},
    subtour::{min_sub_tour, Assignment, SubTour},
};

/// The inequality `sum of x_uv over all u, v in S <= |S| - 1` for a sub-tour `S`.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyCut {
    pub sub_tour: SubTour,
    pub expr: LinExpr,
    pub sense: Sense,
    pub rhs: f64,
}

/// The cut forbidding the shortest sub-tour of `assignment`, or `None` if
/// that sub-tour already visits every vertex.
pub fn subtour_cut(assignment: &Assignment, vars: &EdgeVars) -> Option<LazyCut> {
    let tour = min_sub_tour(assignment);
    if tour.len() >= assignment.order() {
        return None;
    }

    let expr: LinExpr = vars.among(&tour).collect();
    let rhs = (tour.len() - 1) as f64;
    Some(LazyCut {
        sub_tour: tour,
        expr,
        sense: Sense::LessEqual,
        rhs,
    })
}

/// Callback rejecting every candidate solution that is not a single tour.
pub struct SubtourElimination<'a> {
    graph: &'a Graph,
    vars: &'a EdgeVars,
}

impl<'a> SubtourElimination<'a> {
    pub fn new(graph: &'a Graph, vars: &'a EdgeVars) -> Self {
        SubtourElimination { graph, vars }
    }

    fn get_solutions(&self, ctx: &CallbackCtx<'_>) -> Result<Assignment, SolverError> {
        let order = self.graph.order();
        let mut assignment = Assignment::zeros(order);
        for u in 0..order {
            for v in u + 1..order {
                if let Some(x_uv) = self.vars.get(u, v) {
                    assignment.set(u, v, ctx.solution(x_uv)?);
                }
            }
        }
        Ok(assignment)
    }

    fn lazy_constraint_subtour_elimination(
        &self,
        ctx: &mut CallbackCtx<'_>,
    ) -> Result<(), SolverError> {
        let assignment = self.get_solutions(ctx)?;
        if let Some(cut) = subtour_cut(&assignment, self.vars) {
            log::debug!(
                "Sub-tour of {} out of {} vertices at objective {}.",
                cut.sub_tour.len(),
                self.graph.order(),
                ctx.objective()
            );
            ctx.add_lazy(cut.expr, cut.sense, cut.rhs)?;
        }
        Ok(())
    }
}

impl Callback for SubtourElimination<'_> {
    fn callback(&mut self, ctx: &mut CallbackCtx<'_>) {
        if ctx.event() != Where::MipSol {
            return;
        }
        if let Err(err) = self.lazy_constraint_subtour_elimination(ctx) {
            log::warn!("Ignoring candidate solution: {}", err);
        }
    }
}
