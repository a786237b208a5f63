use std::{cmp::Ordering, time::Instant};

use binary_heap_plus::BinaryHeap;
use compare::Compare;
use minilp::{OptimizationDirection, Problem, Solution, Variable};

use super::{
    Callback, CallbackCtx, Constr, Incumbent, Model, Outcome, SolveStats, SolverError, Status,
    Var, VarType, Where,
};

/// An open node of the search tree, given by the binary variables fixed on
/// the way down from the root.
#[derive(Debug, Clone)]
struct Node {
    bound: f64,
    depth: usize,
    fixings: Vec<(Var, f64)>,
}

impl Node {
    fn root() -> Self {
        Node {
            bound: f64::NEG_INFINITY,
            depth: 0,
            fixings: vec![],
        }
    }

    fn child(&self, bound: f64, var: Var, value: f64) -> Self {
        let mut fixings = self.fixings.clone();
        fixings.push((var, value));
        Node {
            bound,
            depth: self.depth + 1,
            fixings,
        }
    }
}

/// Best bound first, deeper nodes first among equal bounds.
struct BestBound;

impl Compare<Node> for BestBound {
    fn compare(&self, l: &Node, r: &Node) -> Ordering {
        r.bound
            .partial_cmp(&l.bound)
            .unwrap_or(Ordering::Equal)
            .then(l.depth.cmp(&r.depth))
    }
}

enum Processed {
    Pruned,
    Branch { var: Var, bound: f64 },
}

pub(super) struct Search<'m> {
    model: &'m Model,
    lp: Problem,
    lp_vars: Vec<Variable>,
    /// Solution of the root relaxation with every cut found so far.
    root: Option<Solution>,
    /// Binary variables with integral objective coefficients only.
    integral_objective: bool,
    incumbent: Option<Incumbent>,
    stats: SolveStats,
}

impl<'m> Search<'m> {
    pub(super) fn new(model: &'m Model) -> Self {
        let mut lp = Problem::new(OptimizationDirection::Minimize);
        let lp_vars = model
            .vars
            .iter()
            .map(|v| lp.add_var(v.obj, (v.lb, v.ub)))
            .collect::<Vec<Variable>>();
        let integral_objective = model
            .vars
            .iter()
            .all(|v| v.vtype == VarType::Binary && v.obj.fract() == 0.0);

        let mut search = Search {
            model,
            lp,
            lp_vars,
            root: None,
            integral_objective,
            incumbent: None,
            stats: SolveStats::default(),
        };
        for constr in &model.constrs {
            search.add_to_lp(constr);
        }
        search
    }

    fn tol(&self) -> f64 {
        self.model.params.bound_tol
    }

    /// Terms in variable order with repeated variables merged, as the LP engine expects them.
    fn lp_terms(&self, constr: &Constr) -> Vec<(Variable, f64)> {
        let mut terms = constr.expr.terms().to_vec();
        terms.sort_by_key(|(var, _)| *var);

        let mut merged: Vec<(Var, f64)> = Vec::with_capacity(terms.len());
        for (var, coeff) in terms {
            match merged.last_mut() {
                Some((last, sum)) if *last == var => *sum += coeff,
                _ => merged.push((var, coeff)),
            }
        }
        merged
            .into_iter()
            .map(|(var, coeff)| (self.lp_vars[var.index()], coeff))
            .collect()
    }

    fn add_to_lp(&mut self, constr: &Constr) {
        if constr.expr.is_empty() {
            return;
        }
        let terms = self.lp_terms(constr);
        self.lp
            .add_constraint(terms, constr.sense.to_op(), constr.rhs);
        self.root = None;
    }

    pub(super) fn run<C: Callback>(mut self, callback: &mut C) -> Result<Outcome, SolverError> {
        let started = Instant::now();
        let params = self.model.params.clone();

        if self.has_violated_empty_constr() {
            return Ok(self.finish(Status::Infeasible));
        }

        let mut open = BinaryHeap::from_vec_cmp(vec![Node::root()], BestBound);
        while let Some(node) = open.pop() {
            if let Some(limit) = params.time_limit {
                if started.elapsed() >= limit {
                    log::info!("Time limit of {:?} reached.", limit);
                    return Ok(self.finish(Status::TimeLimit));
                }
            }
            if let Some(limit) = params.node_limit {
                if self.stats.nodes >= limit {
                    log::info!("Node limit of {} reached.", limit);
                    return Ok(self.finish(Status::NodeLimit));
                }
            }
            if self.is_pruned(node.bound) {
                continue;
            }

            self.stats.nodes += 1;
            log::trace!(
                "Node {} at depth {} with bound {}.",
                self.stats.nodes,
                node.depth,
                node.bound
            );
            if let Processed::Branch { var, bound } = self.process(&node, callback)? {
                log::trace!(
                    "Branching on {} with bound {}.",
                    self.model.var_name(var).unwrap_or("?"),
                    bound
                );
                open.push(node.child(bound, var, 0.0));
                open.push(node.child(bound, var, 1.0));
            }
        }

        let status = if self.incumbent.is_some() {
            Status::Optimal
        } else {
            Status::Infeasible
        };
        Ok(self.finish(status))
    }

    fn finish(self, status: Status) -> Outcome {
        Outcome {
            status,
            incumbent: self.incumbent,
            stats: self.stats,
        }
    }

    /// Constraints without terms never reach the LP, they are checked here.
    fn has_violated_empty_constr(&self) -> bool {
        self.model
            .constrs
            .iter()
            .any(|c| c.expr.is_empty() && !c.sense.holds(0.0, c.rhs, self.tol()))
    }

    fn is_pruned(&self, bound: f64) -> bool {
        match &self.incumbent {
            Some(incumbent) => {
                let bound = if self.integral_objective {
                    (bound - self.tol()).ceil()
                } else {
                    bound
                };
                bound >= incumbent.objective - self.tol()
            }
            None => false,
        }
    }

    /// Solves the relaxation of `node`. `None` if it is infeasible.
    fn relax(&mut self, node: &Node) -> Result<Option<Solution>, SolverError> {
        if self.root.is_none() {
            self.stats.lp_solves += 1;
            match self.lp.solve() {
                Ok(root) => self.root = Some(root),
                Err(minilp::Error::Infeasible) => return Ok(None),
                Err(err) => return Err(err.into()),
            }
        }

        let mut solution = match &self.root {
            Some(root) => root.clone(),
            None => return Ok(None),
        };
        for (var, value) in &node.fixings {
            self.stats.lp_solves += 1;
            solution = match solution.fix_var(self.lp_vars[var.index()], *value) {
                Ok(solution) => solution,
                Err(minilp::Error::Infeasible) => return Ok(None),
                Err(err) => return Err(err.into()),
            };
        }
        Ok(Some(solution))
    }

    fn process<C: Callback>(
        &mut self,
        node: &Node,
        callback: &mut C,
    ) -> Result<Processed, SolverError> {
        let mut solution = match self.relax(node)? {
            Some(solution) => solution,
            None => return Ok(Processed::Pruned),
        };

        loop {
            let bound = solution.objective();
            if self.is_pruned(bound) {
                return Ok(Processed::Pruned);
            }

            let mut point: Vec<f64> = self.lp_vars.iter().map(|v| solution[*v]).collect();
            let fractional = self.most_fractional(&point);
            let event = match fractional {
                Some(_) => Where::MipNode,
                None => {
                    self.round_binaries(&mut point);
                    Where::MipSol
                }
            };
            let objective = match event {
                Where::MipSol => self.objective_of(&point),
                Where::MipNode => bound,
            };

            let lazy = {
                let mut ctx =
                    CallbackCtx::new(event, &point, objective, self.model.lazy_constraints);
                callback.callback(&mut ctx);
                ctx.into_lazy()
            };
            let tol = self.tol();
            let violated = lazy.iter().any(|c| !c.is_satisfied(&point, tol));

            for constr in &lazy {
                log::debug!(
                    "Lazy constraint over {} terms {} {}.",
                    constr.expr.len(),
                    constr.sense,
                    constr.rhs
                );
                self.add_to_lp(constr);
            }
            self.stats.lazy_constraints += lazy.len();

            if violated {
                for constr in &lazy {
                    let terms = self.lp_terms(constr);
                    self.stats.lp_solves += 1;
                    let op = constr.sense.to_op();
                    solution = match solution.add_constraint(terms, op, constr.rhs) {
                        Ok(solution) => solution,
                        Err(minilp::Error::Infeasible) => return Ok(Processed::Pruned),
                        Err(err) => return Err(err.into()),
                    };
                }
                continue;
            }

            return match fractional {
                Some(var) => Ok(Processed::Branch { var, bound }),
                None => {
                    self.accept(point, objective);
                    Ok(Processed::Pruned)
                }
            };
        }
    }

    /// The binary variable whose value is closest to 0.5, if any is fractional.
    fn most_fractional(&self, point: &[f64]) -> Option<Var> {
        let tol = self.model.params.int_feas_tol;
        self.model
            .vars
            .iter()
            .zip(point)
            .enumerate()
            .filter(|(_, (v, _))| v.vtype == VarType::Binary)
            .map(|(i, (_, value))| (i, (value - value.round()).abs()))
            .filter(|(_, gap)| *gap > tol)
            .max_by(|(_, l), (_, r)| l.partial_cmp(r).unwrap_or(Ordering::Equal))
            .map(|(i, _)| Var::new(i))
    }

    fn round_binaries(&self, point: &mut [f64]) {
        for (v, value) in self.model.vars.iter().zip(point.iter_mut()) {
            if v.vtype == VarType::Binary {
                *value = value.round();
            }
        }
    }

    fn objective_of(&self, point: &[f64]) -> f64 {
        self.model
            .vars
            .iter()
            .zip(point)
            .map(|(v, value)| v.obj * value)
            .sum()
    }

    fn accept(&mut self, values: Vec<f64>, objective: f64) {
        let improves = match &self.incumbent {
            Some(incumbent) => objective < incumbent.objective - self.tol(),
            None => true,
        };
        if improves {
            log::debug!("New incumbent with objective {}.", objective);
            self.stats.solutions += 1;
            self.incumbent = Some(Incumbent { values, objective });
        }
    }
}
