use ndarray::Array2;

use crate::solver::Var;

/// The decision variable of every edge, shared by both directions.
///
/// Only the slot `(min(u, v), max(u, v))` is ever written, so `(u, v)` and
/// `(v, u)` always resolve to the same variable.
#[derive(Debug, Clone)]
pub struct EdgeVars {
    vars: Array2<Option<Var>>,
    len: usize,
}

impl EdgeVars {
    pub fn new(order: usize) -> Self {
        EdgeVars {
            vars: Array2::from_elem((order, order), None),
            len: 0,
        }
    }

    fn key(u: usize, v: usize) -> [usize; 2] {
        if u < v {
            [u, v]
        } else {
            [v, u]
        }
    }

    /// Stores the variable of edge `{u, v}`. Returns `false` and keeps the
    /// existing variable if the edge already has one.
    pub fn insert(&mut self, u: usize, v: usize, var: Var) -> bool {
        assert_ne!(u, v, "no loops in a simple graph");
        let slot = &mut self.vars[EdgeVars::key(u, v)];
        if slot.is_some() {
            return false;
        }
        *slot = Some(var);
        self.len += 1;
        true
    }

    pub fn get(&self, u: usize, v: usize) -> Option<Var> {
        if u == v {
            return None;
        }
        self.vars[EdgeVars::key(u, v)]
    }

    /// Variables of the edges incident to `u`.
    pub fn incident(&self, u: usize) -> impl Iterator<Item = Var> + '_ {
        (0..self.order()).filter_map(move |v| self.get(u, v))
    }

    /// Variables of all edges between the given vertices.
    pub fn among<'a>(&'a self, nodes: &'a [usize]) -> impl Iterator<Item = Var> + 'a {
        nodes.iter().enumerate().flat_map(move |(i, &u)| {
            nodes[i + 1..].iter().filter_map(move |&v| self.get(u, v))
        })
    }

    pub fn order(&self) -> usize {
        self.vars.nrows()
    }

    /// Number of edges with a variable.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod test_edge_vars {
    use super::*;

    #[test]
    fn test_symmetric() {
        let mut vars = EdgeVars::new(3);
        assert!(vars.insert(2, 0, Var::new(7)));
        assert_eq!(vars.get(0, 2), Some(Var::new(7)));
        assert_eq!(vars.get(2, 0), Some(Var::new(7)));
        assert_eq!(vars.get(0, 1), None);
        assert_eq!(vars.get(1, 1), None);
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_no_duplicates() {
        let mut vars = EdgeVars::new(3);
        assert!(vars.insert(0, 1, Var::new(0)));
        assert!(!vars.insert(1, 0, Var::new(1)));
        assert_eq!(vars.get(0, 1), Some(Var::new(0)));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_incident_and_among() {
        let mut vars = EdgeVars::new(4);
        let mut next = 0;
        for u in 0..4 {
            for v in u + 1..4 {
                vars.insert(u, v, Var::new(next));
                next += 1;
            }
        }
        assert_eq!(vars.len(), 6);
        assert_eq!(vars.incident(2).count(), 3);
        assert_eq!(
            vars.among(&[3, 0, 1]).collect::<Vec<Var>>(),
            vec![vars.get(0, 3).unwrap(), vars.get(1, 3).unwrap(), vars.get(0, 1).unwrap()]
        );
    }
}
