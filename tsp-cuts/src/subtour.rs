//! Splitting an edge assignment into sub-tours.

use fixedbitset::FixedBitSet;
use ndarray::Array2;

/// Edges with a value above this are considered selected.
pub const EDGE_THRESHOLD: f64 = 0.5;

/// A sub-tour, given as positions in the vertex enumeration of a graph.
pub type SubTour = Vec<usize>;

/// Values of the edge variables of a graph, indexed by vertex position.
/// The matrix is symmetric and the diagonal is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    values: Array2<f64>,
}

impl Assignment {
    pub fn zeros(order: usize) -> Self {
        Assignment {
            values: Array2::zeros((order, order)),
        }
    }

    /// Builds an assignment by querying `value(u, v)` for every `u < v`.
    pub fn from_fn<F>(order: usize, mut value: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut assignment = Assignment::zeros(order);
        for u in 0..order {
            for v in u + 1..order {
                assignment.set(u, v, value(u, v));
            }
        }
        assignment
    }

    /// Builds a 0/1 assignment selecting the given undirected edges.
    pub fn from_edges<I>(order: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut assignment = Assignment::zeros(order);
        for (u, v) in edges {
            assignment.set(u, v, 1.0);
        }
        assignment
    }

    pub fn order(&self) -> usize {
        self.values.nrows()
    }

    pub fn set(&mut self, u: usize, v: usize, value: f64) {
        if u != v {
            self.values[[u, v]] = value;
            self.values[[v, u]] = value;
        }
    }

    pub fn get(&self, u: usize, v: usize) -> f64 {
        self.values[[u, v]]
    }

    pub fn is_selected(&self, u: usize, v: usize) -> bool {
        self.get(u, v) > EDGE_THRESHOLD
    }
}

/// Iterator over the sub-tours of an assignment.
///
/// Each sub-tour starts at the first unvisited vertex and repeatedly moves to
/// the first unvisited vertex connected to the current one by a selected edge.
/// Every vertex ends up in exactly one sub-tour. If every vertex has exactly
/// two selected edges, the sub-tours are the cycles of the selected edges.
pub struct SubTours<'a> {
    assignment: &'a Assignment,
    seen: FixedBitSet,
    start: usize,
}

impl<'a> SubTours<'a> {
    pub fn new(assignment: &'a Assignment) -> Self {
        SubTours {
            assignment,
            seen: FixedBitSet::with_capacity(assignment.order()),
            start: 0,
        }
    }

    fn new_node(&mut self) -> Option<usize> {
        while self.start < self.assignment.order() {
            if !self.seen.contains(self.start) {
                return Some(self.start);
            }
            self.start += 1;
        }
        None
    }

    fn best_next(&self, u: usize) -> Option<usize> {
        (0..self.assignment.order())
            .find(|&v| !self.seen.contains(v) && self.assignment.is_selected(u, v))
    }
}

impl Iterator for SubTours<'_> {
    type Item = SubTour;

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.new_node()?;
        let mut tour = vec![];
        loop {
            self.seen.insert(node);
            tour.push(node);
            match self.best_next(node) {
                Some(next) => node = next,
                None => return Some(tour),
            }
        }
    }
}

/// The shortest sub-tour of `assignment`, the first one on ties.
pub fn min_sub_tour(assignment: &Assignment) -> SubTour {
    let mut best: Option<SubTour> = None;
    for tour in SubTours::new(assignment) {
        if best.as_ref().map_or(true, |b| tour.len() < b.len()) {
            best = Some(tour);
        }
    }
    best.unwrap_or_default()
}
