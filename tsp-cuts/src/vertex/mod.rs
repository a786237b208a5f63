mod reader;
mod sample;

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
    sync::atomic::{AtomicUsize, Ordering as AtomicOrdering},
};

pub use reader::{read_all, VertexReader};
pub use sample::{RandomPoints, Sampler};

use crate::Cost;

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Identifier of a vertex. Ids are handed out once per process, starting at 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(usize);

impl VertexId {
    fn next() -> Self {
        VertexId(NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A position in one of the two coordinate spaces.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance, rounded up.
    pub fn cost(&self, other: &Point) -> Cost {
        Cost::ceil((self.x - other.x).hypot(self.y - other.y))
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Selects one of the two coordinate spaces of a vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Space {
    A,
    B,
}

/// A vertex with two independent positions. Two vertices are equal iff they
/// were created by the same call, regardless of their coordinates.
#[derive(Copy, Clone, Debug)]
pub struct Vertex {
    id: VertexId,
    a: Point,
    b: Point,
}

impl Vertex {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Vertex {
            id: VertexId::next(),
            a: Point::new(x1, y1),
            b: Point::new(x2, y2),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn point(&self, space: Space) -> &Point {
        match space {
            Space::A => &self.a,
            Space::B => &self.b,
        }
    }

    /// Cost in the first coordinate space. This is the one the objective uses.
    pub fn cost_a(&self, other: &Vertex) -> Cost {
        self.a.cost(&other.a)
    }

    /// Cost in the second coordinate space.
    pub fn cost_b(&self, other: &Vertex) -> Cost {
        self.b.cost(&other.b)
    }

    pub fn cost(&self, other: &Vertex, space: Space) -> Cost {
        self.point(space).cost(other.point(space))
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Vertex) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialOrd for Vertex {
    fn partial_cmp(&self, other: &Vertex) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vertex {
    fn cmp(&self, other: &Vertex) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::fmt::Display for Vertex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v:{}", self.id)
    }
}

#[cfg(test)]
mod test_vertex {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity() {
        let u = Vertex::new(1.0, 2.0, 3.0, 4.0);
        let v = Vertex::new(1.0, 2.0, 3.0, 4.0);
        assert_ne!(u, v);
        let w = u;
        assert_eq!(u, w);
        assert!(u.id() < v.id());

        let set: HashSet<Vertex> = vec![u, v, u].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_costs() {
        let u = Vertex::new(0.0, 0.0, 1.0, 1.0);
        let v = Vertex::new(3.0, 4.0, 1.0, 2.5);
        assert_eq!(u.cost_a(&v), 5.into());
        assert_eq!(v.cost_a(&u), 5.into());
        assert_eq!(u.cost_b(&v), 2.into());
        assert_eq!(v.cost_b(&u), 2.into());
        assert_eq!(u.cost(&v, Space::B), u.cost_b(&v));
    }

    #[test]
    fn test_costs_coincident() {
        let u = Vertex::new(7.5, -2.0, 0.0, 0.0);
        let v = Vertex::new(7.5, -2.0, 0.0, 0.1);
        assert_eq!(u.cost_a(&v), 0.into());
        assert_eq!(u.cost_a(&u), 0.into());
        assert_eq!(u.cost_b(&v), 1.into());
    }

    #[test]
    fn test_display() {
        let u = Vertex::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(format!("{}", u), format!("v:{}", u.id().get()));
    }
}
