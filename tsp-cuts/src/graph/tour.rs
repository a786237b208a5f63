use crate::{
    vertex::{Vertex, VertexId},
    Cost,
};

/// A closed tour. The edge from the last vertex back to the first is implied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    vertices: Vec<Vertex>,
    cost: Cost,
    cost_b: Cost,
}

impl IntoIterator for Tour {
    type Item = Vertex;
    type IntoIter = std::vec::IntoIter<Vertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tour {
    type Item = &'a Vertex;
    type IntoIter = std::slice::Iter<'a, Vertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.iter()
    }
}

impl Tour {
    pub fn empty() -> Self {
        Self {
            vertices: vec![],
            cost: Cost::new(0),
            cost_b: Cost::new(0),
        }
    }

    pub fn new(vertices: Vec<Vertex>) -> Self {
        let cost = Tour::closed_cost(&vertices, Vertex::cost_a);
        let cost_b = Tour::closed_cost(&vertices, Vertex::cost_b);
        Self {
            vertices,
            cost,
            cost_b,
        }
    }

    fn closed_cost<F>(vertices: &[Vertex], cost: F) -> Cost
    where
        F: Fn(&Vertex, &Vertex) -> Cost,
    {
        if vertices.len() < 2 {
            return Cost::new(0);
        }
        let closing = cost(&vertices[vertices.len() - 1], &vertices[0]);
        vertices.windows(2).map(|e| cost(&e[0], &e[1])).sum::<Cost>() + closing
    }

    /// Length in the first coordinate space.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Length in the second coordinate space.
    pub fn cost_b(&self) -> Cost {
        self.cost_b
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.as_slice()
    }

    pub fn ids(&self) -> Vec<VertexId> {
        self.vertices.iter().map(|v| v.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            self.vertices
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<String>>()
                .join(",")
        )
    }
}
