//! Exact traveling salesman tours with lazily generated subtour elimination
//! constraints.
//!
//! A [`Graph`] states the degree-2 formulation over a set of [`Vertex`]es.
//! Solving it runs a branch-and-cut search in which every integer candidate
//! is split into sub-tours; candidates made of more than one sub-tour are cut
//! off by a Dantzig-Fulkerson-Johnson inequality over the shortest one.

pub mod cost;
pub mod elimination;
pub mod error;
pub mod export;
pub mod graph;
pub mod solver;
pub mod subtour;
pub mod vertex;

pub use cost::Cost;
pub use error::{Error, Result};
pub use graph::{Graph, Solved, Tour};
pub use vertex::{Sampler, Vertex, VertexId};
