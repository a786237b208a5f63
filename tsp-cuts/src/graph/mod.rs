mod edge_vars;
mod tour;

use std::{path::Path, time::Duration, time::Instant};

use rustc_hash::FxHashMap;

pub use edge_vars::EdgeVars;
pub use tour::Tour;

use crate::{
    elimination::SubtourElimination,
    error::{Error, Result},
    solver::{LinExpr, Model, Params, Sense, SolveStats, Status, VarType},
    subtour::{min_sub_tour, Assignment, SubTour},
    vertex::{read_all, Sampler, Vertex, VertexId},
};

/// The complete graph over a fixed set of vertices, and the degree-2
/// formulation of the traveling salesman problem on it.
#[derive(Debug, Clone)]
pub struct Graph {
    vertices: Vec<Vertex>,
    index: FxHashMap<VertexId, usize>,
}

/// Result of [`Graph::solve`].
#[derive(Debug, Clone)]
pub struct Solved {
    pub tour: Tour,
    pub elapsed: Duration,
    pub status: Status,
    pub stats: SolveStats,
}

impl Graph {
    pub fn new<I>(vertices: I) -> Self
    where
        I: IntoIterator<Item = Vertex>,
    {
        let vertices: Vec<Vertex> = vertices.into_iter().collect();
        let index: FxHashMap<VertexId, usize> = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id(), i))
            .collect();
        debug_assert_eq!(index.len(), vertices.len(), "vertices must be distinct");
        Graph { vertices, index }
    }

    /// Reads every vertex in `path` and keeps a random sample of `sample_size`.
    pub fn read<P: AsRef<Path>>(path: P, sample_size: usize, sampler: &mut Sampler) -> Result<Self> {
        let vertices = read_all(path)?;
        Ok(Graph::new(sampler.sample(&vertices, sample_size)?))
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        let order = self.order();
        order * order.saturating_sub(1) / 2
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Position of a vertex in the enumeration order.
    pub fn position(&self, id: VertexId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Adds one binary variable per edge, weighted by its cost.
    pub fn add_vars(&self, model: &mut Model) -> EdgeVars {
        let mut vars = EdgeVars::new(self.order());
        for (i, u) in self.vertices.iter().enumerate() {
            for (j, v) in self.vertices.iter().enumerate().skip(i + 1) {
                let name = format!("x_{}_{}", u.id(), v.id());
                let x_uv = model.add_var(name, u.cost_a(v).as_float(), 0.0, 1.0, VarType::Binary);
                let inserted = vars.insert(i, j, x_uv);
                debug_assert!(inserted);
            }
        }
        vars
    }

    /// Every vertex has exactly two incident edges.
    pub fn add_degree_constraints(&self, model: &mut Model, vars: &EdgeVars) {
        for (u, vertex) in self.vertices.iter().enumerate() {
            let expr: LinExpr = vars.incident(u).collect();
            model.add_constr(format!("degree_eq_2_{}", vertex.id()), expr, Sense::Equal, 2.0);
        }
    }

    /// The model without any subtour elimination, with lazy constraints enabled.
    pub fn build(&self, params: Params) -> (Model, EdgeVars) {
        let mut model = Model::new("kSTSP", params);
        model.set_lazy_constraints(true);

        let vars = self.add_vars(&mut model);
        self.add_degree_constraints(&mut model, &vars);
        (model, vars)
    }

    pub fn find_sub_tour(&self, assignment: &Assignment) -> SubTour {
        min_sub_tour(assignment)
    }

    /// The vertices at the given positions, as a closed tour.
    pub fn tour(&self, positions: &[usize]) -> Tour {
        Tour::new(positions.iter().map(|&i| self.vertices[i]).collect())
    }

    /// The tour described by `assignment`, which has to be a single cycle
    /// through every vertex.
    pub fn accept(&self, assignment: &Assignment) -> Result<Tour> {
        let sub_tour = self.find_sub_tour(assignment);
        if sub_tour.len() != self.order() {
            return Err(Error::IncompleteTour {
                visited: sub_tour.len(),
                order: self.order(),
            });
        }
        Ok(self.tour(&sub_tour))
    }

    /// Solves the instance to optimality, or until a limit in `params` is hit.
    pub fn solve(&self, params: &Params) -> Result<Solved> {
        let start = Instant::now();
        if self.order() == 0 {
            return Ok(Solved {
                tour: Tour::empty(),
                elapsed: start.elapsed(),
                status: Status::Optimal,
                stats: SolveStats::default(),
            });
        }

        let (mut model, vars) = self.build(params.clone());
        let status = {
            let mut elimination = SubtourElimination::new(self, &vars);
            model.optimize(&mut elimination)?
        };
        let elapsed = start.elapsed();

        if model.solution_count() == 0 {
            log::info!("No solution found ({:?}).", status);
            return Err(Error::NoSolution);
        }

        let mut assignment = Assignment::zeros(self.order());
        for u in 0..self.order() {
            for v in u + 1..self.order() {
                if let Some(x_uv) = vars.get(u, v) {
                    assignment.set(u, v, model.value(x_uv)?);
                }
            }
        }
        let tour = self.accept(&assignment)?;
        log::info!(
            "Found tour of cost {} over {} vertices in {:.3}s.",
            tour.cost(),
            tour.len(),
            elapsed.as_secs_f64()
        );

        Ok(Solved {
            tour,
            elapsed,
            status,
            stats: model.stats(),
        })
    }
}

#[cfg(test)]
mod test_graph {
    use super::*;
    use crate::{
        vertex::{RandomPoints, Space},
        Cost,
    };
    use std::collections::HashSet;

    fn brute_force(graph: &Graph) -> Cost {
        fn permute(rest: &mut Vec<usize>, k: usize, graph: &Graph, best: &mut Cost) {
            if k == rest.len() {
                let mut positions = vec![0];
                positions.extend(rest.iter().copied());
                let cost = graph.tour(&positions).cost();
                if cost < *best {
                    *best = cost;
                }
                return;
            }
            for i in k..rest.len() {
                rest.swap(k, i);
                permute(rest, k + 1, graph, best);
                rest.swap(k, i);
            }
        }

        let mut rest: Vec<usize> = (1..graph.order()).collect();
        let mut best = Cost::new(usize::MAX);
        permute(&mut rest, 0, graph, &mut best);
        best
    }

    fn is_hamiltonian(graph: &Graph, tour: &Tour) -> bool {
        let ids: HashSet<VertexId> = tour.ids().into_iter().collect();
        tour.len() == graph.order()
            && ids.len() == graph.order()
            && graph.vertices().iter().all(|v| ids.contains(&v.id()))
    }

    #[test]
    fn test_size() {
        let graph = Graph::new((0..5).map(|i| Vertex::new(i as f64, 0.0, 0.0, 0.0)));
        assert_eq!(graph.order(), 5);
        assert_eq!(graph.size(), 10);
        assert_eq!(Graph::new(vec![]).size(), 0);
    }

    #[test]
    fn test_build() {
        let graph = Graph::new((0..6).map(|i| Vertex::new(i as f64, 1.0, 0.0, 0.0)));
        let (model, vars) = graph.build(Params::default());
        assert_eq!(model.num_vars(), graph.size());
        assert_eq!(vars.len(), graph.size());
        assert_eq!(model.num_constrs(), graph.order());
        assert!(model.lazy_constraints());
        for constr in model.constrs() {
            assert_eq!(constr.expr.len(), graph.order() - 1);
            assert_eq!(constr.sense, Sense::Equal);
            assert_eq!(constr.rhs, 2.0);
        }
        for u in 0..graph.order() {
            for v in 0..graph.order() {
                assert_eq!(vars.get(u, v), vars.get(v, u));
            }
        }
        let (u, v) = (&graph.vertices()[1], &graph.vertices()[4]);
        let x_uv = vars.get(4, 1).unwrap();
        assert_eq!(
            model.var_name(x_uv),
            Some(format!("x_{}_{}", u.id(), v.id()).as_str())
        );
    }

    #[test]
    fn test_position() {
        let vertices: Vec<Vertex> = (0..3).map(|i| Vertex::new(i as f64, 0.0, 0.0, 0.0)).collect();
        let graph = Graph::new(vertices.clone());
        assert_eq!(graph.position(vertices[2].id()), Some(2));
        assert_eq!(graph.position(Vertex::new(0.0, 0.0, 0.0, 0.0).id()), None);
    }

    ///   B --4-- C
    ///  |3|     |3|
    ///   A --4-- D
    #[test]
    fn test_solve_rectangle() {
        let a = Vertex::new(0.0, 0.0, 0.0, 0.0);
        let b = Vertex::new(0.0, 3.0, 0.0, 3.0);
        let c = Vertex::new(4.0, 3.0, 4.0, 3.0);
        let d = Vertex::new(4.0, 0.0, 4.0, 0.0);
        let graph = Graph::new(vec![a, b, c, d]);

        let solved = graph.solve(&Params::default()).unwrap();
        assert_eq!(solved.status, Status::Optimal);
        assert_eq!(solved.tour.cost(), 14.into());
        assert_eq!(solved.tour.cost_b(), 14.into());
        assert_eq!(solved.tour.ids(), vec![a.id(), b.id(), c.id(), d.id()]);
        assert_eq!(brute_force(&graph), 14.into());
    }

    /// Two far apart clusters: the degree-2 relaxation alone picks two
    /// triangles, so at least one lazy cut is needed.
    #[test]
    fn test_solve_needs_cut() {
        let graph = Graph::new(vec![
            Vertex::new(0.0, 0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0, 0.0),
            Vertex::new(100.0, 0.0, 0.0, 0.0),
            Vertex::new(101.0, 0.0, 0.0, 0.0),
            Vertex::new(100.0, 1.0, 0.0, 0.0),
        ]);

        let solved = graph.solve(&Params::default()).unwrap();
        assert!(solved.stats.lazy_constraints >= 1);
        assert!(is_hamiltonian(&graph, &solved.tour));
        assert_eq!(solved.tour.cost(), brute_force(&graph));
    }

    #[test]
    fn test_solve_matches_brute_force() {
        let mut sampler = Sampler::seeded(0x0123_4567_89AB_CDEF);
        for order in 3..=8 {
            let vertices: Vec<Vertex> = RandomPoints::new(&mut sampler, 50.0)
                .take(order)
                .collect();
            let graph = Graph::new(vertices);

            let solved = graph.solve(&Params::default()).unwrap();
            assert!(is_hamiltonian(&graph, &solved.tour));
            assert_eq!(solved.tour.cost(), brute_force(&graph), "order {}", order);
        }
    }

    #[test]
    fn test_solve_deterministic() {
        let points: Vec<Vertex> = RandomPoints::new(&mut Sampler::seeded(5), 100.0)
            .take(40)
            .collect();

        let solve = || {
            let mut sampler = Sampler::seeded(9);
            let graph = Graph::new(sampler.sample(&points, 9).unwrap());
            let solved = graph.solve(&Params::default()).unwrap();
            (graph.vertices().to_vec(), solved.tour.ids(), solved.tour.cost())
        };
        assert_eq!(solve(), solve());
    }

    #[test]
    fn test_solve_too_small() {
        let graph = Graph::new(vec![Vertex::new(0.0, 0.0, 0.0, 0.0)]);
        assert!(matches!(graph.solve(&Params::default()), Err(Error::NoSolution)));

        let graph = Graph::new(vec![
            Vertex::new(0.0, 0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0, 0.0),
        ]);
        assert!(matches!(graph.solve(&Params::default()), Err(Error::NoSolution)));

        let solved = Graph::new(vec![]).solve(&Params::default()).unwrap();
        assert!(solved.tour.is_empty());
    }

    ///   0 -- 1     3 -- 4
    ///    \  /       \  /
    ///     2          5
    #[test]
    fn test_accept_rejects_sub_tours() {
        let graph = Graph::new((0..6).map(|i| Vertex::new(i as f64, 0.0, 0.0, 0.0)));
        let fragmented =
            Assignment::from_edges(6, vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        match graph.accept(&fragmented) {
            Err(Error::IncompleteTour { visited, order }) => {
                assert_eq!(visited, 3);
                assert_eq!(order, 6);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let cycle =
            Assignment::from_edges(6, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        let tour = graph.accept(&cycle).unwrap();
        let ids: Vec<VertexId> = graph.vertices().iter().map(|v| v.id()).collect();
        assert_eq!(tour.ids(), ids);
    }

    #[test]
    fn test_solve_without_nodes() {
        let mut sampler = Sampler::seeded(1);
        let graph = Graph::new(RandomPoints::new(&mut sampler, 100.0).take(8));
        let params = Params::default().with_node_limit(Some(0));
        assert!(matches!(graph.solve(&params), Err(Error::NoSolution)));
    }

    /// With one node less than a full search needs, every search that found
    /// its first tour earlier stops with that tour.
    #[test]
    fn test_solve_node_limit_keeps_incumbent() {
        let mut stopped_with_tour = 0;
        for seed in 0..8 {
            let mut sampler = Sampler::seeded(seed);
            let graph = Graph::new(RandomPoints::new(&mut sampler, 1000.0).take(15));
            let full = graph.solve(&Params::default()).unwrap();
            assert_eq!(full.status, Status::Optimal);
            if full.stats.nodes < 2 {
                continue;
            }

            let params = Params::default().with_node_limit(Some(full.stats.nodes - 1));
            match graph.solve(&params) {
                Ok(limited) => {
                    assert_eq!(limited.status, Status::NodeLimit);
                    assert_eq!(limited.stats.nodes, full.stats.nodes - 1);
                    assert!(is_hamiltonian(&graph, &limited.tour));
                    assert!(limited.tour.cost() >= full.tour.cost());
                    stopped_with_tour += 1;
                }
                Err(Error::NoSolution) => assert_eq!(full.stats.solutions, 1),
                Err(err) => panic!("unexpected error: {}", err),
            }
        }
        assert!(stopped_with_tour > 0);
    }

    #[test]
    fn test_read_samples_in_file_order() {
        let path = std::env::temp_dir().join(format!("tsp-graph-{}.txt", std::process::id()));
        let text: String = (0..10).map(|i| format!("{} 0 0 {}\n", i, i)).collect();
        std::fs::write(&path, text).unwrap();

        let graph = Graph::read(&path, 4, &mut Sampler::seeded(11)).unwrap();
        let too_many = Graph::read(&path, 11, &mut Sampler::seeded(11));
        std::fs::remove_file(&path).unwrap();

        assert_eq!(graph.order(), 4);
        let xs: Vec<f64> = graph.vertices().iter().map(|v| v.point(Space::A).x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        assert!(matches!(
            too_many,
            Err(Error::Sampling {
                requested: 11,
                available: 10
            })
        ));
    }
}
