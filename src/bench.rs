use std::{error::Error, path::PathBuf};

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tsp_cuts::{solver::Params, Graph, Sampler, Vertex};

use crate::results::{export, SolveRow};

pub struct BenchConfig {
    pub instance: String,
    pub seeds: Vec<u64>,
    pub sizes: Vec<usize>,
    pub params: Params,
}

/// Samples the instances of every seed from `population`, one sampler per seed drawing the
/// sizes in order.
fn instances(
    population: &[Vertex],
    config: &BenchConfig,
) -> Result<Vec<(u64, Graph)>, Box<dyn Error>> {
    let mut instances = vec![];
    for &seed in &config.seeds {
        let mut sampler = Sampler::seeded(seed);
        for &size in &config.sizes {
            instances.push((seed, Graph::new(sampler.sample(population, size)?)));
        }
    }
    Ok(instances)
}

/// Samples every (seed, size) instance from `population` up front, solves them in parallel
/// and exports one row per solved instance.
pub fn execute_bench(
    population: &[Vertex],
    config: &BenchConfig,
    output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let graphs = instances(population, config)?;

    let total = graphs.len() as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(ProgressStyle::default_bar().template(
        "{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] ({pos}/{len})",
    ));
    pb.enable_steady_tick(20);
    pb.set_message(&format!("Bench {}", config.instance));

    let mut rows: Vec<SolveRow> = graphs
        .into_par_iter()
        .progress_with(pb)
        .filter_map(|(seed, graph)| match graph.solve(&config.params) {
            Ok(solved) => Some(SolveRow::new(config.instance.clone(), seed, &solved)),
            Err(err) => {
                log::warn!(
                    "Instance with {} vertices and seed {:#x} failed: {}",
                    graph.order(),
                    seed,
                    err
                );
                None
            }
        })
        .collect();
    rows.sort_by_key(|row| (row.seed(), row.nodes()));

    export(&rows, &output)?;
    println!("✔️ Solved {}/{} instances.", rows.len(), total);
    Ok(())
}

#[cfg(test)]
mod test_bench {
    use tsp_cuts::{vertex::RandomPoints, VertexId};

    use super::*;

    fn ids(graph: &Graph) -> Vec<VertexId> {
        graph.vertices().iter().map(|v| v.id()).collect()
    }

    #[test]
    fn test_one_sampler_per_seed() {
        let population: Vec<Vertex> = RandomPoints::new(&mut Sampler::seeded(1), 100.0)
            .take(30)
            .collect();
        let config = BenchConfig {
            instance: "random".into(),
            seeds: vec![3, 4],
            sizes: vec![5, 10],
            params: Params::default(),
        };

        let graphs = instances(&population, &config).unwrap();
        assert_eq!(graphs.len(), 4);
        assert_eq!(
            graphs.iter().map(|(seed, g)| (*seed, g.order())).collect::<Vec<_>>(),
            vec![(3, 5), (3, 10), (4, 5), (4, 10)]
        );

        let mut sampler = Sampler::seeded(3);
        let first = sampler.sample(&population, 5).unwrap();
        let second = sampler.sample(&population, 10).unwrap();
        assert_eq!(ids(&graphs[0].1), ids(&Graph::new(first)));
        assert_eq!(ids(&graphs[1].1), ids(&Graph::new(second)));

        let again = instances(&population, &config).unwrap();
        for ((_, l), (_, r)) in graphs.iter().zip(&again) {
            assert_eq!(ids(l), ids(r));
        }
    }
}
