use std::{error::Error, fs::OpenOptions, path::Path};

use csv::WriterBuilder;
use serde::Serialize;
use tsp_cuts::{Cost, Solved};

/// One solved instance, as written to the result CSV.
#[derive(Debug, Clone, Serialize)]
pub struct SolveRow {
    instance: String,
    seed: u64,
    nodes: usize,
    status: String,
    cost: Cost,
    cost_b: Cost,
    elapsed: f64,
    bb_nodes: usize,
    lp_solves: usize,
    lazy_constraints: usize,
    solutions: usize,
}

impl SolveRow {
    pub fn new(instance: String, seed: u64, solved: &Solved) -> Self {
        Self {
            instance,
            seed,
            nodes: solved.tour.len(),
            status: format!("{:?}", solved.status),
            cost: solved.tour.cost(),
            cost_b: solved.tour.cost_b(),
            elapsed: solved.elapsed.as_secs_f64(),
            bb_nodes: solved.stats.nodes,
            lp_solves: solved.stats.lp_solves,
            lazy_constraints: solved.stats.lazy_constraints,
            solutions: solved.stats.solutions,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }
}

pub fn export<P: AsRef<Path>>(rows: &[SolveRow], path: P) -> Result<(), Box<dyn Error>> {
    log::info!("Exporting {} results to {:?}.", rows.len(), path.as_ref());
    let mut wtr = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Like [`export`], but keeps existing rows and only writes headers to a new file.
pub fn append<P: AsRef<Path>>(rows: &[SolveRow], path: P) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    log::info!("Appending {} results to {:?}.", rows.len(), path);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = WriterBuilder::new().has_headers(is_new).from_writer(file);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod test_results {
    use std::time::Duration;

    use tsp_cuts::{
        graph::Tour,
        solver::{SolveStats, Status},
        Vertex,
    };

    use super::*;

    fn solved() -> Solved {
        Solved {
            tour: Tour::new(vec![
                Vertex::new(0.0, 0.0, 0.0, 0.0),
                Vertex::new(0.0, 3.0, 0.0, 1.0),
                Vertex::new(4.0, 3.0, 1.0, 1.0),
                Vertex::new(4.0, 0.0, 1.0, 0.0),
            ]),
            elapsed: Duration::from_millis(1500),
            status: Status::Optimal,
            stats: SolveStats {
                nodes: 1,
                lp_solves: 2,
                lazy_constraints: 0,
                solutions: 1,
            },
        }
    }

    #[test]
    fn test_row() {
        let row = SolveRow::new("rect".into(), 7, &solved());
        assert_eq!(row.cost, Cost::new(14));
        assert_eq!(row.cost_b, Cost::new(4));
        assert_eq!(row.status, "Optimal");
        assert_eq!(row.nodes, 4);
    }

    #[test]
    fn test_append_writes_headers_once() {
        let path = std::env::temp_dir().join(format!("ktsp-results-{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let row = SolveRow::new("rect".into(), 7, &solved());

        append(&[row.clone()], &path).unwrap();
        append(&[row], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("instance,seed,nodes,status,cost"));
        assert!(lines[1].starts_with("rect,7,4,Optimal,14,4,1.5,"));
    }
}
