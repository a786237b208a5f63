use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

use super::Vertex;
use crate::error::{Error, Result};

/// Seeded source of randomness for drawing instances.
///
/// A program is expected to create one sampler up front and keep using it, so
/// that the same seed and input always select the same vertices.
#[derive(Debug, Clone)]
pub struct Sampler {
    seed: u64,
    rng: StdRng,
}

impl Sampler {
    pub fn seeded(seed: u64) -> Self {
        Sampler {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws `count` distinct items. The selected items keep their relative
    /// order from `items`.
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Result<Vec<T>> {
        if count > items.len() {
            return Err(Error::Sampling {
                requested: count,
                available: items.len(),
            });
        }

        let mut picked = index::sample(&mut self.rng, items.len(), count).into_vec();
        picked.sort_unstable();
        Ok(picked.into_iter().map(|i| items[i].clone()).collect())
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Endless source of vertices placed uniformly at random in `[0, extent)` in
/// both coordinate spaces.
pub struct RandomPoints<'a> {
    sampler: &'a mut Sampler,
    extent: f64,
}

impl<'a> RandomPoints<'a> {
    pub fn new(sampler: &'a mut Sampler, extent: f64) -> Self {
        RandomPoints { sampler, extent }
    }

    fn coordinate(&mut self) -> f64 {
        let extent = self.extent;
        let value: f64 = self.sampler.rng().gen_range(0.0..extent);
        value.floor()
    }
}

impl Iterator for RandomPoints<'_> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let x1 = self.coordinate();
        let y1 = self.coordinate();
        let x2 = self.coordinate();
        let y2 = self.coordinate();
        Some(Vertex::new(x1, y1, x2, y2))
    }
}
