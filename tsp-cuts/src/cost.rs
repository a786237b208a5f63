use std::{
    fmt,
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::Serialize;

/// The cost of an edge, or of a set of edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cost(usize);

impl Cost {
    pub fn new(cost: usize) -> Self {
        Cost(cost)
    }

    /// Rounds a non-negative distance up to the next integer.
    pub fn ceil(distance: f64) -> Self {
        Cost(distance.ceil() as usize)
    }

    pub fn get(&self) -> usize {
        self.0
    }

    pub fn as_float(&self) -> f64 {
        self.0 as f64
    }
}

/// Saturates at `usize::MAX`.
impl Add for Cost {
    type Output = Self;
    fn add(self, rhs: Cost) -> Self::Output {
        Cost(self.0.saturating_add(rhs.0))
    }
}

impl Sum<Cost> for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::new(0), |a, b| a + b)
    }
}

impl<'a> Sum<&'a Cost> for Cost {
    fn sum<I: Iterator<Item = &'a Cost>>(iter: I) -> Self {
        iter.fold(Cost::new(0), |a, b| a + *b)
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        *self = *self + rhs
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Cost {
    fn from(cost: usize) -> Self {
        Cost::new(cost)
    }
}

#[cfg(test)]
mod test_cost {
    use super::*;

    #[test]
    fn test_cost_ceil() {
        assert_eq!(Cost::ceil(0.0), 0.into());
        assert_eq!(Cost::ceil(1.0), 1.into());
        assert_eq!(Cost::ceil(1.01), 2.into());
        assert_eq!(Cost::ceil(4.999), 5.into());
    }

    #[test]
    fn test_cost_sum() {
        let costs: Vec<Cost> = vec![3.into(), 4.into(), 3.into(), 4.into()];
        assert_eq!(costs.iter().sum::<Cost>(), 14.into());
        assert_eq!(costs.into_iter().sum::<Cost>(), 14.into());
    }

    #[test]
    fn test_cost_saturates() {
        let huge = Cost::ceil(f64::MAX);
        assert_eq!(huge, Cost::new(usize::MAX));
        assert_eq!(vec![huge, huge, 1.into()].into_iter().sum::<Cost>(), huge);

        let mut cost = Cost::new(usize::MAX - 1);
        cost += 5.into();
        assert_eq!(cost, huge);
    }
}
