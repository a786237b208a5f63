use std::time::Duration;

/// Search parameters of the branch-and-cut driver.
#[derive(Debug, Clone)]
pub struct Params {
    /// Wall-clock limit for [`super::Model::optimize`]; unlimited if `None`.
    pub time_limit: Option<Duration>,
    /// Maximum number of explored nodes; unlimited if `None`.
    pub node_limit: Option<usize>,
    /// Distance from 0 or 1 up to which a binary variable counts as integral.
    pub int_feas_tol: f64,
    /// Tolerance used when comparing bounds and checking constraints.
    pub bound_tol: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            time_limit: None,
            node_limit: None,
            int_feas_tol: 1e-6,
            bound_tol: 1e-6,
        }
    }
}

impl Params {
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn with_node_limit(mut self, limit: Option<usize>) -> Self {
        self.node_limit = limit;
        self
    }

    /// Time limit given in minutes; zero, negative or non-finite values disable it.
    pub fn with_timeout_minutes(self, minutes: f64) -> Self {
        if minutes.is_finite() && minutes > 0.0 {
            self.with_time_limit(Some(Duration::from_secs_f64(minutes * 60.0)))
        } else {
            self.with_time_limit(None)
        }
    }
}
