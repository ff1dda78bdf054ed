use std::collections::VecDeque;

/// Distance from the robot to its final goal over time.
///
/// Summary statistics cover every sample recorded. Individual samples are
/// only kept for the most recent `history` seconds.
#[derive(Debug, Clone)]
pub struct TrackingTrace {
    history: f64,
    recent: VecDeque<(f64, f64)>,
    count: usize,
    sum: f64,
    max: Option<f64>,
}

impl TrackingTrace {
    pub fn new(history: f64) -> Self {
        TrackingTrace {
            history,
            recent: VecDeque::new(),
            count: 0,
            sum: 0.0,
            max: None,
        }
    }

    pub fn record(&mut self, time: f64, error: f64) {
        self.recent.push_back((time, error));
        while self.recent.front().is_some_and(|&(t, _)| t < time - self.history) {
            self.recent.pop_front();
        }

        self.count += 1;
        self.sum += error;
        self.max = Some(self.max.map_or(error, |m| m.max(error)));
    }

    /// Retained samples from the last `window` seconds before the newest one,
    /// oldest first.
    pub fn window(&self, window: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        let cutoff = self.recent.back().map_or(f64::INFINITY, |&(t, _)| t - window);
        self.recent.iter().copied().skip_while(move |&(t, _)| t < cutoff)
    }

    pub fn last(&self) -> Option<f64> {
        self.recent.back().map(|&(_, e)| e)
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Number of samples recorded, including those no longer retained.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
