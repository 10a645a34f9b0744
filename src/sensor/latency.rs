use std::collections::VecDeque;

/// Holds back sensor outputs until their delivery time.
#[derive(Clone, Debug)]
pub(crate) struct LatencyBuffer<T> {
    /// The pending outputs and their delivery times in ms, in delivery order.
    pending: VecDeque<(i64, T)>,
}

impl<T> Default for LatencyBuffer<T> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<T: Default> LatencyBuffer<T> {
    /// Queues the output computed at `now` and returns the output due at `now`.
    ///
    /// If several outputs are due, only the most recent is returned and the rest
    /// are dropped. If none is due, the default output is returned.
    pub fn apply(&mut self, now: i64, latency_ms: i64, output: T) -> T {
        self.pending.push_back((now + latency_ms, output));

        let mut due = None;
        while let Some((time, _)) = self.pending.front() {
            if *time > now {
                break;
            }
            due = self.pending.pop_front().map(|(_, output)| output);
        }
        due.unwrap_or_default()
    }

    /// The number of outputs not yet delivered.
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
