//! Cumulative game-loop counters.
//!
//! [`GameMetrics`] is updated by every [`Game::update`](crate::Game::update)
//! call and read back with [`Game::metrics`](crate::Game::metrics).

/// Counters accumulated since [`Game::init`](crate::Game::init).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameMetrics {
    /// Simulation ticks executed.
    pub ticks: u64,
    /// Network event frames consumed.
    pub events_processed: u64,
    /// Order lists accepted into the order ring.
    pub order_lists_received: u64,
    /// Order lists consumed by ticks.
    pub order_lists_drained: u64,
    /// Individual orders applied by ticks.
    pub orders_applied: u64,
    /// Render command frames written.
    pub render_commands: u64,
    /// Order lists still queued after the most recent tick.
    pub last_backlog: u64,
    /// Largest backlog in the sample window.
    pub backlog_max: u64,
    /// Mean backlog over the sample window.
    pub backlog_mean: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = GameMetrics::default();
        assert_eq!(m.ticks, 0);
        assert_eq!(m.events_processed, 0);
        assert_eq!(m.order_lists_received, 0);
        assert_eq!(m.order_lists_drained, 0);
        assert_eq!(m.orders_applied, 0);
        assert_eq!(m.render_commands, 0);
        assert_eq!(m.last_backlog, 0);
        assert_eq!(m.backlog_max, 0);
        assert_eq!(m.backlog_mean, 0.0);
    }
}
