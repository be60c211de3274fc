//! The idle/pause rhythm of one farming round
//!
//! Starting and stopping a game's idler in a short burst nudges Steam into
//! granting drops faster than a single long session.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Start,
    Stop,
}

/// Perform `action`, then hold for `hold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStep {
    pub action: StepAction,
    pub hold: Duration,
}

impl CycleStep {
    pub const fn start(hold: Duration) -> Self {
        Self { action: StepAction::Start, hold }
    }

    pub const fn stop(hold: Duration) -> Self {
        Self { action: StepAction::Stop, hold }
    }
}

const SHORT: Duration = Duration::from_secs(15);
const PAUSE: Duration = Duration::from_secs(60);
const LONG: Duration = Duration::from_secs(5 * 60);
const FARMING: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmingCycle {
    steps: Vec<CycleStep>,
}

impl FarmingCycle {
    pub fn new(steps: Vec<CycleStep>) -> Self {
        Self { steps }
    }

    /// 5 min idle, then alternating pauses with 15 s, 30 min and 15 s idles.
    pub fn standard() -> Self {
        Self::new(vec![
            CycleStep::start(LONG),
            CycleStep::stop(PAUSE),
            CycleStep::start(SHORT),
            CycleStep::stop(PAUSE),
            CycleStep::start(FARMING),
            CycleStep::stop(PAUSE),
            CycleStep::start(SHORT),
            CycleStep::stop(PAUSE),
        ])
    }

    pub fn steps(&self) -> &[CycleStep] {
        &self.steps
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.hold).sum()
    }
}

impl Default for FarmingCycle {
    fn default() -> Self {
        Self::standard()
    }
}
