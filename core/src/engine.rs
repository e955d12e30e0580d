use crate::acquisition::provider::WaveformProvider;
use crate::array::{InfrasoundArray, Volcano, VolcanoRegistry};
use crate::detect::event::{DetectionEvent, Notifier};
use crate::detect::matcher::VolcanoMatcher;
use crate::detect::tracker::{DetectionTracker, VolcanoStatus};
use crate::prelude::{AlarmModule, ArrayParams, CycleOutcome, EngineError, EngineResult};
use crate::processing::condition::SignalConditioner;
use crate::processing::correlate::{CorrelationResult, PairwiseCorrelator};
use crate::processing::solve::ArraySolver;
use crate::telemetry::heartbeat::{CyclePulse, HeartbeatMonitor};
use crate::telemetry::log::LogManager;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// One array's complete detection engine: conditioner, correlator, solver,
/// matcher and tracker wired behind the `AlarmModule` seam. Cycles share no
/// state but the tracker, so `evaluate` takes `&self`.
pub struct InfrasoundAlarm {
    name: String,
    params: ArrayParams,
    array: InfrasoundArray,
    registry: VolcanoRegistry,
    conditioner: SignalConditioner,
    correlator: PairwiseCorrelator,
    solver: ArraySolver,
    matcher: VolcanoMatcher,
    tracker: DetectionTracker,
    provider: Arc<dyn WaveformProvider>,
    notifier: Arc<dyn Notifier>,
    heartbeat: HeartbeatMonitor,
    logger: LogManager,
}

impl InfrasoundAlarm {
    pub fn new(
        name: &str,
        params: ArrayParams,
        array: InfrasoundArray,
        volcanoes: Vec<Volcano>,
        provider: Arc<dyn WaveformProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> EngineResult<Self> {
        params.validate()?;
        let registry = VolcanoRegistry::new(volcanoes, array.reference())?;
        let (heartbeat, _rx) = HeartbeatMonitor::new();
        Ok(Self {
            name: name.to_string(),
            conditioner: SignalConditioner::from_params(&params),
            correlator: PairwiseCorrelator::new(params.cc_shift_length, params.min_cc),
            solver: ArraySolver::new(params.min_chan),
            matcher: VolcanoMatcher::new(params.min_chan),
            tracker: DetectionTracker::new(params.duration),
            logger: LogManager::new(name),
            params,
            array,
            registry,
            provider,
            notifier,
            heartbeat,
        })
    }

    pub fn array(&self) -> &InfrasoundArray {
        &self.array
    }

    pub fn registry(&self) -> &VolcanoRegistry {
        &self.registry
    }

    pub fn heartbeat(&self) -> watch::Receiver<CyclePulse> {
        self.heartbeat.subscribe()
    }

    /// Tracked per-volcano alarm states, for status collaborators.
    pub fn tracker_snapshot(&self) -> HashMap<String, VolcanoStatus> {
        self.tracker.snapshot()
    }

    /// Runs one evaluation cycle ending at `window_end` (epoch seconds).
    /// Every failure mode short of a provider outage still completes the
    /// cycle and beats the heartbeat.
    pub fn run_cycle(&self, window_end: f64) -> EngineResult<CycleOutcome> {
        let start = window_end - self.params.duration;
        let window = match self.provider.fetch(&self.array.station_ids(), start, window_end) {
            Ok(window) => window,
            Err(err) => {
                self.logger.alert(&format!("cycle skipped: {err}"));
                self.beat(window_end, 0, false);
                return Err(err.into());
            }
        };

        let mut traces = Vec::new();
        for channel in &window.channels {
            let Some(index) = self.array.index_of(&channel.scnl) else {
                self.logger
                    .verbose(&format!("ignoring unknown channel {}", channel.scnl));
                continue;
            };
            match self.conditioner.condition(index, channel, window.sample_rate) {
                Ok(trace) => traces.push(trace),
                Err(err) => self.logger.record(&format!("dropped channel: {err}")),
            }
        }

        let mut outcome = CycleOutcome {
            stations_used: traces.len(),
            ..Default::default()
        };

        if traces.len() < self.params.min_chan {
            self.logger.record(&format!(
                "{} usable channels of {} required, cycle yields nothing",
                traces.len(),
                self.params.min_chan
            ));
            return self.finish(window_end, outcome);
        }

        let valid: Vec<CorrelationResult> = self
            .correlator
            .correlate_all(&traces)
            .into_iter()
            .filter(|r| r.is_valid(self.params.min_cc))
            .collect();
        outcome.valid_pairs = valid.len();

        let solution = match self
            .solver
            .solve(&self.array, &valid, &traces, window.sample_rate)
        {
            Ok(solution) => solution,
            Err(err @ EngineError::UnderdeterminedGeometry { .. }) => {
                self.logger.record(&format!("no solution: {err}"));
                return self.finish(window_end, outcome);
            }
            Err(err) => return Err(err),
        };
        outcome.solution = Some(solution.clone());

        match self.matcher.best_match(&solution, &self.registry) {
            Ok(target) => {
                if self.tracker.observe(&target.volcano.name, window_end, &solution) {
                    let event = DetectionEvent {
                        volcano: target.volcano.name.clone(),
                        array_id: self.array.id().to_string(),
                        timestamp: window_end,
                        solution: solution.clone(),
                    };
                    self.logger.alert(&format!(
                        "detection: {} at {:.1} deg, {:.2} km/s, {:.2} Pa",
                        event.volcano,
                        solution.back_azimuth,
                        solution.velocity_kms,
                        solution.peak_pressure
                    ));
                    self.notifier.notify(&event);
                    outcome.events.push(event);
                } else {
                    self.logger.record(&format!(
                        "{} re-detected within cooldown, suppressed",
                        target.volcano.name
                    ));
                }
            }
            Err(EngineError::NoMatch) => {
                self.logger
                    .verbose("coherent wavefront matches no registered volcano");
            }
            Err(err) => return Err(err),
        }

        self.finish(window_end, outcome)
    }

    fn finish(&self, window_end: f64, outcome: CycleOutcome) -> EngineResult<CycleOutcome> {
        self.tracker.tick(window_end);
        self.beat(window_end, outcome.stations_used, true);
        Ok(outcome)
    }

    fn beat(&self, timestamp: f64, stations_used: usize, completed: bool) {
        self.heartbeat.beat(CyclePulse {
            array_id: self.array.id().to_string(),
            timestamp,
            stations_used,
            completed,
        });
    }
}

impl AlarmModule for InfrasoundAlarm {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, window_end: f64) -> EngineResult<CycleOutcome> {
        self.run_cycle(window_end)
    }
}
