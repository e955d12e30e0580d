use crate::workflow::runner::Runner;
use infracore::AlarmModule;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub fn epoch_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

/// Drives one array's evaluation on its own period, offset by the
/// configured latency so data has time to arrive. A cycle still running at
/// the next tick is abandoned, not awaited: the schedule stays live and the
/// missed cycle is simply skipped.
pub fn spawn(runner: Runner) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = Duration::from_secs_f64(runner.config().params.duration);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut inflight: Option<JoinHandle<()>> = None;

        loop {
            ticker.tick().await;
            if let Some(handle) = inflight.take() {
                if !handle.is_finished() {
                    log::warn!(
                        "{}: previous cycle overran its slot, abandoning it",
                        runner.alarm().name()
                    );
                    handle.abort();
                }
            }

            let cycle_runner = runner.clone();
            let window_end = epoch_now() - cycle_runner.config().params.latency;
            inflight = Some(tokio::task::spawn_blocking(move || {
                if let Err(err) = cycle_runner.execute(window_end) {
                    log::warn!("cycle failed: {err:#}");
                }
            }));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::plane_wave::{SyntheticConfig, SyntheticProvider};
    use crate::workflow::config::MonitorConfig;
    use infracore::detect::event::{DetectionEvent, Notifier};
    use std::sync::Arc;

    struct SilentNotifier;

    impl Notifier for SilentNotifier {
        fn notify(&self, _: &DetectionEvent) {}
    }

    fn fast_config() -> MonitorConfig {
        serde_yaml::from_str(
            "\
alarm_name: TST Infrasound
array_id: TST
stations:
  - { scnl: TST.BD0.XX.--, lat: 0.0, lon: 0.0 }
  - { scnl: TST.BD1.XX.--, lat: 0.0, lon: 0.0008993 }
  - { scnl: TST.BD2.XX.--, lat: 0.0008993, lon: 0.0 }
volcanoes:
  - { name: Target, lat: 0.05, lon: 0.0, azimuth_tolerance: 10, min_pa: 1.0, vmin: 0.28, vmax: 0.45 }
params:
  duration: 0.2
  latency: 0.0
  taper_val: 0.02
  f1: 1.0
  f2: 8.0
  digouti: 1.0
  min_cc: 0.5
  min_chan: 3
  cc_shift_length: 5
",
        )
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn schedule_keeps_beating() {
        let config = fast_config();
        let provider = Arc::new(SyntheticProvider::new(
            config.build_array().unwrap(),
            SyntheticConfig {
                amplitude_pa: 0.0,
                noise_pa: 0.05,
                ..Default::default()
            },
        ));
        let runner = Runner::from_config(&config, provider, Arc::new(SilentNotifier)).unwrap();

        let mut heartbeat = runner.alarm().heartbeat();
        let schedule = spawn(runner);

        // Two pulses within a handful of periods proves the loop is alive.
        for _ in 0..2 {
            tokio::time::timeout(Duration::from_secs(5), heartbeat.changed())
                .await
                .expect("heartbeat went silent")
                .expect("heartbeat channel closed");
        }
        let pulse = heartbeat.borrow().clone();
        assert_eq!(pulse.array_id, "TST");
        assert!(pulse.completed);
        schedule.abort();
    }
}
