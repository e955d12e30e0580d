use crate::workflow::config::MonitorConfig;
use anyhow::Context;
use infracore::acquisition::WaveformProvider;
use infracore::detect::event::Notifier;
use infracore::engine::InfrasoundAlarm;
use infracore::prelude::CycleOutcome;
use infracore::AlarmModule;
use std::sync::Arc;

/// Builds the detection engine from a loaded config and drives individual
/// evaluation cycles.
#[derive(Clone)]
pub struct Runner {
    config: MonitorConfig,
    alarm: Arc<InfrasoundAlarm>,
}

impl Runner {
    pub fn from_config(
        config: &MonitorConfig,
        provider: Arc<dyn WaveformProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> anyhow::Result<Self> {
        let array = config.build_array()?;
        let alarm = InfrasoundAlarm::new(
            &config.alarm_name,
            config.params.clone(),
            array,
            config.volcanoes.clone(),
            provider,
            notifier,
        )
        .with_context(|| format!("building alarm {}", config.alarm_name))?;
        Ok(Self {
            config: config.clone(),
            alarm: Arc::new(alarm),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn alarm(&self) -> &Arc<InfrasoundAlarm> {
        &self.alarm
    }

    pub fn execute(&self, window_end: f64) -> anyhow::Result<CycleOutcome> {
        self.alarm
            .evaluate(window_end)
            .with_context(|| format!("evaluating {}", self.alarm.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::plane_wave::{SyntheticConfig, SyntheticProvider};
    use infracore::detect::event::DetectionEvent;
    use infracore::math::GeoHelper;
    use std::sync::Mutex;

    const AKS_YAML: &str = "\
alarm_name: AKS Infrasound
array_id: AKS
stations:
  - { scnl: AKS.BDF.AV.--, lat: 54.11050, lon: -165.69773 }
  - { scnl: AKS.BDG.AV.--, lat: 54.11028, lon: -165.69618 }
  - { scnl: AKS.BDH.AV.--, lat: 54.11105, lon: -165.69700 }
  - { scnl: AKS.BDI.AV.--, lat: 54.11053, lon: -165.69683 }
volcanoes:
  - name: Akutan
    lat: 54.143600
    lon: -165.977736
    azimuth_tolerance: 10
    min_pa: 1.0
    vmin: 0.28
    vmax: 0.45
    seismic_scnl: [AKSA.BHZ.AV.--, AKRB.BHZ.AV.--]
  - name: Okmok
    lat: 53.428865
    lon: -168.131632
    azimuth_tolerance: 3.5
    min_pa: 0.4
    vmin: 0.28
    vmax: 0.41
    seismic_scnl: [OKNC.BHZ.AV.--]
params:
  duration: 30
  latency: 2
  taper_val: 2
  f1: 1.0
  f2: 8.0
  digouti: 1.0
  min_cc: 0.5
  min_chan: 3
  cc_shift_length: 150
";

    struct CollectingNotifier {
        events: Mutex<Vec<DetectionEvent>>,
    }

    impl Notifier for CollectingNotifier {
        fn notify(&self, event: &DetectionEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event.clone());
            }
        }
    }

    fn aks_config() -> MonitorConfig {
        serde_yaml::from_str(AKS_YAML).unwrap()
    }

    fn akutan_bearing(config: &MonitorConfig) -> f64 {
        let reference = &config.stations[0];
        let akutan = &config.volcanoes[0];
        GeoHelper::bearing_deg(reference.lat, reference.lon, akutan.lat, akutan.lon)
    }

    fn runner_with(
        config: &MonitorConfig,
        synthetic: SyntheticConfig,
    ) -> (Runner, Arc<CollectingNotifier>) {
        let provider = Arc::new(SyntheticProvider::new(
            config.build_array().unwrap(),
            synthetic,
        ));
        let notifier = Arc::new(CollectingNotifier {
            events: Mutex::new(Vec::new()),
        });
        let runner = Runner::from_config(config, provider, notifier.clone()).unwrap();
        (runner, notifier)
    }

    #[test]
    fn akutan_arrival_alarms_exactly_once_across_cycles() {
        let config = aks_config();
        let synthetic = SyntheticConfig {
            azimuth: akutan_bearing(&config),
            velocity_kms: 0.35,
            amplitude_pa: 1.2,
            ..Default::default()
        };
        let (runner, notifier) = runner_with(&config, synthetic);

        let mut emitted = 0;
        for cycle in 0..4 {
            let window_end = 1_700_000_000.0 + cycle as f64 * 10.0;
            let outcome = runner.execute(window_end).unwrap();
            assert_eq!(outcome.stations_used, 4);
            emitted += outcome.events.len();
        }
        assert_eq!(emitted, 1);

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].volcano, "Akutan");
        assert_eq!(events[0].array_id, "AKS");
        assert!(events.iter().all(|e| e.volcano != "Okmok"));
    }

    #[test]
    fn noise_only_window_alarms_nothing() {
        let config = aks_config();
        let synthetic = SyntheticConfig {
            azimuth: akutan_bearing(&config),
            amplitude_pa: 0.0,
            noise_pa: 0.05,
            ..Default::default()
        };
        let (runner, notifier) = runner_with(&config, synthetic);
        let outcome = runner.execute(1_700_000_000.0).unwrap();
        assert!(outcome.solution.is_none());
        assert!(outcome.events.is_empty());
        assert!(notifier.events.lock().unwrap().is_empty());
    }

    #[test]
    fn bad_registry_fails_at_build() {
        let mut config = aks_config();
        config.volcanoes[0].vmin = 0.5;
        config.volcanoes[0].vmax = 0.3;
        let provider = Arc::new(SyntheticProvider::new(
            config.build_array().unwrap(),
            SyntheticConfig::default(),
        ));
        let notifier = Arc::new(CollectingNotifier {
            events: Mutex::new(Vec::new()),
        });
        assert!(Runner::from_config(&config, provider, notifier).is_err());
    }
}
