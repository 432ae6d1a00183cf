use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

use crate::ipc::{encode_event, ReadingSink, StopSignal};
use crate::metrics::StreamMetrics;
use crate::sensor::{NoiseSource, TelemetryGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpConfig {
    /// Pause between emissions.
    pub interval: Duration,
    /// Readings emitted before the stream closes on its own.
    pub max_ticks: u64,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_ticks: 60,
        }
    }
}

/// How a stream ended. The sink is released on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed { emitted: u64 },
    Cancelled { emitted: u64 },
    ConsumerError { emitted: u64 },
}

impl StreamOutcome {
    pub fn emitted(&self) -> u64 {
        match *self {
            StreamOutcome::Completed { emitted }
            | StreamOutcome::Cancelled { emitted }
            | StreamOutcome::ConsumerError { emitted } => emitted,
        }
    }
}

// ============================================================================
// STREAM PUMP - Drives one generator into one sink on a fixed cadence
// ============================================================================

#[derive(Clone)]
pub struct StreamPump {
    config: PumpConfig,
    metrics: StreamMetrics,
}

impl StreamPump {
    pub fn new(config: PumpConfig, metrics: StreamMetrics) -> Self {
        Self { config, metrics }
    }

    pub fn config(&self) -> PumpConfig {
        self.config
    }

    /// Runs the stream to completion and closes `sink` exactly once.
    ///
    /// The generator and sink are moved in; nothing else observes the tick
    /// sequence of this stream.
    pub async fn run<N, S>(
        &self,
        mut generator: TelemetryGenerator<N>,
        mut sink: S,
        stop: StopSignal,
    ) -> StreamOutcome
    where
        N: NoiseSource + Send,
        S: ReadingSink,
    {
        let stream_id = self.metrics.record_opened();
        info!(
            stream_id,
            noise_std_dev = generator.noise_std_dev(),
            max_ticks = self.config.max_ticks,
            interval_ms = self.config.interval.as_millis() as u64,
            "telemetry stream opened"
        );

        let outcome = self.pump(&mut generator, &mut sink, &stop).await;
        sink.close().await;

        self.metrics.record_outcome(&outcome);
        info!(stream_id, ?outcome, "telemetry stream closed");
        outcome
    }

    async fn pump<N, S>(
        &self,
        generator: &mut TelemetryGenerator<N>,
        sink: &mut S,
        stop: &StopSignal,
    ) -> StreamOutcome
    where
        N: NoiseSource + Send,
        S: ReadingSink,
    {
        let mut emitted = 0u64;

        while emitted < self.config.max_ticks {
            if stop.is_triggered() {
                return StreamOutcome::Cancelled { emitted };
            }

            let gen_start = Instant::now();
            let reading = generator.next_reading();
            self.metrics.record_generation(gen_start.elapsed());

            let frame = match encode_event(&reading) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, tick = reading.tick, "failed to encode reading");
                    return StreamOutcome::ConsumerError { emitted };
                }
            };

            let send_start = Instant::now();
            if let Err(e) = sink.send(frame).await {
                debug!(reason = %e, tick = reading.tick, "consumer gone, ending stream");
                return StreamOutcome::ConsumerError { emitted };
            }
            self.metrics.record_send(send_start.elapsed());
            emitted += 1;
            debug!(tick = reading.tick, "reading emitted");

            if emitted == self.config.max_ticks {
                break;
            }

            tokio::select! {
                biased;
                _ = stop.triggered() => return StreamOutcome::Cancelled { emitted },
                _ = sink.disconnected() => {
                    debug!(tick = reading.tick, "consumer disconnected during wait");
                    return StreamOutcome::ConsumerError { emitted };
                }
                _ = sleep(self.config.interval) => {}
            }
        }

        StreamOutcome::Completed { emitted }
    }
}
