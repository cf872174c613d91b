use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::AutoplayConfig,
    controller::ParameterController,
    distribution::{Distribution, DistributionSpec, SamplePoint},
    scheduler::{every, TaskHandle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameCause {
    Start,
    Nudge,
    Cycle,
}

/// Everything needed to draw one autoplay step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub cause: FrameCause,
    pub spec: DistributionSpec,
    pub points: Vec<SamplePoint>,
}

impl Frame {
    pub fn capture(seq: u64, cause: FrameCause, controller: &ParameterController) -> Self {
        let spec = controller.spec();
        Self {
            seq,
            at: Utc::now(),
            cause,
            spec,
            points: spec.samples(),
        }
    }
}

fn period(millis: u64) -> Duration {
    // tokio intervals reject a zero period
    Duration::from_millis(millis.max(1))
}

/// Run the intro animation: nudge the active family on the short timer,
/// rotate families on the long one, and publish a [`Frame`] after every
/// change. The nudge timer restarts after each rotation.
///
/// The task owns `controller`, so all mutation happens in one place. It ends
/// when the handle is cancelled or dropped, or when `frames` has no receiver.
pub fn spawn_autoplay<R>(
    mut controller: ParameterController,
    config: AutoplayConfig,
    mut rng: R,
    frames: flume::Sender<Frame>,
) -> TaskHandle
where
    R: Rng + Send + 'static,
{
    TaskHandle::spawn(move |mut stop| async move {
        info!(family = %controller.active(), "autoplay started");
        let mut seq = 0;
        if frames
            .send_async(Frame::capture(seq, FrameCause::Start, &controller))
            .await
            .is_err()
        {
            debug!("frame receiver closed before autoplay started");
            return;
        }

        let mut nudge = every(period(config.nudge_interval_ms));
        let mut cycle = every(period(config.cycle_interval_ms));
        loop {
            let cause = tokio::select! {
                biased;
                _ = &mut stop => break,
                // a nudge due with the rotation lands on the outgoing family
                _ = nudge.tick() => {
                    controller.nudge(&mut rng, &config.bounds);
                    FrameCause::Nudge
                }
                _ = cycle.tick() => {
                    let family = controller.advance_family();
                    info!(family = %family, "autoplay switched family");
                    nudge = every(period(config.nudge_interval_ms));
                    FrameCause::Cycle
                }
            };
            seq += 1;
            let frame = Frame::capture(seq, cause, &controller);
            debug!(seq, spec = ?frame.spec, "autoplay frame");
            if frames.send_async(frame).await.is_err() {
                debug!("frame receiver closed");
                break;
            }
        }
        info!(frames = seq + 1, "autoplay stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Family;
    use rand::{rngs::StdRng, SeedableRng};
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_nudge_then_cycle() {
        let (tx, rx) = flume::unbounded();
        let handle = spawn_autoplay(
            ParameterController::default(),
            AutoplayConfig::default(),
            StdRng::seed_from_u64(1),
            tx,
        );

        sleep(Duration::from_millis(3100)).await;
        handle.shutdown().await;

        let frames: Vec<Frame> = rx.drain().collect();
        assert!(rx.is_disconnected());
        // start, ten nudges, then the rotation due with the tenth
        assert_eq!(frames.len(), 12);
        assert_eq!(frames[0].cause, FrameCause::Start);
        assert_eq!(frames[0].spec, DistributionSpec::Normal { mean: 0.0, std_dev: 1.0 });
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.seq, i as u64);
        }
        for frame in &frames[1..11] {
            assert_eq!(frame.cause, FrameCause::Nudge);
            assert_eq!(frame.spec.family(), Family::Normal);
            assert_eq!(frame.points.len(), 100);
        }
        assert_eq!(frames[11].cause, FrameCause::Cycle);
        assert_eq!(frames[11].spec, DistributionSpec::Binomial { n: 20, p: 0.5 });
        assert_eq!(frames[11].points.len(), 21);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nudge_restarts_after_cycle() {
        let (tx, rx) = flume::unbounded();
        let config = AutoplayConfig {
            nudge_interval_ms: 400,
            cycle_interval_ms: 1000,
            ..AutoplayConfig::default()
        };
        let handle = spawn_autoplay(
            ParameterController::default(),
            config,
            StdRng::seed_from_u64(2),
            tx,
        );

        // nudges at 400, 800; cycle at 1000; nudges at 1400, 1800; cycle at 2000
        sleep(Duration::from_millis(2100)).await;
        handle.shutdown().await;

        let causes: Vec<FrameCause> = rx.drain().map(|f| f.cause).collect();
        use FrameCause::*;
        assert_eq!(causes, vec![Start, Nudge, Nudge, Cycle, Nudge, Nudge, Cycle]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_without_receiver() {
        let (tx, rx) = flume::unbounded();
        drop(rx);
        let handle = spawn_autoplay(
            ParameterController::new(Family::Poisson),
            AutoplayConfig::default(),
            StdRng::seed_from_u64(3),
            tx,
        );
        handle.join().await;
    }
}
