//! Timed intro sequence shown before the main page.

use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::info;

use crate::{
    autoplay::{spawn_autoplay, Frame},
    config::{AutoplayConfig, MontageConfig},
    controller::ParameterController,
    scheduler::TaskHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideVisual {
    /// Autoplaying distribution chart.
    Distribution,
    /// Decorative cube animation, not rendered here.
    Combinatorial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub title: &'static str,
    pub description: &'static str,
    pub visual: SlideVisual,
}

pub const SLIDES: [Slide; 3] = [
    Slide {
        title: "Probability Distributions",
        description: "Visualizing mathematical models that describe the probability of different outcomes",
        visual: SlideVisual::Distribution,
    },
    Slide {
        title: "Combinatorial Optimization",
        description: "Exploring complex problem-solving through mathematical modeling",
        visual: SlideVisual::Combinatorial,
    },
    Slide {
        title: "Data Science & Research",
        description: "Leveraging mathematics to extract insights from complex datasets",
        visual: SlideVisual::Distribution,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MontageEvent {
    SlideShown { index: usize },
    SkipAvailable { index: usize },
    Completed { skipped: bool },
}

/// Slide position and skip state. Transitions are driven by the caller's
/// timers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Montage {
    current: usize,
    skip_visible: bool,
    done: bool,
}

impl Montage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slide(&self) -> &'static Slide {
        &SLIDES[self.current]
    }

    pub fn skip_visible(&self) -> bool {
        self.skip_visible
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The skip control appears once and then stays.
    pub fn on_skip_delay_elapsed(&mut self) -> Option<MontageEvent> {
        if self.done || self.skip_visible {
            return None;
        }
        self.skip_visible = true;
        Some(MontageEvent::SkipAvailable {
            index: self.current,
        })
    }

    pub fn on_slide_elapsed(&mut self) -> Option<MontageEvent> {
        if self.done {
            return None;
        }
        if self.current + 1 < SLIDES.len() {
            self.current += 1;
            Some(MontageEvent::SlideShown {
                index: self.current,
            })
        } else {
            self.done = true;
            Some(MontageEvent::Completed { skipped: false })
        }
    }

    /// Ignored until the skip control is visible.
    pub fn skip(&mut self) -> Option<MontageEvent> {
        if self.done || !self.skip_visible {
            return None;
        }
        self.done = true;
        Some(MontageEvent::Completed { skipped: true })
    }
}

fn slide_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Play the montage on tokio timers.
///
/// Each distribution slide runs a fresh autoplay that feeds `frames` and is
/// cancelled when the slide ends. Transitions go to `events`; a message on
/// `skip` ends the montage once skipping is allowed. The task finishes after
/// [`MontageEvent::Completed`] is sent.
pub fn run_montage(
    config: MontageConfig,
    autoplay: AutoplayConfig,
    seed: Option<u64>,
    frames: flume::Sender<Frame>,
    events: flume::Sender<MontageEvent>,
    skip: flume::Receiver<()>,
) -> TaskHandle {
    TaskHandle::spawn(move |mut stop| async move {
        let mut montage = Montage::new();
        info!(slide = montage.slide().title, "montage started");
        let _ = events.send_async(MontageEvent::SlideShown { index: 0 }).await;

        while !montage.is_done() {
            let index = montage.current();
            let _animation = match montage.slide().visual {
                SlideVisual::Distribution => Some(spawn_autoplay(
                    ParameterController::default(),
                    autoplay,
                    slide_rng(seed, index),
                    frames.clone(),
                )),
                SlideVisual::Combinatorial => None,
            };

            let slide_timer = sleep(Duration::from_millis(config.slide_ms));
            let skip_timer = sleep(Duration::from_millis(config.skip_delay_ms));
            tokio::pin!(slide_timer, skip_timer);
            let mut skip_armed = !montage.skip_visible();

            let event = loop {
                tokio::select! {
                    biased;
                    _ = &mut stop => {
                        info!(slide = index, "montage cancelled");
                        return;
                    }
                    _ = &mut slide_timer => {
                        if let Some(event) = montage.on_slide_elapsed() {
                            break event;
                        }
                    }
                    _ = &mut skip_timer, if skip_armed => {
                        skip_armed = false;
                        if let Some(event) = montage.on_skip_delay_elapsed() {
                            let _ = events.send_async(event).await;
                        }
                    }
                    Ok(()) = skip.recv_async() => {
                        if let Some(event) = montage.skip() {
                            break event;
                        }
                    }
                }
            };

            match event {
                MontageEvent::SlideShown { index } => {
                    info!(slide = SLIDES[index].title, "montage advanced");
                }
                MontageEvent::Completed { skipped } => info!(skipped, "montage completed"),
                MontageEvent::SkipAvailable { .. } => {}
            }
            let _ = events.send_async(event).await;
        }
    })
}
