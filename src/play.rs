use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use distviz::{
    autoplay::spawn_autoplay,
    chart::ChartTheme,
    config::VizConfig,
    controller::ParameterController,
    distribution::Family,
    montage::{run_montage, MontageEvent},
    report::{report_loop, SvgSink},
};
use rand::{rngs::StdRng, SeedableRng};
use tokio::{spawn, time::sleep};
use tracing::{error, info};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Full intro sequence: slides with autoplaying charts.
    Montage,
    /// Autoplay a single chart without slides.
    Autoplay,
}

#[derive(Parser)]
struct Args {
    /// Worker threads to use for tokio runtime.
    #[clap(long, default_value_t = 2)]
    threads: usize,

    #[clap(long, value_enum, default_value_t = Mode::Montage)]
    mode: Mode,

    /// Starting family in autoplay mode.
    #[clap(long, default_value = "normal")]
    family: String,

    /// JSON config file
    #[clap(long)]
    config: Option<PathBuf>,

    /// Output path of the frame log
    #[clap(long, short, default_value = "frames.jsonl")]
    output_path: PathBuf,

    /// Render every frame as SVG into this directory
    #[clap(long)]
    svg_dir: Option<PathBuf>,

    /// `interactive` or `montage`
    #[clap(long)]
    theme: Option<String>,

    /// Seed for reproducible parameter walks
    #[clap(long)]
    seed: Option<u64>,

    /// Press the skip control this many seconds in (montage mode). Ignored
    /// before the control appears.
    #[clap(long)]
    skip_after_secs: Option<u64>,

    /// Upper bound on run time.
    #[clap(long, short, default_value_t = 20)]
    time_in_secs: u64,
}

async fn wait_completed(events: flume::Receiver<MontageEvent>) {
    while let Ok(event) = events.recv_async().await {
        info!(?event, "montage event");
        if let MontageEvent::Completed { .. } = event {
            break;
        }
    }
}

async fn async_main(args: Args) -> distviz::Result<()> {
    let config = VizConfig::load(args.config.as_deref())?;
    let theme = match &args.theme {
        Some(name) => name.parse::<ChartTheme>()?,
        None => ChartTheme::montage(),
    };
    let canvas = match args.mode {
        Mode::Montage => config.montage.canvas,
        Mode::Autoplay => config.canvas,
    };

    let output_file = tokio::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&args.output_path)
        .await?;
    let sink = args.svg_dir.clone().map(|dir| SvgSink {
        dir,
        frame: canvas.frame(),
        theme,
    });

    let (frame_tx, frame_rx) = flume::unbounded();
    let reporter = spawn(report_loop(output_file, frame_rx, sink));
    let limit = sleep(Duration::from_secs(args.time_in_secs));

    match args.mode {
        Mode::Montage => {
            let (event_tx, event_rx) = flume::unbounded();
            let (skip_tx, skip_rx) = flume::unbounded();
            let montage = run_montage(
                config.montage,
                config.autoplay,
                args.seed,
                frame_tx,
                event_tx,
                skip_rx,
            );
            if let Some(secs) = args.skip_after_secs {
                spawn(async move {
                    sleep(Duration::from_secs(secs)).await;
                    info!("Pressing skip");
                    let _ = skip_tx.send_async(()).await;
                });
            }
            tokio::select! {
                _ = limit => info!("Time limit reached"),
                _ = wait_completed(event_rx) => {}
                _ = tokio::signal::ctrl_c() => info!("Interrupted"),
            }
            montage.shutdown().await;
        }
        Mode::Autoplay => {
            let family: Family = args.family.parse()?;
            let rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let autoplay = spawn_autoplay(
                ParameterController::new(family),
                config.autoplay,
                rng,
                frame_tx,
            );
            tokio::select! {
                _ = limit => info!("Time limit reached"),
                _ = tokio::signal::ctrl_c() => info!("Interrupted"),
            }
            autoplay.shutdown().await;
        }
    }

    match reporter.await {
        Ok(Ok(frames)) => info!("Wrote {} frames to {}", frames, args.output_path.display()),
        Ok(Err(e)) => return Err(e),
        Err(e) => error!("report task failed: {}", e),
    }
    Ok(())
}

fn main() -> distviz::Result<()> {
    distviz::init_tracing();
    let args = Args::parse();
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.threads.max(1))
        .enable_all()
        .build()?
        .block_on(async_main(args))
}
