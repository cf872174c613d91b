use std::{io::Write, path::PathBuf};

use clap::Parser;
use distviz::{
    chart::{render, ChartTheme},
    config::VizConfig,
    controller::{Param, ParameterController},
    distribution::{Distribution, DistributionSpec, Family, Normal, Poisson},
    explorer::Explorer,
    report::save_samples_csv,
    surface::SvgSurface,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
pub struct Args {
    /// `normal`, `binomial` or `poisson`
    #[clap(long, short, default_value = "normal")]
    family: String,

    /// Normal mean (μ)
    #[clap(long, allow_hyphen_values = true)]
    mean: Option<f64>,

    /// Normal standard deviation (σ)
    #[clap(long)]
    std_dev: Option<f64>,

    /// Binomial number of trials (n)
    #[clap(long)]
    trials: Option<f64>,

    /// Binomial success probability (p)
    #[clap(long)]
    success_prob: Option<f64>,

    /// Poisson rate (λ)
    #[clap(long)]
    rate: Option<f64>,

    /// Sample count of the normal curve
    #[clap(long)]
    points: Option<usize>,

    /// Largest k of the Poisson bars
    #[clap(long)]
    max_k: Option<u32>,

    /// JSON config file
    #[clap(long)]
    config: Option<PathBuf>,

    #[clap(long)]
    width: Option<f64>,

    #[clap(long)]
    height: Option<f64>,

    #[clap(long)]
    padding: Option<f64>,

    /// `interactive` or `montage`
    #[clap(long)]
    theme: Option<String>,

    /// SVG output path
    #[clap(long)]
    svg: Option<PathBuf>,

    /// CSV output path for the sample points
    #[clap(long)]
    csv: Option<PathBuf>,
}

fn main() -> distviz::Result<()> {
    distviz::init_tracing();
    let args = Args::parse();
    let config = VizConfig::load(args.config.as_deref())?;

    let family: Family = args.family.parse()?;
    let mut canvas = config.canvas;
    canvas.width = args.width.unwrap_or(canvas.width);
    canvas.height = args.height.unwrap_or(canvas.height);
    canvas.padding = args.padding.unwrap_or(canvas.padding);
    let theme = match &args.theme {
        Some(name) => name.parse::<ChartTheme>()?,
        None => config.theme.theme(),
    };

    let surface = SvgSurface::new(canvas.width, canvas.height).with_background(theme.background);
    let mut explorer = Explorer::new(
        ParameterController::new(family),
        surface,
        theme,
        canvas.padding,
    );
    let inputs = [
        (Param::Mean, args.mean),
        (Param::StdDev, args.std_dev),
        (Param::Trials, args.trials),
        (Param::SuccessProb, args.success_prob),
        (Param::Rate, args.rate),
    ];
    for (param, value) in inputs {
        if let Some(value) = value {
            let applied = explorer.set_param(param, value);
            if applied != value {
                warn!("{} adjusted from {} to {}", param.label(), value, applied);
            }
        }
    }

    let spec = explorer.controller().spec();
    let mut surface = explorer.into_surface();
    let dist: Box<dyn Distribution> = match (spec, args.points, args.max_k) {
        (DistributionSpec::Normal { mean, std_dev }, Some(points), _) => {
            Box::new(Normal::new(mean, std_dev).with_points(points))
        }
        (DistributionSpec::Poisson { lambda }, _, Some(max_k)) => {
            Box::new(Poisson::new(lambda).with_max_k(max_k))
        }
        (spec, _, _) => spec.boxed(),
    };
    if args.points.is_some() || args.max_k.is_some() {
        render(&mut surface, &dist, canvas.padding, &theme);
    }
    info!("Rendered {}", dist.info());
    let points = dist.samples();
    let svg = surface.to_svg();

    if let Some(path) = &args.csv {
        save_samples_csv(path, &points)?;
        info!("Wrote {} points to {}", points.len(), path.display());
    }
    match &args.svg {
        Some(path) => {
            std::fs::write(path, svg)?;
            info!("Wrote chart to {}", path.display());
        }
        None if args.csv.is_none() => {
            std::io::stdout().write_all(svg.as_bytes())?;
        }
        None => {}
    }
    Ok(())
}
