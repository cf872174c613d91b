//! Axis-labeled distribution chart: bars for discrete families, a filled
//! curve for continuous ones.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    distribution::{max_y, Distribution, Family, SamplePoint},
    error::VizError,
    surface::{Color, DrawSurface, Path, Point, Rect, StrokeStyle, TextAlign, TextStyle},
};

pub const DEFAULT_PADDING: f64 = 40.0;

const Y_DIVISIONS: usize = 5;
const X_DIVISIONS: usize = 8;
const X_LABEL_OFFSET: f64 = 15.0;
const Y_LABEL_GAP: f64 = 5.0;
const Y_LABEL_BASELINE: f64 = 3.0;
const TITLE_OFFSET: f64 = 15.0;

/// Surface dimensions plus the padding around the graph area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl ChartFrame {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    /// Frame covering the whole surface.
    pub fn of<S: DrawSurface + ?Sized>(surface: &S, padding: f64) -> Self {
        let (width, height) = surface.size();
        Self::new(width, height, padding)
    }

    pub fn graph_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    pub fn graph_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }

    /// Pixel row of the x-axis.
    pub fn baseline(&self) -> f64 {
        self.height - self.padding
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    pub background: Color,
    pub axis: StrokeStyle,
    pub curve: StrokeStyle,
    pub curve_fill: Color,
    pub bar_fill: Color,
    pub grid: StrokeStyle,
    pub label: Color,
    pub label_size: f64,
    pub title: Color,
    pub title_size: f64,
    /// Draw gridlines and numeric axis labels.
    pub annotate: bool,
}

impl ChartTheme {
    /// Palette of the interactive explorer.
    pub fn interactive() -> Self {
        Self {
            background: Color::rgb(0, 0, 0),
            axis: StrokeStyle {
                color: Color::WHITE.with_a(0.5),
                width: 1.0,
            },
            curve: StrokeStyle {
                color: Color::rgba(220, 38, 38, 0.8),
                width: 2.0,
            },
            curve_fill: Color::rgba(220, 38, 38, 0.2),
            bar_fill: Color::rgba(220, 38, 38, 0.6),
            grid: StrokeStyle {
                color: Color::WHITE.with_a(0.1),
                width: 0.5,
            },
            label: Color::WHITE.with_a(0.7),
            label_size: 10.0,
            title: Color::WHITE.with_a(0.9),
            title_size: 14.0,
            annotate: true,
        }
    }

    /// Palette of the intro montage, shape and title only.
    pub fn montage() -> Self {
        let light = Color::rgb(238, 238, 238);
        Self {
            background: Color::rgb(29, 22, 22),
            axis: StrokeStyle {
                color: light.with_a(0.5),
                width: 1.0,
            },
            curve: StrokeStyle {
                color: Color::rgb(216, 64, 64),
                width: 2.0,
            },
            curve_fill: Color::rgba(216, 64, 64, 0.3),
            bar_fill: Color::rgb(142, 22, 22),
            grid: StrokeStyle {
                color: light.with_a(0.1),
                width: 0.5,
            },
            label: light.with_a(0.7),
            label_size: 10.0,
            title: light,
            title_size: 16.0,
            annotate: false,
        }
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::interactive()
    }
}

impl FromStr for ChartTheme {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interactive" => Ok(Self::interactive()),
            "montage" => Ok(Self::montage()),
            _ => Err(VizError::UnknownTheme(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOutcome {
    Drawn { max_y: f64 },
    /// Nothing to scale against; only axes and title were drawn.
    Degenerate,
}

/// Data-to-pixel scale for one draw.
struct Scale {
    max_y: f64,
    x0: f64,
    x_span: f64,
}

impl Scale {
    fn fit(family: Family, points: &[SamplePoint]) -> Option<Self> {
        let max_y = max_y(points).filter(|m| m.is_finite() && *m > 0.0)?;
        let (first, last) = (points.first()?, points.last()?);
        let x_span = last.x - first.x;
        if !family.is_discrete() && !(x_span.is_finite() && x_span > 0.0) {
            return None;
        }
        Some(Self {
            max_y,
            x0: first.x,
            x_span,
        })
    }

    fn height(&self, frame: &ChartFrame, y: f64) -> f64 {
        (y / self.max_y) * frame.graph_height()
    }

    fn px(&self, frame: &ChartFrame, x: f64) -> f64 {
        frame.padding + ((x - self.x0) / self.x_span) * frame.graph_width()
    }

    fn py(&self, frame: &ChartFrame, y: f64) -> f64 {
        frame.baseline() - self.height(frame, y)
    }
}

/// Draw `points` as a full chart onto `surface`, replacing whatever was there.
///
/// The same frame, points and theme always produce the same operations.
pub fn draw_chart<S: DrawSurface + ?Sized>(
    surface: &mut S,
    frame: &ChartFrame,
    family: Family,
    points: &[SamplePoint],
    theme: &ChartTheme,
) -> DrawOutcome {
    surface.clear();
    draw_axes(surface, frame, theme);

    let outcome = match Scale::fit(family, points) {
        Some(scale) => {
            if family.is_discrete() {
                draw_bars(surface, frame, points, &scale, theme);
            } else {
                draw_curve(surface, frame, points, &scale, theme);
            }
            if theme.annotate {
                draw_y_labels(surface, frame, &scale, theme);
                draw_grid(surface, frame, family, points.len(), theme);
            }
            DrawOutcome::Drawn { max_y: scale.max_y }
        }
        None => {
            debug!(
                family = %family,
                points = points.len(),
                "degenerate sample, drawing axes only"
            );
            DrawOutcome::Degenerate
        }
    };

    surface.fill_text(
        family.title(),
        Point::new(frame.width / 2.0, frame.padding - TITLE_OFFSET),
        TextStyle {
            color: theme.title,
            size: theme.title_size,
            align: TextAlign::Center,
        },
    );
    outcome
}

/// Sample `dist` and draw it over the whole surface.
pub fn render<S, D>(surface: &mut S, dist: &D, padding: f64, theme: &ChartTheme) -> DrawOutcome
where
    S: DrawSurface + ?Sized,
    D: Distribution + ?Sized,
{
    let frame = ChartFrame::of(&*surface, padding);
    let points = dist.samples();
    draw_chart(surface, &frame, dist.family(), &points, theme)
}

fn label_style(theme: &ChartTheme, align: TextAlign) -> TextStyle {
    TextStyle {
        color: theme.label,
        size: theme.label_size,
        align,
    }
}

fn draw_axes<S: DrawSurface + ?Sized>(surface: &mut S, frame: &ChartFrame, theme: &ChartTheme) {
    let mut axes = Path::new();
    axes.move_to(frame.padding, frame.padding)
        .line_to(frame.padding, frame.baseline())
        .line_to(frame.width - frame.padding, frame.baseline());
    surface.stroke_path(&axes, theme.axis);
}

fn draw_bars<S: DrawSurface + ?Sized>(
    surface: &mut S,
    frame: &ChartFrame,
    points: &[SamplePoint],
    scale: &Scale,
    theme: &ChartTheme,
) {
    let bar_width = frame.graph_width() / (points.len() + 1) as f64;
    for (i, point) in points.iter().enumerate() {
        let x = frame.padding + (i as f64 + 0.5) * bar_width;
        surface.fill_rect(
            Rect::new(
                x - bar_width / 3.0,
                frame.baseline(),
                bar_width / 1.5,
                -scale.height(frame, point.y),
            ),
            theme.bar_fill,
        );
        if theme.annotate {
            surface.fill_text(
                &format!("{}", point.x),
                Point::new(x, frame.baseline() + X_LABEL_OFFSET),
                label_style(theme, TextAlign::Center),
            );
        }
    }
}

fn draw_curve<S: DrawSurface + ?Sized>(
    surface: &mut S,
    frame: &ChartFrame,
    points: &[SamplePoint],
    scale: &Scale,
    theme: &ChartTheme,
) {
    let mut curve = Path::new();
    for (i, point) in points.iter().enumerate() {
        let (x, y) = (scale.px(frame, point.x), scale.py(frame, point.y));
        if i == 0 {
            curve.move_to(x, y);
        } else {
            curve.line_to(x, y);
        }
    }
    surface.stroke_path(&curve, theme.curve);

    curve
        .line_to(frame.padding + frame.graph_width(), frame.baseline())
        .line_to(frame.padding, frame.baseline())
        .close();
    surface.fill_path(&curve, theme.curve_fill);

    if theme.annotate {
        let x_step = frame.graph_width() / X_DIVISIONS as f64;
        for i in 0..=X_DIVISIONS {
            let value = scale.x0 + (i as f64 / X_DIVISIONS as f64) * scale.x_span;
            surface.fill_text(
                &format!("{:.1}", value),
                Point::new(frame.padding + i as f64 * x_step, frame.baseline() + X_LABEL_OFFSET),
                label_style(theme, TextAlign::Center),
            );
        }
    }
}

fn draw_y_labels<S: DrawSurface + ?Sized>(
    surface: &mut S,
    frame: &ChartFrame,
    scale: &Scale,
    theme: &ChartTheme,
) {
    let y_step = frame.graph_height() / Y_DIVISIONS as f64;
    for i in 0..=Y_DIVISIONS {
        let y = frame.baseline() - i as f64 * y_step;
        let value = (i as f64 / Y_DIVISIONS as f64) * scale.max_y;
        surface.fill_text(
            &format!("{:.2}", value),
            Point::new(frame.padding - Y_LABEL_GAP, y + Y_LABEL_BASELINE),
            label_style(theme, TextAlign::Right),
        );
    }
}

fn draw_grid<S: DrawSurface + ?Sized>(
    surface: &mut S,
    frame: &ChartFrame,
    family: Family,
    point_count: usize,
    theme: &ChartTheme,
) {
    let y_step = frame.graph_height() / Y_DIVISIONS as f64;
    for i in 1..=Y_DIVISIONS {
        let y = frame.baseline() - i as f64 * y_step;
        let mut line = Path::new();
        line.move_to(frame.padding, y).line_to(frame.width - frame.padding, y);
        surface.stroke_path(&line, theme.grid);
    }

    let (x_step, x_count) = if family.is_discrete() {
        (frame.graph_width() / (point_count + 1) as f64, point_count)
    } else {
        (frame.graph_width() / X_DIVISIONS as f64, X_DIVISIONS)
    };
    for i in 1..=x_count {
        let x = frame.padding + i as f64 * x_step;
        let mut line = Path::new();
        line.move_to(x, frame.padding).line_to(x, frame.baseline());
        surface.stroke_path(&line, theme.grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        distribution::DistributionSpec,
        surface::{DrawOp, PathCmd, RecordingSurface, SvgSurface},
    };

    fn frame() -> ChartFrame {
        ChartFrame::new(800.0, 400.0, DEFAULT_PADDING)
    }

    fn strokes_with(surface: &RecordingSurface, style: StrokeStyle) -> usize {
        surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke { style: s, .. } if *s == style))
            .count()
    }

    #[test]
    fn test_frame_geometry() {
        let f = frame();
        assert_eq!(f.graph_width(), 720.0);
        assert_eq!(f.graph_height(), 320.0);
        assert_eq!(f.baseline(), 360.0);
        let surface = RecordingSurface::new(600.0, 400.0);
        assert_eq!(ChartFrame::of(&surface, 40.0), ChartFrame::new(600.0, 400.0, 40.0));
    }

    #[test]
    fn test_draw_is_idempotent() {
        let theme = ChartTheme::interactive();
        for spec in [
            DistributionSpec::Normal { mean: 1.0, std_dev: 0.7 },
            DistributionSpec::Binomial { n: 12, p: 0.4 },
            DistributionSpec::Poisson { lambda: 3.3 },
        ] {
            let points = spec.samples();
            let mut surface = RecordingSurface::new(800.0, 400.0);
            draw_chart(&mut surface, &frame(), spec.family(), &points, &theme);
            let first = surface.ops().to_vec();
            draw_chart(&mut surface, &frame(), spec.family(), &points, &theme);
            assert_eq!(surface.ops(), first.as_slice());
            assert_eq!(surface.clears(), 2);

            let mut a = SvgSurface::new(800.0, 400.0);
            let mut b = SvgSurface::new(800.0, 400.0);
            draw_chart(&mut a, &frame(), spec.family(), &points, &theme);
            draw_chart(&mut b, &frame(), spec.family(), &points, &theme);
            draw_chart(&mut b, &frame(), spec.family(), &points, &theme);
            assert_eq!(a.to_svg(), b.to_svg());
        }
    }

    #[test]
    fn test_binomial_bars() {
        let theme = ChartTheme::interactive();
        let spec = DistributionSpec::Binomial { n: 4, p: 0.5 };
        let mut surface = RecordingSurface::new(800.0, 400.0);
        let outcome = render(&mut surface, &spec, DEFAULT_PADDING, &theme);
        assert_eq!(outcome, DrawOutcome::Drawn { max_y: 0.375 });

        let rects: Vec<Rect> = surface.rects().copied().collect();
        assert_eq!(rects.len(), 5);
        let bar_width = 720.0 / 6.0;
        assert!((rects[0].x - (40.0 + 0.5 * bar_width - bar_width / 3.0)).abs() < 1e-9);
        assert!((rects[0].width - bar_width / 1.5).abs() < 1e-9);
        for rect in &rects {
            assert_eq!(rect.y, 360.0);
            assert!(rect.height <= 0.0);
        }
        // the mode reaches the top of the graph area
        assert!((rects[2].height + 320.0).abs() < 1e-9);

        let texts: Vec<&str> = surface.texts().collect();
        for k in ["0", "1", "2", "3", "4"] {
            assert!(texts.contains(&k));
        }
        assert!(texts.contains(&"0.15"));
        assert_eq!(texts.last(), Some(&"Binomial Distribution"));
        // 5 horizontal + 5 vertical gridlines
        assert_eq!(strokes_with(&surface, theme.grid), 10);
    }

    #[test]
    fn test_normal_curve() {
        let theme = ChartTheme::interactive();
        let spec = DistributionSpec::Normal { mean: 0.0, std_dev: 1.0 };
        let mut surface = RecordingSurface::new(800.0, 400.0);
        render(&mut surface, &spec, DEFAULT_PADDING, &theme);

        let curve = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::Stroke { path, style } if *style == theme.curve => Some(path.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(curve.cmds().len(), 100);
        match (curve.cmds()[0], curve.cmds()[99]) {
            (PathCmd::MoveTo(first), PathCmd::LineTo(last)) => {
                assert!((first.x - 40.0).abs() < 1e-9);
                assert!((last.x - 760.0).abs() < 1e-9);
            }
            other => panic!("unexpected curve ends: {:?}", other),
        }

        let fill = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::Fill { path, color } if *color == theme.curve_fill => Some(path.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(fill.cmds().len(), 103);
        assert_eq!(fill.cmds().last(), Some(&PathCmd::Close));

        let texts: Vec<&str> = surface.texts().collect();
        assert!(texts.contains(&"-4.0"));
        assert!(texts.contains(&"0.0"));
        assert!(texts.contains(&"4.0"));
        assert_eq!(texts.last(), Some(&"Normal Distribution"));
        // 5 horizontal + 8 vertical gridlines
        assert_eq!(strokes_with(&surface, theme.grid), 13);
    }

    #[test]
    fn test_montage_theme_skips_annotations() {
        let theme = ChartTheme::montage();
        let spec = DistributionSpec::Poisson { lambda: 5.0 };
        let mut surface = RecordingSurface::new(600.0, 400.0);
        render(&mut surface, &spec, DEFAULT_PADDING, &theme);
        assert_eq!(surface.rects().count(), 21);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["Poisson Distribution"]);
        assert_eq!(strokes_with(&surface, theme.grid), 0);
    }

    #[test]
    fn test_degenerate_samples() {
        let theme = ChartTheme::interactive();
        let mut surface = RecordingSurface::new(800.0, 400.0);

        let outcome = draw_chart(&mut surface, &frame(), Family::Poisson, &[], &theme);
        assert_eq!(outcome, DrawOutcome::Degenerate);
        // axes and title only
        assert_eq!(surface.ops().len(), 2);

        let flat = [SamplePoint::new(0.0, 0.0), SamplePoint::new(1.0, 0.0)];
        let outcome = draw_chart(&mut surface, &frame(), Family::Binomial, &flat, &theme);
        assert_eq!(outcome, DrawOutcome::Degenerate);
        assert_eq!(surface.rects().count(), 0);

        let single = [SamplePoint::new(2.0, 0.4)];
        let outcome = draw_chart(&mut surface, &frame(), Family::Normal, &single, &theme);
        assert_eq!(outcome, DrawOutcome::Degenerate);
        let outcome = draw_chart(&mut surface, &frame(), Family::Binomial, &single, &theme);
        assert_eq!(outcome, DrawOutcome::Drawn { max_y: 0.4 });
    }

    #[test]
    fn test_theme_by_name() {
        assert_eq!("Montage".parse::<ChartTheme>().unwrap(), ChartTheme::montage());
        assert!(matches!(
            "neon".parse::<ChartTheme>(),
            Err(VizError::UnknownTheme(_))
        ));
    }
}
