use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
};
use tracing::{instrument, Level};

use crate::{
    autoplay::{Frame, FrameCause},
    chart::{draw_chart, ChartFrame, ChartTheme},
    distribution::{max_y, Distribution, DistributionSpec, Family, SamplePoint},
    error::Result,
    surface::SvgSurface,
};

/// One JSONL line per frame. The sample points themselves are left out.
#[derive(Debug, Serialize)]
struct FrameRecord<'a> {
    seq: u64,
    at: DateTime<Utc>,
    cause: FrameCause,
    family: Family,
    spec: &'a DistributionSpec,
    info: String,
    points: usize,
    max_y: Option<f64>,
}

impl<'a> From<&'a Frame> for FrameRecord<'a> {
    fn from(frame: &'a Frame) -> Self {
        Self {
            seq: frame.seq,
            at: frame.at,
            cause: frame.cause,
            family: frame.spec.family(),
            spec: &frame.spec,
            info: frame.spec.info(),
            points: frame.points.len(),
            max_y: max_y(&frame.points),
        }
    }
}

/// Writes each frame as an SVG file into `dir`.
#[derive(Debug, Clone)]
pub struct SvgSink {
    pub dir: PathBuf,
    pub frame: ChartFrame,
    pub theme: ChartTheme,
}

impl SvgSink {
    pub fn render(&self, frame: &Frame) -> String {
        render_svg(&self.frame, frame.spec.family(), &frame.points, &self.theme)
    }

    fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame-{:05}.svg", index))
    }
}

/// Draw a sample sequence into a standalone SVG document.
pub fn render_svg(
    frame: &ChartFrame,
    family: Family,
    points: &[SamplePoint],
    theme: &ChartTheme,
) -> String {
    let mut surface = SvgSurface::new(frame.width, frame.height).with_background(theme.background);
    draw_chart(&mut surface, frame, family, points, theme);
    surface.to_svg()
}

/// The report loop writes the frames to a file in JSONL format, and renders
/// them to SVG when `svg` is set.
///
/// Report loop exits when the frame receiver is closed and returns the number
/// of frames written.
#[instrument(skip_all, level = Level::DEBUG, target = "report_loop")]
pub async fn report_loop(
    mut output_jsonl_file: File,
    frame_receiver: flume::Receiver<Frame>,
    svg: Option<SvgSink>,
) -> Result<usize> {
    if let Some(sink) = &svg {
        tokio::fs::create_dir_all(&sink.dir).await?;
    }
    let mut buf_writer = BufWriter::new(&mut output_jsonl_file);
    let mut written = 0;
    while let Ok(frame) = frame_receiver.recv_async().await {
        let line = serde_json::to_string(&FrameRecord::from(&frame))?;
        buf_writer.write_all(line.as_bytes()).await?;
        buf_writer.write_all(b"\n").await?;
        if let Some(sink) = &svg {
            tokio::fs::write(sink.path_for(written), sink.render(&frame)).await?;
        }
        written += 1;
    }
    buf_writer.flush().await?;
    tracing::info!(frames = written, "report loop finished");
    Ok(written)
}

/// Write `points` as `x,y` CSV rows with a header.
pub fn write_samples_csv<W: io::Write>(writer: W, points: &[SamplePoint]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_samples_csv(path: &Path, points: &[SamplePoint]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_samples_csv(io::BufWriter::new(file), points)
}
