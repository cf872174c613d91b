use std::fmt::Write;

use super::{Color, DrawSurface, Path, PathCmd, Point, Rect, StrokeStyle, TextAlign, TextStyle};

const FONT_FAMILY: &str = "Arial";

/// Serializes draw calls into an SVG document.
#[derive(Clone, Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    background: Option<Color>,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: None,
            body: String::new(),
        }
    }

    /// Paint a solid rectangle behind everything, surviving clears.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn to_svg(&self) -> String {
        let mut doc = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        );
        if let Some(bg) = self.background {
            let _ = writeln!(
                doc,
                "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                self.width,
                self.height,
                bg.css()
            );
        }
        doc.push_str(&self.body);
        doc.push_str("</svg>\n");
        doc
    }

    fn path_data(path: &Path) -> String {
        let mut d = String::new();
        for cmd in path.cmds() {
            if !d.is_empty() {
                d.push(' ');
            }
            match cmd {
                PathCmd::MoveTo(p) => {
                    let _ = write!(d, "M{:.2},{:.2}", p.x, p.y);
                }
                PathCmd::LineTo(p) => {
                    let _ = write!(d, "L{:.2},{:.2}", p.x, p.y);
                }
                PathCmd::Close => d.push('Z'),
            }
        }
        d
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl DrawSurface for SvgSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.body.clear();
    }

    fn stroke_path(&mut self, path: &Path, style: StrokeStyle) {
        if path.is_empty() {
            return;
        }
        let _ = writeln!(
            self.body,
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            Self::path_data(path),
            style.color.css(),
            style.width
        );
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        if path.is_empty() {
            return;
        }
        let _ = writeln!(
            self.body,
            "<path d=\"{}\" fill=\"{}\" stroke=\"none\"/>",
            Self::path_data(path),
            color.css()
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let r = rect.normalized();
        let _ = writeln!(
            self.body,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
            r.x,
            r.y,
            r.width,
            r.height,
            color.css()
        );
    }

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle) {
        let anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let _ = writeln!(
            self.body,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" text-anchor=\"{}\" fill=\"{}\">{}</text>",
            at.x,
            at.y,
            FONT_FAMILY,
            style.size,
            anchor,
            style.color.css(),
            escape(text)
        );
    }
}
