//! Renders a move log as a 2D SVG diagram of the X/Z toolpath.
//!
//! This is a read-only projection of the log: one straight segment per
//! move, styled by kind, with a legend listing each kind once. Moves with
//! no start anchor (only ever the first rapid) are skipped, since there is
//! nowhere to draw them from.

use crate::moves::{Move, MoveKind};
use svg::node::element::{Line, Rectangle, Text};
use svg::Document;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 480.0;
const MARGIN: f64 = 48.0;

const KINDS: [MoveKind; 4] = [
    MoveKind::Rapid,
    MoveKind::LinearFeed,
    MoveKind::Plunge,
    MoveKind::Retract,
];

fn color(kind: MoveKind) -> &'static str {
    match kind {
        MoveKind::Rapid => "#1f77b4",
        MoveKind::LinearFeed => "#ff7f0e",
        MoveKind::Plunge => "#d62728",
        MoveKind::Retract => "#2ca02c",
    }
}

fn label(kind: MoveKind) -> &'static str {
    match kind {
        MoveKind::Rapid => "Rapid",
        MoveKind::LinearFeed => "Lateral feed",
        MoveKind::Plunge => "Plunge",
        MoveKind::Retract => "Retract",
    }
}

fn segment(x1: f64, y1: f64, x2: f64, y2: f64, kind: MoveKind) -> Line {
    let line = Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
        .set("stroke", color(kind))
        .set("stroke-width", 1.5);
    // Rapids are non-cutting repositioning, drawn dashed like the
    // reference plot
    if kind == MoveKind::Rapid {
        line.set("stroke-dasharray", "6 4")
    } else {
        line
    }
}

fn caption(x: f64, y: f64, s: &str) -> Text {
    Text::new(s)
        .set("x", x)
        .set("y", y)
        .set("font-family", "sans-serif")
        .set("font-size", 12)
        .set("fill", "#333333")
}

/// Draw up to `limit` moves of the log as an SVG document, X across and Z
/// up, both in inches. `None` renders the whole log; long plans are usually
/// capped to keep the diagram legible.
pub fn render(moves: &[Move], limit: Option<usize>) -> Document {
    let shown: Vec<&Move> = moves
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .filter(|m| m.start.is_some())
        .collect();

    let mut doc = Document::new()
        .set("width", WIDTH)
        .set("height", HEIGHT)
        .set("viewBox", (0.0, 0.0, WIDTH, HEIGHT))
        .add(
            Rectangle::new()
                .set("width", WIDTH)
                .set("height", HEIGHT)
                .set("fill", "white"),
        )
        .add(
            caption(WIDTH / 2.0, 24.0, "XZ Toolpath")
                .set("text-anchor", "middle")
                .set("font-size", 16),
        )
        .add(caption(WIDTH / 2.0, HEIGHT - 12.0, "X (inches)").set("text-anchor", "middle"))
        .add(
            caption(16.0, HEIGHT / 2.0, "Z (inches)")
                .set("text-anchor", "middle")
                .set("transform", format!("rotate(-90 16 {})", HEIGHT / 2.0)),
        );

    if shown.is_empty() {
        return doc;
    }

    // Fit the path into the canvas, preserving aspect ratio. Z grows
    // upward, SVG y grows downward, so the vertical axis flips.
    let mut min = shown[0].end;
    let mut max = shown[0].end;
    for m in &shown {
        for p in [m.start.unwrap(), m.end] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
    }
    let fit = |span: f64, extent: f64| {
        if span > 0.0 {
            extent / span
        } else {
            f64::INFINITY
        }
    };
    let scale = fit(max.x - min.x, WIDTH - 2.0 * MARGIN)
        .min(fit(max.y - min.y, HEIGHT - 2.0 * MARGIN));
    // A degenerate single-point path has nothing to fit against
    let scale = if scale.is_finite() { scale } else { 1.0 };
    let to_px = |x: f64, z: f64| {
        (
            MARGIN + (x - min.x) * scale,
            HEIGHT - MARGIN - (z - min.y) * scale,
        )
    };

    for m in &shown {
        let start = m.start.unwrap();
        let (x1, y1) = to_px(start.x, start.y);
        let (x2, y2) = to_px(m.end.x, m.end.y);
        doc = doc.add(segment(x1, y1, x2, y2, m.kind));
    }

    // One legend entry per kind present, in a fixed order
    let mut row = 0;
    for kind in KINDS {
        if !shown.iter().any(|m| m.kind == kind) {
            continue;
        }
        let y = MARGIN + row as f64 * 18.0;
        doc = doc
            .add(segment(WIDTH - 150.0, y, WIDTH - 120.0, y, kind))
            .add(caption(WIDTH - 112.0, y + 4.0, label(kind)));
        row += 1;
    }

    doc
}
