use std::io::{Result, Write};

pub mod geometry;
pub mod moves;
pub mod planner;
pub mod render;

use crate::moves::{Move, MoveKind};
use crate::planner::ToolpathPlan;

/// Fixed program preamble: machine reset, absolute positioning, inch units,
/// homing, and the G54 work offset. Emitted verbatim, exactly once, before
/// any move.
pub const PREAMBLE: [&str; 7] = [
    "G00",
    "G90 G94 G17",
    "G20",
    "G28 G91 Z0.",
    "G90",
    "M09",
    "G00 G54",
];

pub fn preamble(file: &mut dyn Write) -> Result<()> {
    for line in &PREAMBLE {
        writeln!(file, "{line}")?;
    }
    Ok(())
}

/// Emit a gcode word, fixed to four decimal places. All rounding of planned
/// positions happens here, at the emission boundary, never upstream.
fn g_val(file: &mut dyn Write, name: &str, ov: Option<f64>) -> Result<()> {
    if let Some(v) = ov {
        write!(file, " {name}{v:.4}")
    } else {
        Ok(())
    }
}

/// Translate one planned move into instruction lines. A rapid becomes a G00
/// traverse in X/Y followed by a G43 height-offset line; every controlled
/// move becomes a single G01 carrying only the axes that change, plus the
/// feed rate. Stateless given the move; the emitter never reads back or
/// reformats what it has written.
pub fn emit_move(file: &mut dyn Write, m: &Move, y_offset: f64) -> Result<()> {
    match m.kind {
        MoveKind::Rapid => {
            writeln!(file, "G00 X{:.4} Y{:.4}", m.end.x, y_offset)?;
            writeln!(file, "G43 Z{:.4} H01", m.end.y)?;
        }
        MoveKind::LinearFeed | MoveKind::Plunge | MoveKind::Retract => {
            let x = match m.start {
                Some(s) if s.x == m.end.x => None,
                _ => Some(m.end.x),
            };
            let z = match m.start {
                Some(s) if s.y == m.end.y => None,
                _ => Some(m.end.y),
            };
            write!(file, "G01")?;
            g_val(file, "X", x)?;
            g_val(file, "Z", z)?;
            g_val(file, "F", m.feed)?;
            writeln!(file)?;
        }
    }
    Ok(())
}

/// Write a whole plan as an instruction stream: the preamble once, then
/// every move in execution order.
pub fn write_plan(file: &mut dyn Write, plan: &ToolpathPlan) -> Result<()> {
    preamble(file)?;
    for m in plan.moves() {
        emit_move(file, m, plan.y_offset())?;
    }
    Ok(())
}
