//! Derives the complete move sequence for one kerf-cutting job.

use crate::geometry::{diagonal_move, DomainError, PlanePoint};
use crate::moves::{x, xz, z, Move, MoveKind, MoveLog, StateError};
use thiserror::Error;

/// Everything that describes a job. Supplied once, read-only for the run.
/// Lengths in inches, feed in inches per minute, angle in degrees from
/// horizontal.
#[derive(Debug, Clone)]
pub struct CutParameters {
    /// Width of the saw blade
    pub blade_width: f64,
    /// Width of the wax block, across Y
    pub material_width: f64,
    /// Length of the wax block along X, the direction the cuts step across
    pub material_length: f64,
    /// Working height the blade returns to between cuts, just above the wax
    pub retract_height: f64,
    /// Safe height for the first approach
    pub clearance_height: f64,
    /// Depth of each kerf below the material surface
    pub cut_depth: f64,
    /// Lateral spacing between successive kerfs
    pub cut_spacing: f64,
    /// Angle of the cut face from horizontal
    pub cut_angle_deg: f64,
    /// Cutting feed rate
    pub feed_speed: f64,
}

/// The parameters describe a job that cannot be cut. Planning aborts before
/// anything is emitted.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("cut angle {0} degrees is outside (0, 90]")]
    AngleOutOfRange(f64),

    #[error("no cuts fit: spacing {spacing} exceeds material length {length}")]
    NoCuts { spacing: f64, length: f64 },
}

/// Any failure while planning. All three are fatal for the run.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl CutParameters {
    /// Number of cut cycles the material admits at this spacing.
    pub fn cut_count(&self) -> usize {
        (self.material_length / self.cut_spacing).floor() as usize
    }

    /// Fixed lateral offset centering the blade over the material edge.
    /// Derived once per plan; every move in the plan is cut at this Y.
    pub fn y_offset(&self) -> f64 {
        -(self.blade_width / 2.0) - (self.material_width / 2.0)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let dims = [
            ("blade width", self.blade_width),
            ("material width", self.material_width),
            ("material length", self.material_length),
            ("retract height", self.retract_height),
            ("clearance height", self.clearance_height),
            ("cut depth", self.cut_depth),
            ("cut spacing", self.cut_spacing),
            ("feed speed", self.feed_speed),
        ];
        for &(name, value) in &dims {
            if !(value > 0.0) {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }
        if !(self.cut_angle_deg > 0.0 && self.cut_angle_deg <= 90.0) {
            return Err(ConfigurationError::AngleOutOfRange(self.cut_angle_deg));
        }
        if self.cut_count() == 0 {
            return Err(ConfigurationError::NoCuts {
                spacing: self.cut_spacing,
                length: self.material_length,
            });
        }
        Ok(())
    }
}

/// The ordered move sequence for one job, together with the fixed lateral
/// offset the whole plan is cut at. Owns its log; nothing survives the run.
#[derive(Debug)]
pub struct ToolpathPlan {
    y_offset: f64,
    log: MoveLog,
}

impl ToolpathPlan {
    pub fn moves(&self) -> &[Move] {
        self.log.moves()
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }
}

/// Plan the full job: approach the material, then step across it cutting
/// one angled kerf per cycle. Positions are kept at full precision here;
/// rounding belongs to the emitter.
pub fn plan(params: &CutParameters) -> Result<ToolpathPlan, PlanError> {
    params.validate()?;

    let mut log = MoveLog::new();

    // Rapid to the start of the material at clearance height. The tool
    // could be anywhere before this, so the move has no start anchor.
    log.append_unanchored(MoveKind::Rapid, xz(0.0, params.clearance_height), None)?;
    // Feed down to working height rather than rapiding, to give us an
    // opportunity to panic before the blade reaches the wax
    log.append(MoveKind::LinearFeed, None, z(params.retract_height), Some(params.feed_speed))?;

    // Each cut strokes from retract height down through the material
    // surface to the full cut depth, and back out
    let stroke = params.cut_depth + params.retract_height;

    for i in 0..params.cut_count() {
        let step_x = i as f64 * params.cut_spacing;
        // Step over to the next kerf at feed rate; the blade is barely
        // above the wax here and a full-speed traverse risks collision
        log.append(MoveKind::LinearFeed, None, x(step_x), Some(params.feed_speed))?;

        let top = PlanePoint::new(step_x, params.retract_height);
        let bottom = diagonal_move(params.cut_angle_deg, top, stroke, true)?;
        log.append(
            MoveKind::Plunge,
            None,
            xz(bottom.x, bottom.y),
            Some(params.feed_speed),
        )?;

        let out = diagonal_move(params.cut_angle_deg, bottom, stroke, false)?;
        log.append(
            MoveKind::Retract,
            None,
            xz(out.x, out.y),
            Some(params.feed_speed),
        )?;
    }

    Ok(ToolpathPlan {
        y_offset: params.y_offset(),
        log,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::geometry::Point2;

    const EPSILON: f64 = 1e-10;

    fn params() -> CutParameters {
        CutParameters {
            blade_width: 2.99213,
            material_width: 2.0,
            material_length: 4.0,
            retract_height: 0.04,
            clearance_height: 0.25,
            cut_depth: 0.00393701,
            cut_spacing: 0.0023622,
            cut_angle_deg: 56.0,
            feed_speed: 1.0,
        }
    }

    #[test]
    fn test_move_count_is_two_setup_plus_three_per_cut() {
        let mut p = params();
        p.material_length = 1.0;
        p.cut_spacing = 0.1;
        let plan = plan(&p).unwrap();
        assert_eq!(p.cut_count(), 10);
        assert_eq!(plan.moves().len(), 2 + 3 * 10);
    }

    #[test]
    fn test_exact_multiple_spacing_hits_the_floor_boundary() {
        // 0.5 divides 4.0 exactly: eight cycles, not seven or nine
        let mut p = params();
        p.cut_spacing = 0.5;
        assert_eq!(p.cut_count(), 8);
        let plan = plan(&p).unwrap();
        assert_eq!(plan.moves().len(), 2 + 3 * 8);
    }

    #[test]
    fn test_setup_moves_approach_then_descend() {
        let p = params();
        let plan = plan(&p).unwrap();
        let moves = plan.moves();

        assert_eq!(moves[0].kind, MoveKind::Rapid);
        assert_eq!(moves[0].start, None);
        assert_eq!(moves[0].end, Point2::new(0.0, p.clearance_height));

        // The descent to working height is controlled, not a rapid
        assert_eq!(moves[1].kind, MoveKind::LinearFeed);
        assert_eq!(moves[1].end, Point2::new(0.0, p.retract_height));
        assert_eq!(moves[1].feed, Some(p.feed_speed));
    }

    #[test]
    fn test_each_cycle_is_step_plunge_retract() {
        let mut p = params();
        p.cut_spacing = 0.5;
        let plan = plan(&p).unwrap();
        for cycle in plan.moves()[2..].chunks(3) {
            assert_eq!(cycle[0].kind, MoveKind::LinearFeed);
            assert_eq!(cycle[1].kind, MoveKind::Plunge);
            assert_eq!(cycle[2].kind, MoveKind::Retract);
        }
    }

    #[test]
    fn test_cycles_cut_to_depth_and_retrace_to_retract_height() {
        let mut p = params();
        p.cut_spacing = 0.5;
        let plan = plan(&p).unwrap();
        let dx = (p.cut_depth + p.retract_height) / p.cut_angle_deg.to_radians().tan();

        for (i, cycle) in plan.moves()[2..].chunks(3).enumerate() {
            let step_x = i as f64 * p.cut_spacing;
            // Plunge bottoms out below the surface at full depth, one
            // diagonal forward of the step position
            assert!((cycle[1].end.x - (step_x + dx)).abs() < EPSILON);
            assert!((cycle[1].end.y - (-p.cut_depth)).abs() < EPSILON);
            // Retract retraces the diagonal back to the step position at
            // working height, ready for the next lateral advance
            assert!((cycle[2].end.x - step_x).abs() < EPSILON);
            assert!((cycle[2].end.y - p.retract_height).abs() < EPSILON);
        }
    }

    #[test]
    fn test_the_log_is_a_connected_path() {
        // Every move after the first starts exactly where its predecessor
        // ended, so the planner can never trip the move log's StateError
        let plan = plan(&params()).unwrap();
        let moves = plan.moves();
        assert_eq!(moves[0].start, None);
        for pair in moves.windows(2) {
            assert_eq!(pair[1].start, Some(pair[0].end));
        }
    }

    #[test]
    fn test_y_offset_centers_the_blade_over_the_material_edge() {
        let p = params();
        let plan = plan(&p).unwrap();
        assert!((plan.y_offset() - (-(2.99213 / 2.0) - 1.0)).abs() < EPSILON);
    }

    #[test]
    fn test_zero_cuts_is_a_configuration_error() {
        let mut p = params();
        p.cut_spacing = 5.0;
        match plan(&p) {
            Err(PlanError::Config(ConfigurationError::NoCuts { .. })) => {}
            other => panic!("expected NoCuts, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_spacing_is_rejected() {
        let mut p = params();
        p.cut_spacing = 0.0;
        match plan(&p) {
            Err(PlanError::Config(ConfigurationError::NonPositive { name, .. })) => {
                assert_eq!(name, "cut spacing")
            }
            other => panic!("expected NonPositive, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_angles_are_rejected_before_planning() {
        for &angle in &[0.0, -10.0, 90.5, f64::NAN] {
            let mut p = params();
            p.cut_angle_deg = angle;
            match plan(&p) {
                Err(PlanError::Config(ConfigurationError::AngleOutOfRange(_))) => {}
                other => panic!("expected AngleOutOfRange for {}, got {:?}", angle, other),
            }
        }
    }

    #[test]
    fn test_vertical_cuts_plan_cleanly() {
        let mut p = params();
        p.cut_angle_deg = 90.0;
        p.cut_spacing = 0.5;
        let plan = plan(&p).unwrap();
        for cycle in plan.moves()[2..].chunks(3) {
            // Straight down and straight back up: no lateral drift
            assert_eq!(cycle[1].end.x, cycle[0].end.x);
            assert_eq!(cycle[2].end.x, cycle[1].end.x);
        }
    }
}
