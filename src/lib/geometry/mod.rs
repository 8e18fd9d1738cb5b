use nalgebra::geometry::Point2;
use thiserror::Error;

/// A position in the vertical cutting plane. `x` is lateral travel along the
/// material (machine X); `y` holds depth (machine Z). Both in inches.
pub type PlanePoint = Point2<f64>;

/// A geometry computation was handed a value outside its domain.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    /// The cut angle has no usable tangent. Valid angles are in (0, 90].
    #[error("cut angle {0} degrees is outside (0, 90]")]
    AngleOutOfRange(f64),

    /// Depth is a magnitude; direction is chosen by the `descending` flag.
    #[error("z depth must be a non-negative magnitude, got {0}")]
    NegativeDepth(f64),
}

/// Target position after a diagonal move at `angle_deg` from horizontal.
///
/// The vertical displacement is `z_depth` exactly; the horizontal
/// displacement is `z_depth / tan(angle_deg)`. With `descending` set the
/// tool moves deeper and forward along +X, otherwise it withdraws, moving
/// up and back along -X. At exactly 90 degrees the move is a straight
/// vertical plunge.
pub fn diagonal_move(
    angle_deg: f64,
    from: PlanePoint,
    z_depth: f64,
    descending: bool,
) -> Result<PlanePoint, DomainError> {
    if !(angle_deg > 0.0 && angle_deg <= 90.0) {
        return Err(DomainError::AngleOutOfRange(angle_deg));
    }
    if !(z_depth >= 0.0) {
        return Err(DomainError::NegativeDepth(z_depth));
    }

    // tan(90 degrees) is not representable, so the vertical case is exact
    // rather than computed
    let dx = if angle_deg == 90.0 {
        0.0
    } else {
        z_depth / angle_deg.to_radians().tan()
    };

    if descending {
        Ok(Point2::new(from.x + dx, from.y - z_depth))
    } else {
        Ok(Point2::new(from.x - dx, from.y + z_depth))
    }
}
