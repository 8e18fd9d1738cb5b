//! The move log: an ordered, append-only record of every motion in a plan.
//!
//! Moves form a connected path. Any coordinate a caller leaves implicit is
//! resolved here, against the end of the previous move, so downstream
//! consumers never have to guess where a move started.

use crate::geometry::PlanePoint;
use nalgebra::geometry::Point2;
use thiserror::Error;

/// What a single motion does. `Plunge` descends into material along a
/// diagonal, `Retract` withdraws along a diagonal, `LinearFeed` moves at a
/// controlled feed rate, and `Rapid` traverses at full machine speed
/// without cutting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Rapid,
    LinearFeed,
    Plunge,
    Retract,
}

/// One atomic machine motion in the cutting plane.
///
/// `start` is `None` only for the first move of a log, where the tool's
/// position before the move is unknown. `feed` is present on every
/// controlled move and absent on rapids.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub kind: MoveKind,
    pub start: Option<PlanePoint>,
    pub end: PlanePoint,
    pub feed: Option<f64>,
}

/// A target in the cutting plane with either axis optionally left implicit,
/// to be carried over from the previous move.
#[derive(Debug, Clone, Copy, Default)]
pub struct Axes {
    x: Option<f64>,
    z: Option<f64>,
}

pub fn x(x: f64) -> Axes {
    Axes {
        x: Some(x),
        z: None,
    }
}

pub fn z(z: f64) -> Axes {
    Axes {
        x: None,
        z: Some(z),
    }
}

pub fn xz(x: f64, z: f64) -> Axes {
    Axes {
        x: Some(x),
        z: Some(z),
    }
}

/// The log cannot resolve an implicit coordinate. This is always a defect
/// in the calling planner, never bad user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("cannot resolve an implicit coordinate: the move log is empty")]
    NoPriorMove,

    #[error("an unanchored move is only permitted as the first move of a log")]
    NotFirstMove,

    #[error("an unanchored move must name both axes of its end position")]
    UnanchoredPartialEnd,
}

/// Append-only sequence of moves. Insertion order is execution order; once
/// appended, a move is never edited or removed.
#[derive(Debug, Default)]
pub struct MoveLog {
    moves: Vec<Move>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    fn last_end(&self) -> Option<PlanePoint> {
        self.moves.last().map(|m| m.end)
    }

    /// Append a move, resolving implicit coordinates against the previous
    /// move's end. Passing `start: None` carries the whole start position
    /// over; a partial `Axes` carries only the missing axis. There is no
    /// implicit origin: carrying from an empty log is a `StateError`, so a
    /// plan can never silently start from an ambiguous position.
    pub fn append(
        &mut self,
        kind: MoveKind,
        start: Option<Axes>,
        end: Axes,
        feed: Option<f64>,
    ) -> Result<&Move, StateError> {
        check_feed(kind, feed);
        let prev = self.last_end();
        let start = start.unwrap_or_default();
        let start = Point2::new(
            resolve(start.x, prev.map(|p| p.x))?,
            resolve(start.z, prev.map(|p| p.y))?,
        );
        let end = Point2::new(
            resolve(end.x, prev.map(|p| p.x))?,
            resolve(end.z, prev.map(|p| p.y))?,
        );
        self.moves.push(Move {
            kind,
            start: Some(start),
            end,
            feed,
        });
        Ok(self.moves.last().unwrap())
    }

    /// Record the first move of a log, whose start position is unknown (the
    /// tool could be anywhere before its first traverse). Only the first
    /// move may float; everything after it must connect.
    pub fn append_unanchored(
        &mut self,
        kind: MoveKind,
        end: Axes,
        feed: Option<f64>,
    ) -> Result<&Move, StateError> {
        check_feed(kind, feed);
        if !self.moves.is_empty() {
            return Err(StateError::NotFirstMove);
        }
        let end = Point2::new(
            end.x.ok_or(StateError::UnanchoredPartialEnd)?,
            end.z.ok_or(StateError::UnanchoredPartialEnd)?,
        );
        self.moves.push(Move {
            kind,
            start: None,
            end,
            feed,
        });
        Ok(self.moves.last().unwrap())
    }
}

fn resolve(explicit: Option<f64>, carried: Option<f64>) -> Result<f64, StateError> {
    explicit.or(carried).ok_or(StateError::NoPriorMove)
}

fn check_feed(kind: MoveKind, feed: Option<f64>) {
    match kind {
        MoveKind::Rapid => assert!(feed.is_none(), "rapid moves must not carry a feed rate"),
        _ => assert!(feed.is_some(), "controlled moves must carry a feed rate"),
    }
}
