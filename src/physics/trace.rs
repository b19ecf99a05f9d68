//! Bounded, fading history of the outer bob's positions

use crate::physics::math::{Scalar, Vector};
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 2000;
pub const DEFAULT_INITIAL_AGE: Scalar = 150.0;
pub const DEFAULT_DECAY: Scalar = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub position: Vector,
    pub age: Scalar,
}

/// A line between two consecutive trace points, faded by `age`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSegment {
    pub from: Vector,
    pub to: Vector,
    pub age: Scalar,
}

/// Insertion-ordered ring of trace points, oldest first
///
/// Ages only decay during [`Trace::draw_pass`], and only for the first point
/// of each drawn pair. The newest point therefore keeps its initial age until
/// another point is pushed after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    points: VecDeque<TracePoint>,
    capacity: usize,
    initial_age: Scalar,
    decay: Scalar,
}

impl Default for Trace {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_INITIAL_AGE, DEFAULT_DECAY)
    }
}

impl Trace {
    pub fn new(capacity: usize, initial_age: Scalar, decay: Scalar) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY) + 1),
            capacity,
            initial_age,
            decay,
        }
    }

    /// Append a fresh point, evicting the oldest once over capacity
    pub fn push(&mut self, position: Vector) {
        self.points.push_back(TracePoint {
            position,
            age: self.initial_age,
        });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Segments for every adjacent pair, carrying the first point's age
    /// before it decays
    pub fn draw_pass(&mut self) -> Vec<TraceSegment> {
        let mut segments = Vec::with_capacity(self.points.len().saturating_sub(1));

        for i in 1..self.points.len() {
            let to = self.points[i].position;
            let point = &mut self.points[i - 1];
            segments.push(TraceSegment {
                from: point.position,
                to,
                age: point.age,
            });
            point.age = (point.age - self.decay).max(0.0);
        }

        segments
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = &TracePoint> + '_ {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&TracePoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn initial_age(&self) -> Scalar {
        self.initial_age
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
