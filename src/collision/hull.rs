//! Convex hull construction by gift wrapping (Jarvis march).
//!
//! The builder can run in one go ([`convex_hull`]) or one comparison at a time
//! through [`GiftWrap::step`], which lets a viewer animate the wrap.

use glam::Vec2;

use crate::error::HullError;
use crate::geometry::{orientation, Orientation};

/// Outcome of a single [`GiftWrap::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapStep {
    /// One candidate point was compared against the current best guess.
    Compared { index: usize },
    /// The best guess was committed as the next hull vertex.
    Committed { index: usize },
    /// The hull closed back on its start point.
    Closed,
}

/// Incremental gift-wrapping state over a borrowed point set.
#[derive(Debug, Clone)]
pub struct GiftWrap<'a> {
    points: &'a [Vec2],
    hull: Vec<usize>,
    start: usize,
    current: usize,
    best_guess: Option<usize>,
    next_check: usize,
    closed: bool,
}

impl<'a> GiftWrap<'a> {
    /// Prepare a wrap over `points`, starting from the lowest-x point.
    ///
    /// Ties on x go to the lower y; exact duplicates resolve to the first one
    /// in input order.
    pub fn new(points: &'a [Vec2]) -> Result<Self, HullError> {
        if points.len() < 3 {
            return Err(HullError::TooFewPoints {
                count: points.len(),
            });
        }

        let mut start = 0;
        for (i, p) in points.iter().enumerate().skip(1) {
            let s = points[start];
            if p.x < s.x || (p.x == s.x && p.y < s.y) {
                start = i;
            }
        }

        Ok(Self {
            points,
            hull: vec![start],
            start,
            current: start,
            best_guess: None,
            next_check: 0,
            closed: false,
        })
    }

    /// The hull point the wrap is currently pivoting around.
    pub fn current(&self) -> Vec2 {
        self.points[self.current]
    }

    /// The best candidate for the next hull vertex found so far.
    pub fn best_guess(&self) -> Option<Vec2> {
        self.best_guess.map(|i| self.points[i])
    }

    /// The point that the next call to [`step`](Self::step) will compare.
    pub fn checking(&self) -> Option<Vec2> {
        self.points.get(self.next_check).copied()
    }

    /// Hull vertices committed so far, in wrap order.
    pub fn hull_so_far(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.hull.iter().map(|&i| self.points[i])
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Advance the wrap by one comparison, or commit a vertex once every
    /// point has been compared.
    pub fn step(&mut self) -> Result<WrapStep, HullError> {
        if self.closed {
            return Ok(WrapStep::Closed);
        }

        if self.next_check < self.points.len() {
            let index = self.next_check;
            self.next_check += 1;
            self.compare(index);
            return Ok(WrapStep::Compared { index });
        }

        let next = self
            .best_guess
            .take()
            .ok_or(HullError::NoCandidate {
                index: self.current,
            })?;
        self.next_check = 0;

        if self.points[next] == self.points[self.start] {
            self.closed = true;
            if self.hull.len() < 3 {
                return Err(HullError::Degenerate {
                    vertices: self.hull.len(),
                });
            }
            return Ok(WrapStep::Closed);
        }

        // A convex hull never has more vertices than input points.
        if self.hull.len() >= self.points.len() {
            return Err(HullError::DidNotClose {
                cap: self.points.len() + 1,
            });
        }

        self.hull.push(next);
        self.current = next;
        Ok(WrapStep::Committed { index: next })
    }

    /// Run the wrap to completion and return the open, counter-clockwise hull.
    pub fn finish(mut self) -> Result<Vec<Vec2>, HullError> {
        while self.step()? != WrapStep::Closed {}
        Ok(self.hull.iter().map(|&i| self.points[i]).collect())
    }

    /// Replace the best guess with `index` if it wraps tighter around the
    /// current point.
    fn compare(&mut self, index: usize) {
        let p = self.points[self.current];
        let candidate = self.points[index];
        if candidate == p {
            return;
        }

        let Some(best) = self.best_guess else {
            self.best_guess = Some(index);
            return;
        };

        let best_point = self.points[best];
        match orientation(p, candidate, best_point) {
            Orientation::CounterClockwise => self.best_guess = Some(index),
            // Collinear points only win when farther out, so points in the
            // middle of a hull edge are never emitted.
            Orientation::Collinear
                if p.distance_squared(candidate) > p.distance_squared(best_point) =>
            {
                self.best_guess = Some(index)
            }
            _ => {}
        }
    }
}

/// Compute the convex hull of `points` as an open, counter-clockwise polygon.
pub fn convex_hull(points: &[Vec2]) -> Result<Vec<Vec2>, HullError> {
    GiftWrap::new(points)?.finish()
}
