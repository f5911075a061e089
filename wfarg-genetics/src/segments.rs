use wfarg_core::Position;

use crate::Breakpoint;

/// A half-open genomic interval `[left, right)`
/// inherited from one gamete.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    /// Left edge of interval
    pub left: Position,
    /// Right edge of interval
    pub right: Position,
}

impl Segment {
    /// Create a new instance.
    ///
    /// # Returns
    ///
    /// `None` unless `left < right`.
    pub fn new(left: Position, right: Position) -> Option<Self> {
        if left < right {
            Some(Self { left, right })
        } else {
            None
        }
    }
}

/// The intervals contributed to one offspring
/// chromosome by each of a parent's two gametes.
///
/// The buffers are reused between meioses.
#[derive(Default, Debug, Clone)]
pub struct GameteSegments {
    first: Vec<Segment>,
    second: Vec<Segment>,
}

impl GameteSegments {
    /// Empty buffers for both gametes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition `[0, 1)` at `breakpoints`.
    ///
    /// Even-indexed segments, starting with `[0, breakpoints[0])`,
    /// go to the first gamete and odd-indexed ones to the second.
    /// The last segment always ends at `1.0`, whether or not
    /// `breakpoints` ends with [`Breakpoint::End`].
    ///
    /// A breakpoint at `0.0`, or equal to the breakpoint before it,
    /// is skipped as if it were absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use wfarg_core::Position;
    /// use wfarg_genetics::{Breakpoint, GameteSegments};
    ///
    /// let mut segments = GameteSegments::new();
    /// segments.split(&[]);
    /// assert_eq!(segments.first().len(), 1);
    /// assert!(segments.second().is_empty());
    ///
    /// segments.split(&[
    ///     Breakpoint::Crossover(Position::new_valid(0.5)),
    ///     Breakpoint::End,
    /// ]);
    /// assert_eq!(segments.first()[0].right, 0.5);
    /// assert_eq!(segments.second()[0].left, 0.5);
    /// assert_eq!(segments.second()[0].right, 1.0);
    /// ```
    pub fn split(&mut self, breakpoints: &[Breakpoint]) {
        self.first.clear();
        self.second.clear();

        let mut left = Position::LEFT;
        let mut to_first = true;
        for b in breakpoints {
            let right = b.position().unwrap_or(Position::RIGHT);
            if let Some(segment) = Segment::new(left, right) {
                if to_first {
                    self.first.push(segment);
                } else {
                    self.second.push(segment);
                }
                to_first = !to_first;
                left = right;
            }
            if left == Position::RIGHT {
                break;
            }
        }
        if let Some(segment) = Segment::new(left, Position::RIGHT) {
            if to_first {
                self.first.push(segment);
            } else {
                self.second.push(segment);
            }
        }
    }

    /// Segments inherited from the first gamete.
    pub fn first(&self) -> &[Segment] {
        &self.first
    }

    /// Segments inherited from the second gamete.
    pub fn second(&self) -> &[Segment] {
        &self.second
    }

    /// Total number of segments.
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    /// `true` before the first call to [`GameteSegments::split`].
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }
}

/// Convenience wrapper around [`GameteSegments::split`].
pub fn split_breakpoints(breakpoints: &[Breakpoint]) -> GameteSegments {
    let mut segments = GameteSegments::new();
    segments.split(breakpoints);
    segments
}
