/// A position/coordinate on the unit genome `[0.0, 1.0]`.
///
/// Values are always finite, so positions are totally ordered.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(transparent)]
pub struct Position(f64);

impl Position {
    /// Left end of the genome.
    pub const LEFT: Position = Position(0.0);
    /// Right end of the genome.
    pub const RIGHT: Position = Position(1.0);

    /// Create a new Position
    ///
    /// # Returns
    ///
    /// * `Some` if `position` lies in `[0.0, 1.0]`
    /// * `None` otherwise, including for `NaN`
    ///
    /// # Examples
    ///
    /// ```
    /// let p = wfarg_core::Position::new(0.25).unwrap();
    /// assert_eq!(p, 0.25); // can be compared to f64
    /// # assert!(p > 0.0);
    /// # assert!(0.0 < p);
    /// let p2 = wfarg_core::Position::new(0.5).unwrap();
    /// assert!(p < p2);
    /// assert!(wfarg_core::Position::new(1.5).is_none());
    /// assert!(wfarg_core::Position::new(f64::NAN).is_none());
    /// ```
    pub fn new(position: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&position) {
            // folds -0.0 into 0.0
            Some(Self(position + 0.0))
        } else {
            None
        }
    }

    /// Create a new position from a value known to be valid
    ///
    /// # Panics
    ///
    /// Will panic if `position` is not in `[0.0, 1.0]`.
    ///
    /// ```should_panic
    /// let p = wfarg_core::Position::new_valid(-1.0);
    /// ```
    pub fn new_valid(position: f64) -> Self {
        match Self::new(position) {
            Some(p) => p,
            None => panic!("invalid position: {}", position),
        }
    }

    /// The raw value.
    pub fn raw(self) -> f64 {
        self.0
    }

    /// `true` if the position lies strictly between
    /// the two ends of the genome.
    ///
    /// ```
    /// use wfarg_core::Position;
    /// assert!(Position::new_valid(0.5).is_interior());
    /// assert!(!Position::LEFT.is_interior());
    /// assert!(!Position::RIGHT.is_interior());
    /// ```
    pub fn is_interior(self) -> bool {
        self > Self::LEFT && self < Self::RIGHT
    }
}

impl Eq for Position {}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<f64> for Position {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialEq<Position> for f64 {
    fn eq(&self, other: &Position) -> bool {
        *self == other.0
    }
}

impl PartialOrd<f64> for Position {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl PartialOrd<Position> for f64 {
    fn partial_cmp(&self, other: &Position) -> Option<std::cmp::Ordering> {
        self.partial_cmp(&other.0)
    }
}

impl TryFrom<f64> for Position {
    type Error = crate::Error;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(crate::Error::InvalidPosition(value))
    }
}

impl From<Position> for f64 {
    fn from(value: Position) -> Self {
        value.0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
