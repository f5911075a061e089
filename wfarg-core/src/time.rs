/// A forward-in-time birth generation.
///
/// Founders are born at time `0.0`.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Time(f64);

impl Time {
    /// Create a new time
    ///
    /// # Returns
    ///
    /// `None` if `value` is not finite or is negative.
    ///
    /// ```
    /// assert!(wfarg_core::Time::new(3.0).is_some());
    /// assert!(wfarg_core::Time::new(-1.0).is_none());
    /// assert!(wfarg_core::Time::new(f64::INFINITY).is_none());
    /// ```
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// The raw value.
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl From<u32> for Time {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl TryFrom<i64> for Time {
    type Error = crate::Error;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value as f64).ok_or(crate::Error::InvalidTime(value as f64))
    }
}

impl TryFrom<f64> for Time {
    type Error = crate::Error;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(crate::Error::InvalidTime(value))
    }
}

impl From<Time> for f64 {
    fn from(value: Time) -> Self {
        value.0
    }
}

impl PartialEq<f64> for Time {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<Time> for Time {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match self.0.partial_cmp(&other.0) {
            None => panic!("fatal: partial_cmp for Time received non-finite values"),
            Some(x) => Some(x),
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
