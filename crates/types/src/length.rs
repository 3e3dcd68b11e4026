use serde::{Deserialize, Serialize};

/// A length in millipoints.
pub type Length = i32;

/// A length with elasticity: the optimum value plus the range it may shrink or
/// stretch into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MinOptMax {
    pub min: Length,
    pub opt: Length,
    pub max: Length,
}

impl MinOptMax {
    pub fn new(min: Length, opt: Length, max: Length) -> Self {
        debug_assert!(min <= opt && opt <= max, "min <= opt <= max violated");
        Self { min, opt, max }
    }

    /// A rigid length.
    pub fn fixed(length: Length) -> Self {
        Self {
            min: length,
            opt: length,
            max: length,
        }
    }

    pub fn zero() -> Self {
        Self::fixed(0)
    }

    /// How far the length may grow beyond its optimum.
    pub fn stretch(&self) -> Length {
        self.max - self.opt
    }

    /// How far the length may shrink below its optimum.
    pub fn shrink(&self) -> Length {
        self.opt - self.min
    }

    pub fn is_valid(&self) -> bool {
        self.min >= 0 && self.min <= self.opt && self.opt <= self.max
    }
}
