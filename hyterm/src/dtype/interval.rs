//! Extended-integer intervals backing the integral part of the type lattice.
//!
//! Every integral [`ValueType`](crate::dtype::ValueType) whose bounds are known
//! denotes an interval over `Z ∪ {-inf, +inf}`. Arithmetic is computed on `i128`
//! and any finite value that leaves the `i64` range saturates to the matching
//! infinity, so the computations below never overflow.

/// One end of an [`Interval`].
///
/// The derived ordering is the natural one: `NegInf < Finite(_) < PosInf` and
/// finite extents compare by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Extent {
    NegInf,
    Finite(i128),
    PosInf,
}

impl Extent {
    /// Build a finite extent, saturating values outside of the `i64` range.
    pub fn finite(value: i128) -> Self {
        if value > i64::MAX as i128 {
            Extent::PosInf
        } else if value < i64::MIN as i128 {
            Extent::NegInf
        } else {
            Extent::Finite(value)
        }
    }

    /// The value as an `i64`, if finite.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Extent::Finite(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    fn signum(self) -> i8 {
        match self {
            Extent::NegInf => -1,
            Extent::PosInf => 1,
            Extent::Finite(v) => v.signum() as i8,
        }
    }

    fn neg(self) -> Self {
        match self {
            Extent::NegInf => Extent::PosInf,
            Extent::PosInf => Extent::NegInf,
            Extent::Finite(v) => Extent::finite(-v),
        }
    }

    /// Sum of two extents. `-inf + +inf` never occurs for well-formed intervals
    /// (a lower bound is never `+inf` and an upper bound never `-inf`), it is
    /// resolved towards the first operand.
    fn add(self, other: Self) -> Self {
        match (self, other) {
            (Extent::Finite(a), Extent::Finite(b)) => Extent::finite(a + b),
            (Extent::Finite(_), inf) => inf,
            (inf, _) => inf,
        }
    }

    /// Product of two extents, with `0 * inf = 0` (endpoints of closed integer
    /// intervals, so zero absorbs).
    fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Extent::Finite(a), Extent::Finite(b)) => Extent::finite(a * b),
            (Extent::Finite(0), _) | (_, Extent::Finite(0)) => Extent::Finite(0),
            (a, b) => {
                if a.signum() * b.signum() > 0 {
                    Extent::PosInf
                } else {
                    Extent::NegInf
                }
            }
        }
    }
}

/// Closed interval `[lo, hi]` over the extended integers. Empty when `lo > hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub lo: Extent,
    pub hi: Extent,
}

impl Interval {
    pub const INTEGER: Interval = Interval {
        lo: Extent::NegInf,
        hi: Extent::PosInf,
    };
    pub const NATURAL: Interval = Interval {
        lo: Extent::Finite(0),
        hi: Extent::PosInf,
    };
    pub const POSITIVE: Interval = Interval {
        lo: Extent::Finite(1),
        hi: Extent::PosInf,
    };
    pub const ZERO_OR_ONE: Interval = Interval {
        lo: Extent::Finite(0),
        hi: Extent::Finite(1),
    };

    pub fn new(lo: i64, hi: i64) -> Self {
        Self {
            lo: Extent::Finite(lo as i128),
            hi: Extent::Finite(hi as i128),
        }
    }

    pub fn point(value: i64) -> Self {
        Self::new(value, value)
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// Both ends are finite.
    pub fn is_finite(&self) -> bool {
        matches!(
            (self.lo, self.hi),
            (Extent::Finite(_), Extent::Finite(_))
        )
    }

    /// `other ⊆ self`. The empty interval is contained in everything.
    pub fn contains(&self, other: &Interval) -> bool {
        other.is_empty() || (self.lo <= other.lo && other.hi <= self.hi)
    }

    /// Smallest interval containing both operands.
    pub fn hull(&self, other: &Interval) -> Interval {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Interval {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    /// Intersection of both operands, `None` if disjoint.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let result = Interval {
            lo: self.lo.max(other.lo),
            hi: self.hi.min(other.hi),
        };
        (!result.is_empty()).then_some(result)
    }

    pub fn add(&self, other: &Interval) -> Interval {
        Interval {
            lo: self.lo.add(other.lo),
            hi: self.hi.add(other.hi),
        }
    }

    pub fn neg(&self) -> Interval {
        Interval {
            lo: self.hi.neg(),
            hi: self.lo.neg(),
        }
    }

    pub fn sub(&self, other: &Interval) -> Interval {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Interval) -> Interval {
        let candidates = [
            self.lo.mul(other.lo),
            self.lo.mul(other.hi),
            self.hi.mul(other.lo),
            self.hi.mul(other.hi),
        ];
        let lo = candidates.iter().copied().min().unwrap_or(Extent::NegInf);
        let hi = candidates.iter().copied().max().unwrap_or(Extent::PosInf);
        Interval { lo, hi }
    }
}
