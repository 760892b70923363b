// Copyright 2025 The Nanospan Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

/// A signed span of time with nanosecond resolution.
///
/// # Examples
/// ```
/// # use nanospan::{Duration, DurationError};
/// let d = Duration::from_nanos(3_000_000);
/// assert_eq!(d + Duration::EPSILON, Duration::from_nanos(3_000_001));
/// assert_eq!((d / 3000).to_nanos()?, 1000);
/// # Ok::<(), DurationError>(())
/// ```
///
/// A `Duration` is independent of any calendar or time zone; it is just an
/// exact count of nanoseconds, positive or negative. The representable range
/// spans many millions of years, far beyond what a single 64-bit nanosecond
/// count can hold, and all arithmetic is exact: results are never rounded or
/// silently wrapped. Where a result cannot be represented the operation
/// reports it, either through a [checked][Duration::checked_add] variant or
/// by failing at the narrowing conversion ([to_nanos][Duration::to_nanos]).
///
/// # Internal form
///
/// The value is stored as a whole number of days plus a nanosecond-of-day in
/// `[0, NANOS_PER_DAY)`. The split uses floor division, so the sign is
/// carried entirely by the day component: minus one nanosecond is
/// `{days: -1, nanos_of_day: NANOS_PER_DAY - 1}`. Because this form is
/// canonical, the derived equality and ordering match comparison of the
/// exact nanosecond values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Duration {
    /// Whole days offset from zero, possibly negative.
    days: i64,

    /// Nanosecond of day, always in `[0, NANOS_PER_DAY)` regardless of the
    /// sign of the duration.
    nanos_of_day: i64,
}

/// Represent failures in converting or creating [Duration] instances.
///
/// # Examples
/// ```
/// # use nanospan::{Duration, DurationError};
/// let d = Duration::new(0, -1);
/// assert!(matches!(d, Err(DurationError::OutOfRange)));
///
/// let d = Duration::from_nanos(i64::MAX) + Duration::EPSILON;
/// assert!(matches!(d.to_nanos(), Err(DurationError::Overflow)));
///
/// let d = Duration::EPSILON.checked_div(0);
/// assert!(matches!(d, Err(DurationError::DivideByZero)));
/// ```
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DurationError {
    /// The nanosecond-of-day component was outside `[0, NANOS_PER_DAY)`.
    #[error("nanosecond-of-day component out of range")]
    OutOfRange,

    /// The exact value does not fit in the target representation.
    #[error("duration does not fit in the target representation")]
    Overflow,

    /// The divisor was zero.
    #[error("cannot divide a duration by zero")]
    DivideByZero,
}

type Error = DurationError;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 86_400;

// Bounds for the fixed-width multiplication shortcut. A duration within
// ±100 days is below 8.64e15 nanoseconds; times a scalar of at most 1024
// the product stays below 8.85e18, inside `i64`.
const FAST_MULTIPLY_MAX_DAYS: i64 = 100;
const FAST_MULTIPLY_MAX_SCALAR: u64 = 1024;

impl Duration {
    /// Number of nanoseconds in a day.
    pub const NANOS_PER_DAY: i64 = SECONDS_PER_DAY * NANOS_PER_SECOND;

    /// The empty span. Additive identity for all durations.
    pub const ZERO: Duration = Duration {
        days: 0,
        nanos_of_day: 0,
    };

    /// The smallest positive duration, one nanosecond.
    pub const EPSILON: Duration = Duration {
        days: 0,
        nanos_of_day: 1,
    };

    /// The most negative representable duration.
    pub const MIN: Duration = Duration {
        days: i64::MIN,
        nanos_of_day: 0,
    };

    /// The most positive representable duration.
    pub const MAX: Duration = Duration {
        days: i64::MAX,
        nanos_of_day: Self::NANOS_PER_DAY - 1,
    };

    /// Creates a [Duration] from a day and nanosecond-of-day pair.
    ///
    /// The pair is taken as-is, not normalized: `nanos_of_day` must already
    /// be in `[0, NANOS_PER_DAY)` or the function returns
    /// [OutOfRange][DurationError::OutOfRange]. Use
    /// [from_nanos][Duration::from_nanos] when the input is a plain
    /// nanosecond count of either sign.
    ///
    /// # Examples
    /// ```
    /// # use nanospan::{Duration, DurationError};
    /// let d = Duration::new(-1, Duration::NANOS_PER_DAY - 1)?;
    /// assert_eq!(d, Duration::from_nanos(-1));
    ///
    /// let d = Duration::new(0, Duration::NANOS_PER_DAY);
    /// assert!(matches!(d, Err(DurationError::OutOfRange)));
    /// # Ok::<(), DurationError>(())
    /// ```
    pub fn new(days: i64, nanos_of_day: i64) -> Result<Self, Error> {
        if !(0..Self::NANOS_PER_DAY).contains(&nanos_of_day) {
            return Err(Error::OutOfRange);
        }
        Ok(Self { days, nanos_of_day })
    }

    /// Creates a [Duration] from a signed count of nanoseconds.
    ///
    /// Never fails; the count is split into days and nanosecond-of-day with
    /// floor division.
    ///
    /// # Examples
    /// ```
    /// # use nanospan::Duration;
    /// let d = Duration::from_nanos(-1);
    /// assert_eq!(d.days(), -1);
    /// assert_eq!(d.nanos_of_day(), Duration::NANOS_PER_DAY - 1);
    /// ```
    pub fn from_nanos(nanos: i64) -> Self {
        Self::from_nanos_i128(nanos as i128)
    }

    /// Creates a [Duration] from an arbitrary-precision count of nanoseconds.
    ///
    /// Fails with [Overflow][DurationError::Overflow] only when the day
    /// component of the normalized value does not fit in `i64`, which is
    /// several million millennia either way.
    ///
    /// # Examples
    /// ```
    /// # use nanospan::{Duration, DurationError};
    /// use num_bigint::BigInt;
    /// let nanos = BigInt::from(i64::MAX) + 1;
    /// let d = Duration::from_big_nanos(&nanos)?;
    /// assert!(matches!(d.to_nanos(), Err(DurationError::Overflow)));
    /// assert_eq!(d.to_big_nanos(), nanos);
    /// # Ok::<(), DurationError>(())
    /// ```
    pub fn from_big_nanos(nanos: &BigInt) -> Result<Self, Error> {
        let divisor = BigInt::from(Self::NANOS_PER_DAY);
        let mut days = nanos / &divisor;
        let mut nanos_of_day = nanos % &divisor;
        if nanos_of_day.is_negative() {
            days -= 1;
            nanos_of_day += &divisor;
        }
        let days = days.to_i64().ok_or(Error::Overflow)?;
        let nanos_of_day = nanos_of_day.to_i64().ok_or(Error::Overflow)?;
        Ok(Self { days, nanos_of_day })
    }

    /// Creates a [Duration] of a whole number of days.
    pub fn from_days(days: i64) -> Self {
        Self {
            days,
            nanos_of_day: 0,
        }
    }

    /// Creates a [Duration] of a whole number of hours.
    pub fn from_hours(hours: i64) -> Self {
        Self::from_unit_count(hours, NANOS_PER_HOUR)
    }

    /// Creates a [Duration] of a whole number of minutes.
    pub fn from_minutes(minutes: i64) -> Self {
        Self::from_unit_count(minutes, NANOS_PER_MINUTE)
    }

    /// Creates a [Duration] of a whole number of seconds.
    pub fn from_seconds(seconds: i64) -> Self {
        Self::from_unit_count(seconds, NANOS_PER_SECOND)
    }

    /// Creates a [Duration] of a whole number of milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        Self::from_unit_count(millis, NANOS_PER_MILLI)
    }

    /// Creates a [Duration] of a whole number of microseconds.
    pub fn from_micros(micros: i64) -> Self {
        Self::from_unit_count(micros, NANOS_PER_MICRO)
    }

    // All unit factories normalize through here so every entry point shares
    // one floor-division split. `nanos_per_unit` divides NANOS_PER_DAY, so
    // the day component cannot exceed the unit count in magnitude.
    fn from_unit_count(count: i64, nanos_per_unit: i64) -> Self {
        Self::from_nanos_i128(count as i128 * nanos_per_unit as i128)
    }

    // The shared normalization routine. Callers guarantee the day component
    // of `nanos` fits in i64.
    fn from_nanos_i128(nanos: i128) -> Self {
        const DAY: i128 = Duration::NANOS_PER_DAY as i128;
        Self {
            days: nanos.div_euclid(DAY) as i64,
            nanos_of_day: nanos.rem_euclid(DAY) as i64,
        }
    }

    /// Returns the whole-day component of the floor-division split.
    ///
    /// Negative durations have a negative day component even when they are
    /// shorter than a day: `Duration::from_nanos(-1).days()` is `-1`.
    pub fn days(&self) -> i64 {
        self.days
    }

    /// Returns the nanosecond-of-day component, always in
    /// `[0, NANOS_PER_DAY)`.
    pub fn nanos_of_day(&self) -> i64 {
        self.nanos_of_day
    }

    /// Returns the exact value as a count of nanoseconds.
    ///
    /// Fails with [Overflow][DurationError::Overflow] when the exact value
    /// does not fit in `i64`. The boundary is exact: `i64::MIN` and
    /// `i64::MAX` nanoseconds convert successfully, one nanosecond beyond
    /// either does not.
    ///
    /// # Examples
    /// ```
    /// # use nanospan::{Duration, DurationError};
    /// assert_eq!(Duration::from_nanos(i64::MAX).to_nanos()?, i64::MAX);
    ///
    /// let d = Duration::from_nanos(i64::MAX) + Duration::EPSILON;
    /// assert!(matches!(d.to_nanos(), Err(DurationError::Overflow)));
    /// # Ok::<(), DurationError>(())
    /// ```
    pub fn to_nanos(&self) -> Result<i64, Error> {
        let total = self.days as i128 * Self::NANOS_PER_DAY as i128 + self.nanos_of_day as i128;
        i64::try_from(total).map_err(|_| Error::Overflow)
    }

    /// Returns the exact value as an arbitrary-precision count of
    /// nanoseconds. Never fails; this is the ground truth the fixed-width
    /// arithmetic shortcuts are verified against.
    pub fn to_big_nanos(&self) -> BigInt {
        BigInt::from(self.days) * Self::NANOS_PER_DAY + self.nanos_of_day
    }

    /// Returns true if [to_nanos][Duration::to_nanos] would succeed.
    pub fn is_i64_representable(&self) -> bool {
        self.to_nanos().is_ok()
    }

    /// Exact sum, or `None` when the day component overflows `i64`.
    ///
    /// # Examples
    /// ```
    /// # use nanospan::Duration;
    /// let d = Duration::from_nanos(3_000_000);
    /// assert_eq!(d.checked_add(Duration::EPSILON), Some(Duration::from_nanos(3_000_001)));
    /// assert_eq!(Duration::MAX.checked_add(Duration::EPSILON), None);
    /// ```
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        // Each operand is below NANOS_PER_DAY, so the sum stays well inside
        // i64 and carries at most one day.
        let mut nanos_of_day = self.nanos_of_day + rhs.nanos_of_day;
        let mut carry = 0;
        if nanos_of_day >= Self::NANOS_PER_DAY {
            nanos_of_day -= Self::NANOS_PER_DAY;
            carry = 1;
        }
        let days = self.days.checked_add(rhs.days)?.checked_add(carry)?;
        Some(Self { days, nanos_of_day })
    }

    /// Exact difference, defined as `self + (-rhs)`.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.checked_add(rhs.checked_neg()?)
    }

    /// Exact arithmetic negation: `d.checked_neg()` added to `d` is
    /// [ZERO][Duration::ZERO] whenever it exists. `None` only for
    /// [MIN][Duration::MIN].
    pub fn checked_neg(self) -> Option<Self> {
        if self.nanos_of_day == 0 {
            return Some(Self {
                days: self.days.checked_neg()?,
                nanos_of_day: 0,
            });
        }
        Some(Self {
            days: self.days.checked_neg()?.checked_sub(1)?,
            nanos_of_day: Self::NANOS_PER_DAY - self.nanos_of_day,
        })
    }

    /// Exact product with an integer scalar, or `None` when the result is
    /// out of range.
    ///
    /// Small operands (within ±100 days, scalar magnitude at most 1024) take
    /// a pure `i64` shortcut; everything else multiplies the exact
    /// nanosecond value at arbitrary precision. Both paths produce identical
    /// results wherever the shortcut applies.
    ///
    /// # Examples
    /// ```
    /// # use nanospan::Duration;
    /// let d = Duration::from_seconds(3);
    /// assert_eq!(d.checked_mul(1000), Some(Duration::from_seconds(3000)));
    /// assert_eq!(d.checked_mul(0), Some(Duration::ZERO));
    /// assert_eq!(Duration::MAX.checked_mul(2), None);
    /// ```
    pub fn checked_mul(self, scalar: i64) -> Option<Self> {
        if scalar == 0 || self == Self::ZERO {
            return Some(Self::ZERO);
        }
        if self.fits_fast_multiply(scalar) {
            let total = self.days * Self::NANOS_PER_DAY + self.nanos_of_day;
            return Some(Self::from_nanos(total * scalar));
        }
        Self::from_big_nanos(&(self.to_big_nanos() * scalar)).ok()
    }

    // The shortcut predicate: the duration lies strictly inside
    // ±FAST_MULTIPLY_MAX_DAYS days and the scalar magnitude is at most
    // FAST_MULTIPLY_MAX_SCALAR. Within these bounds the nanosecond total is
    // below 8.64e15 and the product below 8.85e18 < i64::MAX, so the fast
    // path in `checked_mul` cannot overflow.
    fn fits_fast_multiply(&self, scalar: i64) -> bool {
        (-FAST_MULTIPLY_MAX_DAYS..FAST_MULTIPLY_MAX_DAYS).contains(&self.days)
            && scalar.unsigned_abs() <= FAST_MULTIPLY_MAX_SCALAR
    }

    /// Exact quotient with an integer scalar, truncated toward zero.
    ///
    /// Fails with [DivideByZero][DurationError::DivideByZero] when `scalar`
    /// is zero, before any other computation. Truncation is symmetric in
    /// sign: `d / s` and `d / -s` are exact negatives of one another. The
    /// only [Overflow][DurationError::Overflow] case is negating
    /// [MIN][Duration::MIN] with `scalar == -1`.
    ///
    /// # Examples
    /// ```
    /// # use nanospan::{Duration, DurationError};
    /// let d = Duration::from_nanos(3_000_000);
    /// assert_eq!(d.checked_div(3000)?, Duration::from_nanos(1000));
    /// assert_eq!(d.checked_div(2_000_000)?, Duration::from_nanos(1));
    /// assert_eq!(d.checked_div(-2_000_000)?, Duration::from_nanos(-1));
    /// assert!(matches!(d.checked_div(0), Err(DurationError::DivideByZero)));
    /// # Ok::<(), DurationError>(())
    /// ```
    pub fn checked_div(self, scalar: i64) -> Result<Self, Error> {
        if scalar == 0 {
            return Err(Error::DivideByZero);
        }
        if let Ok(total) = self.to_nanos() {
            // i64 division truncates toward zero; the only non-representable
            // quotient is i64::MIN / -1, which falls through to the general
            // path below.
            if let Some(quotient) = total.checked_div(scalar) {
                return Ok(Self::from_nanos(quotient));
            }
        }
        Self::from_big_nanos(&(self.to_big_nanos() / scalar))
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        self.checked_add(rhs)
            .expect("`Duration + Duration` overflowed")
    }
}

impl std::ops::AddAssign for Duration {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        self.checked_sub(rhs)
            .expect("`Duration - Duration` overflowed")
    }
}

impl std::ops::SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Duration) {
        *self = *self - rhs;
    }
}

impl std::ops::Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        self.checked_neg().expect("`-Duration` overflowed")
    }
}

impl std::ops::Mul<i64> for Duration {
    type Output = Duration;

    fn mul(self, rhs: i64) -> Duration {
        self.checked_mul(rhs).expect("`Duration * i64` overflowed")
    }
}

/// Scalar multiplication is commutative; `s * d` is the same operation as
/// `d * s`.
impl std::ops::Mul<Duration> for i64 {
    type Output = Duration;

    fn mul(self, rhs: Duration) -> Duration {
        rhs * self
    }
}

impl std::ops::Div<i64> for Duration {
    type Output = Duration;

    fn div(self, rhs: i64) -> Duration {
        self.checked_div(rhs)
            .unwrap_or_else(|err| panic!("`Duration / i64` failed: {err}"))
    }
}

/// Convert from [std::time::Duration] to [Duration].
///
/// Always succeeds; the full `std::time::Duration` range is representable.
///
/// # Examples
/// ```
/// # use nanospan::Duration;
/// let d = Duration::from(std::time::Duration::from_secs(123));
/// assert_eq!(d, Duration::from_seconds(123));
/// ```
impl From<std::time::Duration> for Duration {
    fn from(value: std::time::Duration) -> Self {
        let nanos =
            value.as_secs() as i128 * NANOS_PER_SECOND as i128 + value.subsec_nanos() as i128;
        Self::from_nanos_i128(nanos)
    }
}

/// Convert from [Duration] to [std::time::Duration].
///
/// Returns an error if `value` is negative, as `std::time::Duration` cannot
/// represent negative durations.
///
/// # Examples
/// ```
/// # use nanospan::{Duration, DurationError};
/// let d = std::time::Duration::try_from(Duration::from_seconds(12))?;
/// assert_eq!(d.as_secs(), 12);
///
/// let d = std::time::Duration::try_from(Duration::from_seconds(-12));
/// assert!(matches!(d, Err(DurationError::OutOfRange)));
/// # Ok::<(), DurationError>(())
/// ```
impl TryFrom<Duration> for std::time::Duration {
    type Error = DurationError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        if value.days < 0 {
            return Err(Error::OutOfRange);
        }
        let seconds = (value.days as u64)
            .checked_mul(SECONDS_PER_DAY as u64)
            .and_then(|s| s.checked_add((value.nanos_of_day / NANOS_PER_SECOND) as u64))
            .ok_or(Error::Overflow)?;
        Ok(Self::new(
            seconds,
            (value.nanos_of_day % NANOS_PER_SECOND) as u32,
        ))
    }
}

/// Implement [`serde`](::serde) serialization for [Duration].
///
/// The codec is the decimal string of the exact nanosecond count. A string
/// rather than a JSON number, because the exact value may exceed what JSON
/// readers preserve in a number.
impl serde::ser::Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        self.to_big_nanos().to_string().serialize(serializer)
    }
}

struct DurationVisitor;

impl serde::de::Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string with a whole number of nanoseconds")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let nanos = value.parse::<BigInt>().map_err(E::custom)?;
        Duration::from_big_nanos(&nanos).map_err(E::custom)
    }
}

/// Implement [`serde`](::serde) deserialization for [Duration].
impl<'de> serde::de::Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(DurationVisitor)
    }
}
