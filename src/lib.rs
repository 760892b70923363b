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

//! Exact signed time spans at nanosecond resolution.
//!
//! The crate provides a single value type, [Duration], which represents a
//! signed span of time as an exact count of nanoseconds over a range spanning
//! millions of years. Addition, subtraction, negation, scalar multiplication,
//! and scalar division are all exact: wherever a fixed-width shortcut is
//! used, it is provably equivalent to the arbitrary-precision reference
//! computation, and results that do not fit are reported rather than wrapped.
//!
//! `Duration` is a `Copy` value with no interior state; all operations are
//! pure and safe to call concurrently without coordination.

mod duration;
pub use crate::duration::*;
