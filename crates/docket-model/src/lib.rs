// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Docket Model
//!
//! **The domain model of a single-student schedule change.**
//!
//! This crate defines the data a suggestion run consumes and produces. It is
//! the interchange layer between the caller that knows the student's current
//! schedule and the search engine in `docket_bnb`.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed indices (`RequestIndex`, `CourseIndex`,
//!   `SubpartIndex`, `SectionIndex`).
//! * **`time`**: Weekly meeting patterns in 5-minute slots, with overlap and
//!   gap arithmetic.
//! * **`location`**: Room coordinates and the `DistanceMetric` that turns
//!   them into meters.
//! * **`model`**: The immutable `SchedulingModel` catalogue (courses, subparts,
//!   sections) and the validating `ModelBuilder`.
//! * **`request`**: The `Student` and its ordered `Request`s, a sum type over
//!   course requests and free-time requests.
//! * **`enrollment`**: The value chosen for one request.
//! * **`suggestion`**: A complete alternative schedule with its `Cost` and
//!   penalty breakdown.
//! * **`cost`**: A totally ordered, non-negative cost.
//! * **`error`**: `ModelError`.

pub mod cost;
pub mod enrollment;
pub mod error;
pub mod index;
pub mod location;
pub mod model;
pub mod request;
pub mod suggestion;
pub mod time;
