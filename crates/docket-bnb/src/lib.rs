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

//! Docket-BnB: branch-and-bound suggestion search
//!
//! Given a student's current schedule and one request the student wants to
//! change, this crate finds the best few complete alternative schedules. The
//! search is exact within its deadline: when it finishes, the returned
//! suggestions are the K cheapest ones under the configured cost weights.
//!
//! Core flow
//! - Build a `docket_model::model::SchedulingModel` and a `Student`.
//! - Describe the change with a `query::SuggestionQuery` (selected request,
//!   required and preferred sections).
//! - Pick a `config::SearchConfig`.
//! - Call `bnb::compute_suggestions`, or keep a `bnb::SuggestionSolver`
//!   around to reuse its allocations.
//!
//! Design highlights
//! - Values are enumerated once per call (`candidates`) and filtered into a
//!   per-request domain (`plan`); the engine only checks conflicts with the
//!   values already placed.
//! - State is mutated in place and restored through a trail.
//! - The frontier ranks by cost, then by a key of external identifiers, so
//!   the result never depends on the order of discovery.
//! - The deadline is the only cancellation; a timeout returns what was found.
//!
//! Module map
//! - `bnb`: the solver engine and its search session.
//! - `branching`: decision builders (exploration order).
//! - `candidates`: enumeration of enrollments per request.
//! - `conflict`: time, distance and capacity checks.
//! - `eval`: penalty and cost computation.
//! - `frontier`: the bounded ordered set of best suggestions.
//! - `governor`: the wall-clock deadline.
//! - `monitor`: tree-search monitors (log, composite, no-op).
//! - `plan`: request order, domains and remaining-cost bounds.
//! - `query` / `config`: call inputs.
//! - `result` / `stats`: outcomes and counters.

pub mod bnb;
pub mod branching;
pub mod candidates;
pub mod config;
pub mod conflict;
pub mod eval;
pub mod frontier;
pub mod governor;
pub mod monitor;
pub mod plan;
pub mod query;
pub mod result;
mod stack;
pub mod state;
pub mod stats;
mod trail;
