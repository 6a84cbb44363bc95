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

use docket_bnb::query::QueryError;
use docket_model::error::ModelError;

/// Errors of the compute-suggestions action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectioningError {
    /// The student has no primary request at all.
    EmptyCourseRequest,
    /// The selected class or free time matches none of the student's
    /// requests.
    UnknownSelection,
    /// The suggestion query violates its contract.
    Query(QueryError),
    /// The catalogue or the student is malformed.
    Model(ModelError),
}

impl std::fmt::Display for SectioningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCourseRequest => write!(f, "No course requested"),
            Self::UnknownSelection => {
                write!(f, "The selected class does not belong to any request")
            }
            Self::Query(e) => write!(f, "Invalid suggestion query: {}", e),
            Self::Model(e) => write!(f, "Invalid model: {}", e),
        }
    }
}

impl std::error::Error for SectioningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Query(e) => Some(e),
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<QueryError> for SectioningError {
    fn from(e: QueryError) -> Self {
        SectioningError::Query(e)
    }
}

impl From<ModelError> for SectioningError {
    fn from(e: ModelError) -> Self {
        SectioningError::Model(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_model::index::RequestIndex;
    use std::error::Error;

    #[test]
    fn test_wrapped_errors_expose_their_source() {
        let e: SectioningError = QueryError::UnknownRequest(RequestIndex::new(3)).into();
        assert!(e.source().is_some());
        assert!(format!("{}", e).starts_with("Invalid suggestion query"));

        let e: SectioningError = ModelError::EmptyCourseRequest { request_id: 9 }.into();
        assert_eq!(
            format!("{}", e),
            "Invalid model: Course request 9 lists no courses"
        );
        assert!(SectioningError::EmptyCourseRequest.source().is_none());
    }
}
