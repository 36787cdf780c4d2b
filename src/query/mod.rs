//! Query composition: filters, selection tagging, predicate building, and
//! the per-request context shared by every query of a resolution.

pub mod filter;
pub mod mapping;
pub(crate) mod predicate;
pub mod selection;

pub use filter::{compile_filters, EvidenceField, Predicate, RangeField};
pub use mapping::TableMapping;
pub use selection::SelectionTag;

use crate::error::FilterError;
use crate::models::{FilterSpec, Interval, Selection};

/// Everything the query runners need for one request: the validated
/// interval, the compiled evidence predicates, and the resolved selection.
///
/// Node queries see no evidence predicates; edge queries see all of them.
/// Both bind the same interval values.
#[derive(Debug, Clone)]
pub struct LocusQueryContext {
    pub(crate) interval: Interval,
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) tag: Option<SelectionTag>,
}

impl LocusQueryContext {
    /// Validate and compile the request inputs. Any malformed filter,
    /// selection, or interval fails here, before a query is issued.
    pub fn new(
        interval: &Interval,
        filters: &FilterSpec,
        selection: Option<&Selection>,
    ) -> Result<Self, FilterError> {
        interval.validate()?;
        let predicates = compile_filters(filters)?;
        let tag = selection.map(Selection::tag).transpose()?;
        Ok(Self {
            interval: interval.clone(),
            predicates,
            tag,
        })
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Predicates for node-set queries: always empty, so unselected nodes
    /// stay visible as context when filters tighten.
    pub(crate) fn node_filters(&self) -> &[Predicate] {
        &[]
    }

    /// Predicates for edge-set queries.
    pub(crate) fn edge_filters(&self) -> &[Predicate] {
        &self.predicates
    }
}
