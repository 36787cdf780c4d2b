//! Data model for the locus graph engine.
//!
//! Split by origin: `request` types arrive with a query, `graph` and `table`
//! types are read out of the association store, `annotation` types come from
//! the external annotation source.

mod annotation;
mod graph;
mod request;
mod table;

pub use annotation::{CanonicalTranscript, Exon, GeneAnnotation, VariantLocation};
pub use graph::{
    Disease, G2vEvidence, Gene, GeneVariantEdge, GwasStats, LeadVariant, LeadVariantDiseaseEdge,
    LocusGraph, SearchHit, Variant, VariantLeadVariantEdge, VariantLocationInfo,
};
pub use request::{
    DiseaseTableQuery, FilterSpec, Interval, LocusQuery, LocusTableQuery, Selection, SelectionType,
};
pub use table::{AssociationRow, TableView};
