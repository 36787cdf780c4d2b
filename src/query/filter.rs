//! Filter compilation: evidence filters into SQL-agnostic predicates.
//!
//! Malformed input is rejected here, before any SQL exists. The GWAS
//! significance range arrives in -log10 units and is inverted into raw
//! probability space: `[a, b]` becomes `[10^-b, 10^-a]`, both bounds
//! inclusive.

use crate::error::FilterError;
use crate::models::FilterSpec;

/// Evidence columns that can be required present (`> 0`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EvidenceField {
    G2vScore,
    Vep,
    Gtex,
    Pchic,
    Fantom5,
    Dhs,
    Nearest,
}

impl EvidenceField {
    /// Case-insensitive parse of an evidence field name as supplied by
    /// clients ("GTEx", "vep", ...). Unknown names are an error, never a
    /// silent no-op.
    pub fn from_name(name: &str) -> Result<Self, FilterError> {
        let field = match name.to_ascii_lowercase().as_str() {
            "g2vscore" | "otg2vscore" => EvidenceField::G2vScore,
            "vep" => EvidenceField::Vep,
            "gtex" => EvidenceField::Gtex,
            "pchic" => EvidenceField::Pchic,
            "fantom5" => EvidenceField::Fantom5,
            "dhs" => EvidenceField::Dhs,
            "nearest" => EvidenceField::Nearest,
            _ => return Err(FilterError::UnknownEvidenceField(name.to_string())),
        };
        Ok(field)
    }
}

/// Numeric columns a range predicate can target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RangeField {
    G2vScore,
    R2,
    GwasPValue,
}

/// One SQL-agnostic predicate fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field > 0`
    Positive(EvidenceField),
    /// `field >= lo AND field <= hi`
    RangeInclusive {
        field: RangeField,
        lo: f64,
        hi: f64,
    },
}

fn validate_range(field: &'static str, bounds: &[f64]) -> Result<(f64, f64), FilterError> {
    if bounds.len() != 2 {
        return Err(FilterError::MalformedRange {
            field,
            len: bounds.len(),
        });
    }
    if !bounds[0].is_finite() || !bounds[1].is_finite() {
        return Err(FilterError::NonFiniteRange { field });
    }
    Ok((bounds[0], bounds[1]))
}

/// Compile a filter specification into an ordered predicate list.
pub fn compile_filters(spec: &FilterSpec) -> Result<Vec<Predicate>, FilterError> {
    let mut predicates = Vec::new();

    for name in &spec.must_have_evidence {
        predicates.push(Predicate::Positive(EvidenceField::from_name(name)?));
    }

    if let Some(bounds) = &spec.g2v_score_range {
        let (lo, hi) = validate_range("g2vScoreRange", bounds)?;
        predicates.push(Predicate::RangeInclusive {
            field: RangeField::G2vScore,
            lo,
            hi,
        });
    }

    if let Some(bounds) = &spec.r2_range {
        let (lo, hi) = validate_range("r2Range", bounds)?;
        predicates.push(Predicate::RangeInclusive {
            field: RangeField::R2,
            lo,
            hi,
        });
    }

    if let Some(bounds) = &spec.gwas_significance_range {
        let (lo, hi) = validate_range("gwasSignificanceRange", bounds)?;
        // -log10 units invert: the upper significance bound becomes the lower
        // p-value bound.
        predicates.push(Predicate::RangeInclusive {
            field: RangeField::GwasPValue,
            lo: 10f64.powf(-hi),
            hi: 10f64.powf(-lo),
        });
    }

    Ok(predicates)
}
