//! WHERE-clause composition over a parameterized query builder.
//!
//! Two predicate variants share the same bound interval values:
//! - the unfiltered variant (no evidence predicates) gates node existence,
//! - the filtered variant (all compiled predicates) gates edge existence.
//!
//! Evidence filters therefore never affect node visibility. Every
//! user-supplied value goes through `push_bind`; only mapping constants are
//! interpolated into the SQL text.

use sqlx::{QueryBuilder, Sqlite};

use crate::models::Interval;
use crate::query::filter::Predicate;
use crate::query::mapping::TableMapping;

/// Append the locus WHERE clause: common validity, the given evidence
/// predicates, and the interval membership test (gene overlap OR variant in
/// window OR lead variant in window).
///
/// Rows missing gene bounds or the lead-variant position cannot be placed in
/// the interval test and are excluded from every query.
pub(crate) fn push_where_clause<'args>(
    qb: &mut QueryBuilder<'args, Sqlite>,
    mapping: &TableMapping,
    interval: &Interval,
    predicates: &[Predicate],
) {
    qb.push(" WHERE (")
        .push(mapping.gene_start)
        .push(" IS NOT NULL) AND (")
        .push(mapping.gene_end)
        .push(" IS NOT NULL) AND (")
        .push(mapping.lead_variant_position)
        .push(" IS NOT NULL)");

    for predicate in predicates {
        match predicate {
            Predicate::Positive(field) => {
                qb.push(" AND (")
                    .push(mapping.evidence_column(*field))
                    .push(" > 0)");
            }
            Predicate::RangeInclusive { field, lo, hi } => {
                let column = mapping.range_column(*field);
                qb.push(" AND (")
                    .push(column)
                    .push(" >= ")
                    .push_bind(*lo)
                    .push(") AND (")
                    .push(column)
                    .push(" <= ")
                    .push_bind(*hi)
                    .push(")");
            }
        }
    }

    qb.push(" AND ((")
        .push(mapping.gene_chromosome)
        .push(" = ")
        .push_bind(interval.chromosome.clone())
        .push(" AND ")
        .push(mapping.gene_start)
        .push(" <= ")
        .push_bind(interval.end)
        .push(" AND ")
        .push(mapping.gene_end)
        .push(" >= ")
        .push_bind(interval.start)
        .push(") OR (")
        .push(mapping.variant_chromosome)
        .push(" = ")
        .push_bind(interval.chromosome.clone())
        .push(" AND ")
        .push(mapping.variant_position)
        .push(" >= ")
        .push_bind(interval.start)
        .push(" AND ")
        .push(mapping.variant_position)
        .push(" <= ")
        .push_bind(interval.end)
        .push(") OR (")
        .push(mapping.lead_variant_chromosome)
        .push(" = ")
        .push_bind(interval.chromosome.clone())
        .push(" AND ")
        .push(mapping.lead_variant_position)
        .push(" >= ")
        .push_bind(interval.start)
        .push(" AND ")
        .push(mapping.lead_variant_position)
        .push(" <= ")
        .push_bind(interval.end)
        .push("))");
}

/// Append a `selected` tag column for a grouped query: true when any row in
/// the group matches every (column, value) key.
pub(crate) fn push_selected_tag<'args>(
    qb: &mut QueryBuilder<'args, Sqlite>,
    keys: &[(&'static str, String)],
) {
    qb.push(", COUNT(CASE WHEN ");
    for (i, (column, value)) in keys.iter().enumerate() {
        if i > 0 {
            qb.push(" AND ");
        }
        qb.push(*column).push(" = ").push_bind(value.clone());
    }
    qb.push(" THEN 1 END) > 0 AS selected");
}

/// Append bound equality predicates (table mode narrows rows to the
/// selection instead of tagging them).
pub(crate) fn push_selection_equality<'args>(
    qb: &mut QueryBuilder<'args, Sqlite>,
    keys: &[(&'static str, String)],
) {
    for (column, value) in keys {
        qb.push(" AND (")
            .push(*column)
            .push(" = ")
            .push_bind(value.clone())
            .push(")");
    }
}
