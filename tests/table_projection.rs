//! Flat table projections: pagination, totals, and the disease-scoped view.

mod common;

use std::sync::Arc;

use common::{create_schema, memory_pool, service_with, FixtureRow, MockAnnotations};
use locus_graph::{
    DiseaseTableQuery, FilterError, FilterSpec, Interval, LocusError, LocusService,
    LocusTableQuery, Selection, SelectionType,
};

fn window() -> Interval {
    Interval::new("1", 100_000, 200_000)
}

fn table_query(offset: i64, limit: i64) -> LocusTableQuery {
    LocusTableQuery {
        interval: window(),
        filters: FilterSpec::default(),
        selection: None,
        offset,
        limit,
    }
}

/// Five in-window rows over two genes and two diseases.
async fn seeded_service() -> LocusService {
    let pool = memory_pool().await;
    create_schema(&pool).await;

    for (variant, position, r2) in [
        ("rs1", 150_100, 0.9),
        ("rs2", 150_200, 0.8),
        ("rs3", 150_300, 0.4),
    ] {
        FixtureRow {
            variant_id: variant,
            variant_position: position,
            r2,
            ..FixtureRow::default()
        }
        .insert(&pool)
        .await;
    }
    for (variant, position) in [("rs4", 171_100), ("rs5", 171_200)] {
        FixtureRow {
            gene_id: "ENSG0000002",
            gene_symbol: "XYZ2",
            gene_tss: 171_000,
            gene_start: 170_000,
            gene_end: 190_000,
            variant_id: variant,
            variant_position: position,
            disease_id: "EFO_0000002",
            disease_name: "Disease Two",
            r2: 0.7,
            ..FixtureRow::default()
        }
        .insert(&pool)
        .await;
    }

    service_with(pool, Arc::new(MockAnnotations::new()))
}

#[tokio::test]
async fn pagination_bounds_rows_and_total_is_stable() {
    let service = seeded_service().await;

    let first = service.locus_table(&table_query(0, 2)).await.unwrap();
    assert_eq!(first.rows.len(), 2);
    assert_eq!(first.total, 5);
    assert_eq!(first.offset, 0);
    assert_eq!(first.limit, 2);

    let last = service.locus_table(&table_query(4, 2)).await.unwrap();
    assert_eq!(last.rows.len(), 1);
    assert_eq!(last.total, 5);

    let all = service.locus_table(&table_query(0, 100)).await.unwrap();
    assert_eq!(all.rows.len(), 5);
    assert_eq!(all.total, 5);

    // total must not depend on offset/limit
    assert_eq!(first.total, last.total);
    assert_eq!(first.total, all.total);
}

#[tokio::test]
async fn rows_carry_the_full_association_shape() {
    let service = seeded_service().await;
    let view = service.locus_table(&table_query(0, 1)).await.unwrap();

    let row = &view.rows[0];
    assert_eq!(row.gene_id, "ENSG0000001");
    assert_eq!(row.gene_symbol, "ABC1");
    assert_eq!(row.gene_chromosome, "1");
    assert_eq!(row.gene_tss, 150_000);
    assert_eq!(row.variant_id, "rs1");
    assert_eq!(row.lead_variant_id, "rs100");
    assert_eq!(row.disease_id, "EFO_0000001");
    assert_eq!(row.g2v_score, 0.6);
    assert_eq!(row.gwas_p_value, 1e-8);
    assert_eq!(row.gwas_pmid.as_deref(), Some("21833088"));
    assert_eq!(row.gwas_size, Some(5_000));
}

#[tokio::test]
async fn filters_narrow_rows_and_total_together() {
    let service = seeded_service().await;
    let query = LocusTableQuery {
        filters: FilterSpec {
            r2_range: Some(vec![0.5, 1.0]),
            ..FilterSpec::default()
        },
        ..table_query(0, 100)
    };
    let view = service.locus_table(&query).await.unwrap();

    // rs3 (r2 = 0.4) drops out of both the page and the count.
    assert_eq!(view.rows.len(), 4);
    assert_eq!(view.total, 4);
    assert!(view.rows.iter().all(|row| row.r2 >= 0.5));
}

#[tokio::test]
async fn selection_narrows_table_rows() {
    let service = seeded_service().await;
    let query = LocusTableQuery {
        selection: Some(Selection {
            id: "ENSG0000002".to_string(),
            selection_type: SelectionType::Gene,
        }),
        ..table_query(0, 100)
    };
    let view = service.locus_table(&query).await.unwrap();

    assert_eq!(view.total, 2);
    assert!(view.rows.iter().all(|row| row.gene_id == "ENSG0000002"));

    let query = LocusTableQuery {
        selection: Some(Selection {
            id: "ENSG0000001-rs2".to_string(),
            selection_type: SelectionType::GeneVariant,
        }),
        ..table_query(0, 100)
    };
    let view = service.locus_table(&query).await.unwrap();
    assert_eq!(view.total, 1);
    assert_eq!(view.rows[0].variant_id, "rs2");
}

#[tokio::test]
async fn disease_table_scopes_by_disease_id() {
    let service = seeded_service().await;

    let view = service
        .disease_table(&DiseaseTableQuery {
            disease_id: "EFO_0000002".to_string(),
            offset: 0,
            limit: 100,
        })
        .await
        .unwrap();
    assert_eq!(view.total, 2);
    assert!(view.rows.iter().all(|row| row.disease_id == "EFO_0000002"));

    let page = service
        .disease_table(&DiseaseTableQuery {
            disease_id: "EFO_0000002".to_string(),
            offset: 1,
            limit: 100,
        })
        .await
        .unwrap();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.total, 2);

    let none = service
        .disease_table(&DiseaseTableQuery {
            disease_id: "EFO_404".to_string(),
            offset: 0,
            limit: 10,
        })
        .await
        .unwrap();
    assert!(none.rows.is_empty());
    assert_eq!(none.total, 0);
}

#[tokio::test]
async fn negative_pagination_is_rejected() {
    let service = seeded_service().await;

    let err = service.locus_table(&table_query(-1, 10)).await.unwrap_err();
    assert!(matches!(
        err,
        LocusError::Filter(FilterError::InvalidPagination { .. })
    ));

    let err = service
        .disease_table(&DiseaseTableQuery {
            disease_id: "EFO_0000001".to_string(),
            offset: 0,
            limit: -5,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LocusError::Filter(FilterError::InvalidPagination { .. })
    ));
}
