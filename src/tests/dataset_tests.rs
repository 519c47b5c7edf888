// src/tests/dataset_tests.rs

use crate::dataset::DatasetStore;
use crate::domain::filter::FilterCriteria;
use crate::domain::listing::ListingQuery;
use crate::domain::property::ListingType;
use crate::domain::summary::CitySummary;
use crate::errors::LoadError;
use crate::tests::utils::{fixture_store, write_dataset};
use rusqlite::Connection;

#[test]
fn zip_codes_keep_leading_zeros() {
    let store = fixture_store();

    let zips = store.distinct_zips("PR", "Adjuntas");
    assert_eq!(zips, vec!["00601".to_string()]);

    let row = store
        .rows()
        .iter()
        .find(|r| r.city.as_deref() == Some("Adjuntas"))
        .unwrap();
    assert_eq!(row.zip.as_deref(), Some("00601"));
}

#[test]
fn rows_without_location_are_kept_but_not_navigable() {
    let store = fixture_store();

    assert_eq!(store.rows().len(), 7);
    assert_eq!(store.distinct_states(), vec!["IL", "PR", "TX"]);
    assert!(store.distinct_home_types().contains(&"Condo".to_string()));

    let orphan = store
        .rows()
        .iter()
        .find(|r| r.address == "15 Orphan Ln")
        .unwrap();
    assert!(!orphan.is_navigable());
}

#[test]
fn distinct_lists_are_sorted() {
    let store = fixture_store();

    assert_eq!(store.distinct_cities("IL"), vec!["Chicago"]);
    assert_eq!(store.distinct_zips("IL", "Chicago"), vec!["60601", "60614"]);
    assert_eq!(
        store.distinct_home_types(),
        vec!["Apartment", "Condo", "Single Family", "Townhouse"]
    );
    assert_eq!(
        store.distinct_listing_types(),
        vec![ListingType::Buy, ListingType::Rent]
    );
    assert!(store.distinct_cities("ZZ").is_empty());
}

#[test]
fn filter_and_summary_run_over_the_store() {
    let store = fixture_store();

    let criteria = FilterCriteria {
        state: "IL".to_string(),
        city: "Chicago".to_string(),
        zip: None,
        price_min: 200_000.0,
        price_max: 1_000_000.0,
        min_bedrooms: 2,
        home_type: None,
        listing_type: Some(ListingType::Buy),
    };
    let found = store.filter(&criteria);
    assert_eq!(found.len(), 3);

    match store.summarize("chicago") {
        CitySummary::Listings(stats) => {
            assert_eq!(stats.listing_count, 4);
            assert_eq!(stats.price_min, 2_400.0);
            assert_eq!(stats.price_max, 850_000.0);
        }
        other => panic!("expected stats, got {other:?}"),
    }

    assert!(matches!(
        store.summarize("Springfield"),
        CitySummary::NoListings { .. }
    ));
}

#[test]
fn listings_go_through_the_store_filter() {
    let store = fixture_store();

    let query = ListingQuery {
        criteria: FilterCriteria {
            state: "IL".to_string(),
            city: "Chicago".to_string(),
            zip: Some("60614".to_string()),
            price_min: 0.0,
            price_max: 1_000_000.0,
            min_bedrooms: 2,
            home_type: None,
            listing_type: None,
        },
        limit: 1,
    };

    let view = store.listings(&query);
    assert_eq!(view.total, store.filter(&query.criteria).len());
    assert_eq!(view.total, 2);
    assert_eq!(view.listings.len(), 1);
    assert_eq!(view.listings[0].address, "77 Halsted St");
    assert_eq!(view.mean_price_by_home_type.len(), 2);
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DatasetStore::load(dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Missing { .. }));
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listings.xlsx");
    std::fs::write(&path, "whatever").unwrap();
    let err = DatasetStore::load(&path).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
}

#[test]
fn missing_required_column_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, "Address,City,State\n1 Elm St,Chicago,IL\n").unwrap();

    match DatasetStore::load(&path).unwrap_err() {
        LoadError::MissingColumns { columns } => assert!(columns.contains(&"Price".to_string())),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn loads_the_same_table_from_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listings.sqlite");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE real_estate (
            Address TEXT, City TEXT, State TEXT, Correct_ZipCode INTEGER,
            RentOrBuy TEXT, HomeType TEXT, Price REAL, Size REAL, Bedrooms INTEGER,
            WalkScore REAL
        );
        INSERT INTO real_estate VALUES
            ('1 Plaza Rd', 'Adjuntas', 'PR', 601, 'Buy', 'Single Family', 210000, 1500, 3, 41.5),
            ('12 Lake St', 'Chicago', 'IL', 60601, 'Rent', 'Condo', 2100.0, 700, 1, NULL);
        "#,
    )
    .unwrap();
    drop(conn);

    let store = DatasetStore::load(&path).unwrap();
    assert_eq!(store.rows().len(), 2);
    assert_eq!(store.distinct_zips("PR", "Adjuntas"), vec!["00601"]);
    assert_eq!(store.rows()[0].walk_score, Some(41.5));
    assert_eq!(store.rows()[1].walk_score, None);
    assert_eq!(store.rows()[1].listing_type, ListingType::Rent);
}

#[test]
fn csv_fixture_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path());
    let store = DatasetStore::load(&path).unwrap();
    let condo = &store.rows()[0];
    assert_eq!(condo.bathrooms, Some(1.5));
    assert_eq!(condo.has_pool, Some(false));
    assert_eq!(condo.year_built, Some(2004));
}
