#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Repository integration tests against the real SQLite store.

mod common;

use common::{TestCatalogue, ids};
use emporium_catalogue::filter::{BoolFilter, Filter, FilterError, FilterList, StringFilter};
use emporium_catalogue::models::{
    PRODUCT_CATEGORY, Product, ProductFilterList, Review, Vendor, VendorFilterList, VendorRow,
};
use emporium_catalogue::repository::{DataType, Page, RepositoryError};
use emporium_catalogue::store::StoreError;
use emporium_test_utils::{link_category, test_category, test_product, test_vendor};

const A: &str = "a0000000000000000000000000000000";
const B: &str = "b0000000000000000000000000000000";
const C: &str = "c0000000000000000000000000000000";

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[tokio::test]
async fn results_are_ordered_by_primary_key() {
    let app = TestCatalogue::new().await;
    for (id, title) in [(C, "Gamma"), (A, "Alpha"), (B, "Beta")] {
        test_vendor(title).with_id(id).insert(&app.pool).await.unwrap();
    }

    let vendors: Vec<Vendor> = app
        .repository()
        .get_by_filter(&FilterList::default(), Page::all())
        .await
        .unwrap();

    assert_eq!(ids(&vendors), vec![A, B, C]);
}

#[tokio::test]
async fn contains_filter_matches_substring_case_insensitively() {
    let app = TestCatalogue::new().await;
    let city = test_vendor("https://fashioncity.com")
        .insert(&app.pool)
        .await
        .unwrap();
    test_vendor("www.true-fashion.com")
        .insert(&app.pool)
        .await
        .unwrap();

    for needle in ["city", "CITY"] {
        let filters = VendorFilterList {
            title: Some(StringFilter::contains(needle)),
            ..Default::default()
        };
        let vendors: Vec<Vendor> = app
            .repository()
            .get_by_filter(&filters.into(), Page::all())
            .await
            .unwrap();

        assert_eq!(ids(&vendors), vec![city.clone()], "needle {needle}");
        assert_eq!(vendors[0].title(), "https://fashioncity.com");
    }
}

#[tokio::test]
async fn contains_filter_escapes_like_wildcards() {
    let app = TestCatalogue::new().await;
    let percent = test_vendor("100% cotton").insert(&app.pool).await.unwrap();
    test_vendor("1000 cotton").insert(&app.pool).await.unwrap();

    let filters = FilterList::new(None).with("title", Some(Filter::contains("0%")));
    let vendors: Vec<Vendor> = app
        .repository()
        .get_by_filter(&filters, Page::all())
        .await
        .unwrap();

    assert_eq!(ids(&vendors), vec![percent]);
}

#[tokio::test]
async fn contains_filter_matches_non_ascii_titles() {
    let app = TestCatalogue::new().await;
    let fruit = test_vendor("Äpfel & Birnen").insert(&app.pool).await.unwrap();
    test_vendor("Apfelsaft").insert(&app.pool).await.unwrap();

    let filters = VendorFilterList {
        title: Some(StringFilter::contains("Äpfel")),
        ..Default::default()
    };
    let vendors: Vec<Vendor> = app
        .repository()
        .get_by_filter(&filters.into(), Page::all())
        .await
        .unwrap();

    assert_eq!(ids(&vendors), vec![fruit]);
}

#[tokio::test]
async fn active_false_and_unset_do_not_constrain() {
    let app = TestCatalogue::new().await;
    test_vendor("Active").with_id(A).insert(&app.pool).await.unwrap();
    test_vendor("Inactive")
        .with_id(B)
        .inactive()
        .insert(&app.pool)
        .await
        .unwrap();

    let only_active: Vec<Vendor> = app
        .repository()
        .get_by_filter(&FilterList::new(Some(BoolFilter::new(true))), Page::all())
        .await
        .unwrap();
    assert_eq!(ids(&only_active), vec![A]);

    for active in [Some(BoolFilter::new(false)), None] {
        let all: Vec<Vendor> = app
            .repository()
            .get_by_filter(&FilterList::new(active), Page::all())
            .await
            .unwrap();
        assert_eq!(ids(&all), vec![A, B], "active filter {active:?}");
    }
}

#[tokio::test]
async fn relation_filter_restricts_to_linked_rows() {
    let app = TestCatalogue::new().await;
    let kites = test_category("Kites").insert(&app.pool).await.unwrap();
    let boards = test_category("Boards").insert(&app.pool).await.unwrap();
    let kite = test_product("Kite").with_id(A).insert(&app.pool).await.unwrap();
    let board = test_product("Board").with_id(B).insert(&app.pool).await.unwrap();
    test_product("Unlinked").with_id(C).insert(&app.pool).await.unwrap();
    link_category(&app.pool, &kite, &kites, 0).await.unwrap();
    link_category(&app.pool, &board, &boards, 0).await.unwrap();

    let filters = FilterList::new(None)
        .with("category_id", Some(Filter::relation(&PRODUCT_CATEGORY, &kites)));
    let products: Vec<Product> = app
        .repository()
        .get_by_filter(&filters, Page::all())
        .await
        .unwrap();
    assert_eq!(ids(&products), vec![kite]);

    let filters = FilterList::new(None).with(
        "category_id",
        Some(Filter::relation(&PRODUCT_CATEGORY, "no-such-category")),
    );
    let products: Vec<Product> = app
        .repository()
        .get_by_filter(&filters, Page::all())
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn relation_and_direct_filters_combine() {
    let app = TestCatalogue::new().await;
    let kites = test_category("Kites").insert(&app.pool).await.unwrap();
    let a = test_product("Kite A")
        .with_id(A)
        .with_manufacturer("m1")
        .insert(&app.pool)
        .await
        .unwrap();
    let b = test_product("Kite B")
        .with_id(B)
        .with_manufacturer("m2")
        .insert(&app.pool)
        .await
        .unwrap();
    link_category(&app.pool, &a, &kites, 0).await.unwrap();
    link_category(&app.pool, &b, &kites, 1).await.unwrap();

    let filters = ProductFilterList {
        category: Some(emporium_catalogue::filter::IdFilter::new(&kites)),
        manufacturer: Some(emporium_catalogue::filter::IdFilter::new("m2")),
        ..Default::default()
    };
    let products: Vec<Product> = app
        .repository()
        .get_by_filter(&filters.into(), Page::all())
        .await
        .unwrap();

    assert_eq!(ids(&products), vec![b]);
}

#[tokio::test]
async fn product_activity_window() {
    let app = TestCatalogue::new().await;
    let now = now();
    test_product("Flagged").with_id(A).insert(&app.pool).await.unwrap();
    test_product("In window")
        .with_id(B)
        .active_between(now - 3600, now + 3600)
        .insert(&app.pool)
        .await
        .unwrap();
    test_product("Expired")
        .with_id(C)
        .active_between(now - 7200, now - 3600)
        .insert(&app.pool)
        .await
        .unwrap();

    let visible: Vec<Product> = app
        .repository()
        .get_by_filter(&ProductFilterList::default().into(), Page::all())
        .await
        .unwrap();

    assert_eq!(ids(&visible), vec![A, B]);
}

#[tokio::test]
async fn pagination_applies_offset_and_limit() {
    let app = TestCatalogue::new().await;
    for (id, title) in [(A, "Alpha"), (B, "Beta"), (C, "Gamma")] {
        test_vendor(title).with_id(id).insert(&app.pool).await.unwrap();
    }
    let repository = app.repository();
    let filters = FilterList::default();

    let page: Vec<Vendor> = repository
        .get_by_filter(&filters, Page::new(Some(1), Some(1)))
        .await
        .unwrap();
    assert_eq!(ids(&page), vec![B]);

    let tail: Vec<Vendor> = repository
        .get_by_filter(&filters, Page::new(Some(1), None))
        .await
        .unwrap();
    assert_eq!(ids(&tail), vec![B, C]);

    let head: Vec<Vendor> = repository
        .get_by_filter(&filters, Page::new(None, Some(2)))
        .await
        .unwrap();
    assert_eq!(ids(&head), vec![A, B]);
}

#[tokio::test]
async fn oversized_page_bounds_are_clamped() {
    let app = TestCatalogue::new().await;
    test_vendor("Alpha").with_id(A).insert(&app.pool).await.unwrap();
    let repository = app.repository();
    let filters = FilterList::default();

    let unbounded: Vec<Vendor> = repository
        .get_by_filter(&filters, Page::new(None, Some(u64::MAX)))
        .await
        .unwrap();
    assert_eq!(ids(&unbounded), vec![A]);

    let past_the_end: Vec<Vendor> = repository
        .get_by_filter(&filters, Page::new(Some(u64::MAX), None))
        .await
        .unwrap();
    assert!(past_the_end.is_empty());
}

#[tokio::test]
async fn empty_result_is_empty_list() {
    let app = TestCatalogue::new().await;
    let vendors: Vec<Vendor> = app
        .repository()
        .get_by_filter(&FilterList::default(), Page::all())
        .await
        .unwrap();
    assert!(vendors.is_empty());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let app = TestCatalogue::new().await;
    let err = app
        .repository()
        .get_by_id::<Vendor>("DOES-NOT-EXIST")
        .await
        .unwrap_err();

    assert!(
        matches!(err, RepositoryError::NotFound { ref id, .. } if id == "DOES-NOT-EXIST"),
        "{err:?}"
    );
}

#[tokio::test]
async fn unknown_filter_field_is_rejected() {
    let app = TestCatalogue::new().await;
    let filters = FilterList::new(None)
        .with("colour", Some(Filter::equals_text("red")))
        .with("size", None);

    let err = app
        .repository()
        .get_by_filter::<Vendor>(&filters, Page::all())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::Filter(FilterError::UnknownField { .. })
    ));
}

#[tokio::test]
async fn mistyped_row_is_rejected() {
    let app = TestCatalogue::new().await;
    sqlx::query(
        "INSERT INTO vendor (id, active, title, short_description) VALUES (?, 2, 'Odd', '')",
    )
    .bind(A)
    .execute(&app.pool)
    .await
    .unwrap();

    let err = app
        .repository()
        .get_by_id::<Vendor>(A)
        .await
        .unwrap_err();

    match err {
        RepositoryError::RowShape { table, reason } => {
            assert_eq!(table, "vendor");
            assert!(reason.contains("active"), "{reason}");
        }
        other => panic!("expected RowShape, got {other:?}"),
    }
}

#[tokio::test]
async fn save_reloads_store_defaults() {
    let app = TestCatalogue::new().await;
    let vendor = Vendor::from_model(VendorRow {
        id: A.to_string(),
        active: true,
        icon: None,
        title: "Fresh".to_string(),
        short_description: String::new(),
        timestamp: None,
    });

    let saved = app.repository().save(&vendor).await.unwrap();
    assert_eq!(saved.id(), A);
    assert_eq!(saved.title(), "Fresh");
    assert!(saved.timestamp().is_some(), "store default not reloaded");

    let mut row = saved.model().clone();
    row.title = "Renamed".to_string();
    row.icon = Some("icon.png".to_string());
    let updated = app
        .repository()
        .save(&Vendor::from_model(row))
        .await
        .unwrap();

    assert_eq!(updated.title(), "Renamed");
    assert_eq!(updated.icon(), Some("icon.png"));
    assert_eq!(updated.timestamp(), saved.timestamp());

    let all: Vec<Vendor> = app
        .repository()
        .get_by_filter(&FilterList::default(), Page::all())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn save_failure_is_persistence_error() {
    let app = TestCatalogue::new().await;
    let review = Review::new("p1", "Off the scale", 9);

    let err = app.repository().save(&review).await.unwrap_err();

    match err {
        RepositoryError::Persistence { id, source } => {
            assert_eq!(id, review.id());
            assert!(matches!(source, StoreError::Database(_)));
        }
        other => panic!("expected Persistence, got {other:?}"),
    }
}
