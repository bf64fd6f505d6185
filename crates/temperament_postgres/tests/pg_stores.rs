//! Store round-trips against a live database.
//!
//! Requires a running PostgreSQL database.
//! Run with: DATABASE_URL="postgresql:///temperamento_test" cargo test -p temperament_postgres --test pg_stores -- --ignored --nocapture

use std::io::Write;

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tempfile::NamedTempFile;

use temperament_core::ports::{ReferenceStore, ResultStore, TemplateStore};
use temperament_core::{
    Classification, Language, NewReportRecord, SubTemperament, Temperament,
};
use temperament_postgres::import::{import_subtemperaments, import_temperaments};
use temperament_postgres::{run_migrations, PgStores};

async fn pool() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to test database");
    run_migrations(&pool).await.expect("migrations failed");
    pool
}

fn new_record() -> NewReportRecord {
    NewReportRecord {
        user_id: "pg-test".into(),
        name: "Ana Lima".into(),
        email: "ana@example.com".into(),
        phone: None,
        birth_date: NaiveDate::from_ymd_opt(1985, 3, 20).unwrap(),
        test_date: NaiveDate::from_ymd_opt(2025, 3, 19).unwrap(),
        started_at: Some("08:00:00".into()),
        finished_at: Some("08:20:00".into()),
        test_duration: "00:20:00".into(),
        age: 39,
        consent_terms: true,
        consent_contact: true,
        classification: Classification {
            temperament: Temperament::Melancholic,
            subtemperament: SubTemperament::Agua,
        },
    }
}

#[tokio::test]
#[ignore]
async fn result_round_trip() {
    let stores = PgStores::new(pool().await);
    let record = new_record();
    let id = stores.results.save_result(&record).await.unwrap();

    let loaded = stores.results.load_result(id).await.unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.name, record.name);
    assert_eq!(loaded.classification, record.classification);
    assert_eq!(loaded.age, 39);

    assert!(stores.results.load_result(-1).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn imported_reference_text_by_language() {
    let pool = pool().await;

    let mut temperaments = NamedTempFile::new().unwrap();
    let cols: Vec<String> = std::iter::once("Melancólico".to_string())
        .chain((1..7).map(|i| format!("pt {i}")))
        .chain(std::iter::once("Melancholic".to_string()))
        .chain((1..7).map(|i| format!("en {i}")))
        .collect();
    writeln!(temperaments, "{}", cols.join(";")).unwrap();
    writeln!(temperaments, "Colérico;incompleto").unwrap();
    let summary = import_temperaments(&pool, temperaments.path()).await.unwrap();
    assert_eq!((summary.imported, summary.skipped), (1, 1));

    let mut subs = NamedTempFile::new().unwrap();
    writeln!(subs, "Água;Adapta-se;Water;Adapts").unwrap();
    import_subtemperaments(&pool, subs.path()).await.unwrap();

    let stores = PgStores::new(pool);
    let classification = new_record().classification;

    let pt = stores
        .references
        .reference_text(&classification, Language::Pt)
        .await
        .unwrap();
    let pt_text = pt.temperament.unwrap();
    assert_eq!(pt_text.description.as_deref(), Some("pt 1"));
    assert_eq!(pt_text.suggestion.as_deref(), Some("pt 6"));
    assert_eq!(pt.subtemperament_description.as_deref(), Some("Adapta-se"));
    assert!(pt.characters.len() <= 3);

    let en = stores
        .references
        .reference_text(&classification, Language::En)
        .await
        .unwrap();
    assert_eq!(en.temperament.unwrap().behavior.as_deref(), Some("en 2"));
    assert_eq!(en.subtemperament_description.as_deref(), Some("Adapts"));
}

#[tokio::test]
#[ignore]
async fn template_upsert_replaces_bytes() {
    let stores = PgStores::new(pool().await);
    stores
        .templates
        .save_template("template_test", b"%PDF-1.4 first")
        .await
        .unwrap();
    stores
        .templates
        .save_template("template_test", b"%PDF-1.4 second")
        .await
        .unwrap();
    assert_eq!(
        stores.templates.load_template("template_test").await.unwrap(),
        Some(b"%PDF-1.4 second".to_vec())
    );
    assert!(stores
        .templates
        .load_template("template_missing")
        .await
        .unwrap()
        .is_none());
}
