#![allow(dead_code)]

use std::path::PathBuf;

use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, MoneyCents, NewCategory, NewTransaction, NewUser, TransactionKind};
use migration::MigratorTrait;
use uuid::Uuid;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(1024, 1)
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// A fresh, migrated database file under `target/test_dbs`, returned as
/// its connection URL and path.
pub async fn migrated_file_db() -> (String, PathBuf) {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db.close().await.unwrap();

    (url, path)
}

pub async fn engine_with_file_db() -> (Engine, PathBuf) {
    let (url, path) = migrated_file_db().await;
    let db = Database::connect(&url).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(1024, 1)
        .build()
        .await
        .unwrap();

    (engine, path)
}

pub async fn register(engine: &Engine, email: &str) -> i64 {
    engine
        .register_user(NewUser {
            full_name: "Ana Lima".to_string(),
            email: email.to_string(),
            password: "s3cret".to_string(),
            profile_picture: String::new(),
            role: None,
        })
        .await
        .unwrap()
        .user_id
}

pub async fn category(engine: &Engine, user_id: i64, name: &str) -> i64 {
    engine
        .create_category(NewCategory {
            user_id,
            budget_id: None,
            name: name.to_string(),
            description: String::new(),
            icon: None,
        })
        .await
        .unwrap()
        .category_id
}

pub async fn add(
    engine: &Engine,
    user_id: i64,
    category_id: i64,
    kind: TransactionKind,
    cents: i64,
    date: &str,
) -> i64 {
    engine
        .add_transaction(NewTransaction {
            user_id,
            category_id,
            kind,
            amount: MoneyCents::new(cents),
            date: date.to_string(),
            description: String::new(),
        })
        .await
        .unwrap()
        .transaction_id
}
