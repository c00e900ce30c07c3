use chrono::NaiveDate;
use sea_orm::ConnectionTrait;

use engine::{DateWindow, EngineError, MoneyCents, NewTransaction, Period, TransactionKind};

mod common;

use common::{add, category, engine_with_db, register};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn balance_counts_goal_contributions_as_expenses() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "ana@example.com").await;
    let food = category(&engine, user, "Food").await;

    add(&engine, user, food, TransactionKind::Income, 10000, "2024-03-01").await;
    add(&engine, user, food, TransactionKind::Expense, 3000, "2024-03-02").await;
    add(&engine, user, food, TransactionKind::Goal, 2000, "2024-03-03").await;

    assert_eq!(engine.balance(user, None).await.unwrap(), MoneyCents::new(5000));
    assert_eq!(
        engine.total_income(user, None).await.unwrap(),
        MoneyCents::new(10000)
    );
    assert_eq!(
        engine.total_expense(user, None).await.unwrap(),
        MoneyCents::new(5000)
    );
}

#[tokio::test]
async fn sums_are_scoped_to_the_user() {
    let (engine, _db) = engine_with_db().await;
    let ana = register(&engine, "ana@example.com").await;
    let bea = register(&engine, "bea@example.com").await;
    let ana_food = category(&engine, ana, "Food").await;
    let bea_food = category(&engine, bea, "Food").await;

    add(&engine, ana, ana_food, TransactionKind::Income, 700, "2024-03-01").await;
    add(&engine, bea, bea_food, TransactionKind::Income, 900, "2024-03-01").await;

    assert_eq!(
        engine
            .sum_by_kinds_and_user(ana, &[TransactionKind::Income], None)
            .await
            .unwrap(),
        MoneyCents::new(700)
    );
    assert_eq!(
        engine.total_expense(bea, None).await.unwrap(),
        MoneyCents::ZERO
    );
}

#[tokio::test]
async fn windows_exclude_the_end_date() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "ana@example.com").await;
    let food = category(&engine, user, "Food").await;

    add(&engine, user, food, TransactionKind::Income, 100, "2024-03-01").await;
    add(&engine, user, food, TransactionKind::Income, 200, "2024-03-31").await;
    add(&engine, user, food, TransactionKind::Income, 400, "2024-04-01").await;

    let march = DateWindow::parse("2024-03-01", "2024-04-01").unwrap();
    assert_eq!(
        engine.total_income(user, Some(march)).await.unwrap(),
        MoneyCents::new(300)
    );
    assert_eq!(
        engine
            .balance_in_period(user, Period::Month, date("2024-03-15"))
            .await
            .unwrap(),
        MoneyCents::new(300)
    );
    assert_eq!(
        engine
            .balance_in_period(user, Period::Day, date("2024-04-01"))
            .await
            .unwrap(),
        MoneyCents::new(400)
    );
}

#[test]
fn inverted_window_is_rejected() {
    assert!(matches!(
        DateWindow::parse("2024-04-01", "2024-03-01"),
        Err(EngineError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn period_listing_is_newest_first_within_the_week() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "ana@example.com").await;
    let food = category(&engine, user, "Food").await;

    add(&engine, user, food, TransactionKind::Expense, 1, "2024-03-10").await;
    let monday = add(&engine, user, food, TransactionKind::Expense, 2, "2024-03-11").await;
    let sunday = add(&engine, user, food, TransactionKind::Expense, 3, "2024-03-17").await;
    add(&engine, user, food, TransactionKind::Expense, 4, "2024-03-18").await;

    let (window, records) = engine
        .transactions_in_period(user, Period::Week, date("2024-03-15"))
        .await
        .unwrap();

    assert_eq!(window.start_str(), "2024-03-11");
    assert_eq!(window.end_str(), "2024-03-18");
    let ids: Vec<i64> = records.iter().map(|tx| tx.transaction_id).collect();
    assert_eq!(ids, [sunday, monday]);
}

#[tokio::test]
async fn listings_by_kind_are_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "ana@example.com").await;
    let food = category(&engine, user, "Food").await;

    let older = add(&engine, user, food, TransactionKind::Goal, 10, "2024-01-05").await;
    add(&engine, user, food, TransactionKind::Income, 20, "2024-02-01").await;
    let newer = add(&engine, user, food, TransactionKind::Goal, 30, "2024-03-05").await;

    let goals = engine
        .transactions_by_kind(user, TransactionKind::Goal)
        .await
        .unwrap();
    let ids: Vec<i64> = goals.iter().map(|tx| tx.transaction_id).collect();
    assert_eq!(ids, [newer, older]);

    let all = engine.list_transactions(user).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].transaction_id, newer);
}

#[tokio::test]
async fn oversized_amounts_are_rejected_on_write() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "ana@example.com").await;
    let salary = category(&engine, user, "Salary").await;

    let result = engine
        .add_transaction(NewTransaction {
            user_id: user,
            category_id: salary,
            kind: TransactionKind::Income,
            amount: MoneyCents::new(i64::MAX),
            date: "2024-03-01".to_string(),
            description: String::new(),
        })
        .await;
    assert!(matches!(result, Err(EngineError::InvalidAmount(_))));
}

#[tokio::test]
async fn overflowing_stored_totals_are_an_error() {
    let (engine, db) = engine_with_db().await;
    let user = register(&engine, "ana@example.com").await;
    let salary = category(&engine, user, "Salary").await;

    db.execute_unprepared(&format!(
        "INSERT INTO transactions (transaction_id, user_id, category_id, kind, amount_minor, date, description) \
         VALUES (900, {user}, {salary}, 'income', {max}, '2024-03-01', ''), \
                (901, {user}, {salary}, 'income', 1, '2024-03-02', '');",
        max = i64::MAX
    ))
    .await
    .unwrap();

    assert!(matches!(
        engine.total_income(user, None).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.balance(user, None).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert_eq!(
        engine.total_expense(user, None).await.unwrap(),
        MoneyCents::ZERO
    );
}
