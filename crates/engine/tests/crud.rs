use chrono::NaiveDate;

use engine::{
    BudgetPatch, CategoryPatch, DEFAULT_ICON, EngineError, GoalPatch, GoalStatus, LimitStatus,
    MoneyCents, NewBudget, NewCategory, NewGoal, NewUser, Period, SettingFlag, TransactionKind,
    TransactionPatch, UserPatch, UserRole,
};

mod common;

use common::{add, category, engine_with_db, register};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

async fn budget(engine: &engine::Engine, user_id: i64, initial: i64, limit: i64) -> i64 {
    engine
        .create_budget(NewBudget {
            user_id,
            name: "Groceries".to_string(),
            initial_balance: MoneyCents::new(initial),
            limit: MoneyCents::new(limit),
            period: Period::Month,
        })
        .await
        .unwrap()
        .budget_id
}

#[tokio::test]
async fn register_normalizes_email_and_login_checks_password() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "  Ana@Example.COM ").await;

    let user = engine.user_by_email("ana@example.com").await.unwrap();
    assert_eq!(user.user_id, user_id);
    assert_eq!(user.role, UserRole::User);

    assert_eq!(
        engine.login("ANA@example.com", "s3cret").await.unwrap().user_id,
        user_id
    );
    assert_eq!(
        engine.login("ana@example.com", "nope").await,
        Err(EngineError::InvalidCredentials)
    );
    assert_eq!(
        engine.login("ghost@example.com", "s3cret").await,
        Err(EngineError::InvalidCredentials)
    );
}

#[tokio::test]
async fn update_user_touches_only_supplied_fields() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "ana@example.com").await;
    register(&engine, "bea@example.com").await;

    let updated = engine
        .update_user(
            user_id,
            UserPatch {
                full_name: Some("Ana Souza".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Ana Souza");
    assert_eq!(updated.email, "ana@example.com");

    engine
        .update_user(
            user_id,
            UserPatch {
                password: Some("changed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(engine.login("ana@example.com", "changed").await.is_ok());

    assert!(matches!(
        engine.update_user(user_id, UserPatch::default()).await,
        Err(EngineError::InvalidInput(_))
    ));
    assert!(matches!(
        engine
            .update_user(
                user_id,
                UserPatch {
                    email: Some("bea@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await,
        Err(EngineError::ExistingKey(_))
    ));
}

#[tokio::test]
async fn settings_default_and_toggle_one_flag() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "ana@example.com").await;

    let settings = engine.settings(user_id).await.unwrap();
    assert!(!settings.dark_theme && !settings.terms_condition && settings.notification);

    let toggled = engine
        .toggle_setting(user_id, SettingFlag::TermsCondition)
        .await
        .unwrap();
    assert!(toggled.terms_condition);
    assert!(!toggled.dark_theme);
    assert!(toggled.notification);

    let toggled = engine
        .toggle_setting(user_id, SettingFlag::Notification)
        .await
        .unwrap();
    assert!(!toggled.notification);

    let (user, settings) = engine.user_and_settings(user_id).await.unwrap();
    assert_eq!(user.user_id, user_id);
    assert_eq!(settings, toggled);

    assert!(matches!(
        engine.toggle_setting(42, SettingFlag::DarkTheme).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn delete_user_requires_admin_and_removes_owned_rows() {
    let (engine, _db) = engine_with_db().await;
    let ana = register(&engine, "ana@example.com").await;
    let admin = engine
        .register_user(NewUser {
            full_name: "Root".to_string(),
            email: "root@example.com".to_string(),
            password: "pw".to_string(),
            profile_picture: String::new(),
            role: Some(UserRole::Admin),
        })
        .await
        .unwrap()
        .user_id;

    let food = category(&engine, ana, "Food").await;
    add(&engine, ana, food, TransactionKind::Expense, 100, "2024-03-01").await;
    budget(&engine, ana, 0, 100).await;

    assert!(matches!(
        engine.delete_user(ana, admin).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.delete_user(999, ana).await,
        Err(EngineError::Forbidden(_))
    ));

    engine.delete_user(admin, ana).await.unwrap();
    assert!(matches!(
        engine.user_by_id(ana).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(engine.list_transactions(ana).await.unwrap().is_empty());
    assert!(engine.list_budgets(ana).await.unwrap().is_empty());
    assert!(engine.list_categories(ana).await.unwrap().is_empty());
}

#[tokio::test]
async fn budget_limit_and_patch() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "ana@example.com").await;
    let budget_id = budget(&engine, user_id, 5000, 10000).await;

    assert_eq!(
        engine.check_budget_limit(budget_id).await.unwrap(),
        LimitStatus::WithinRange
    );

    let updated = engine
        .update_budget(
            budget_id,
            BudgetPatch {
                limit: Some(MoneyCents::new(4000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.initial_balance, MoneyCents::new(5000));
    assert_eq!(updated.name, "Groceries");
    assert_eq!(
        engine.check_budget_limit(budget_id).await.unwrap(),
        LimitStatus::Exceeded
    );

    assert!(matches!(
        engine
            .update_budget(
                budget_id,
                BudgetPatch {
                    limit: Some(MoneyCents::new(-1)),
                    ..Default::default()
                },
            )
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.check_budget_limit(77).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn deleting_a_budget_detaches_its_categories() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "ana@example.com").await;
    let budget_id = budget(&engine, user_id, 0, 100).await;

    let category = engine
        .create_category(NewCategory {
            user_id,
            budget_id: Some(budget_id),
            name: "Food".to_string(),
            description: "Meals".to_string(),
            icon: Some("food.png".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(category.budget_id, Some(budget_id));

    engine.delete_budget(budget_id).await.unwrap();
    let category = engine
        .category(user_id, category.category_id)
        .await
        .unwrap();
    assert_eq!(category.budget_id, None);
    assert_eq!(category.icon, "food.png");
}

#[tokio::test]
async fn categories_default_icon_and_ownership() {
    let (engine, _db) = engine_with_db().await;
    let ana = register(&engine, "ana@example.com").await;
    let bea = register(&engine, "bea@example.com").await;
    let bea_budget = budget(&engine, bea, 0, 100).await;

    let food = category(&engine, ana, "Food").await;
    category(&engine, ana, "Rent").await;
    assert_eq!(engine.category(ana, food).await.unwrap().icon, DEFAULT_ICON);

    let found = engine.categories_by_name(ana, " Food ").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category_id, food);
    assert_eq!(engine.list_categories(ana).await.unwrap().len(), 2);

    assert!(matches!(
        engine.category(bea, food).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine
            .create_category(NewCategory {
                user_id: ana,
                budget_id: Some(bea_budget),
                name: "Borrowed".to_string(),
                description: String::new(),
                icon: None,
            })
            .await,
        Err(EngineError::KeyNotFound(_))
    ));

    let renamed = engine
        .update_category(
            ana,
            food,
            CategoryPatch {
                name: Some("Groceries".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Groceries");
    assert_eq!(renamed.icon, DEFAULT_ICON);
}

#[tokio::test]
async fn deleted_category_leaves_transactions_without_icon() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "ana@example.com").await;
    let food = category(&engine, user_id, "Food").await;
    let tx_id = add(&engine, user_id, food, TransactionKind::Expense, 100, "2024-03-01").await;

    engine.delete_category(user_id, food).await.unwrap();

    let with_icons = engine.transactions_with_icons(user_id).await.unwrap();
    assert_eq!(with_icons.len(), 1);
    assert_eq!(with_icons[0].transaction.transaction_id, tx_id);
    assert_eq!(with_icons[0].icon, None);

    let (tx, category) = engine.transaction_with_category(tx_id).await.unwrap();
    assert_eq!(tx.category_id, food);
    assert!(category.is_none());
}

#[tokio::test]
async fn transactions_validate_and_stay_with_their_owner() {
    let (engine, _db) = engine_with_db().await;
    let ana = register(&engine, "ana@example.com").await;
    let bea = register(&engine, "bea@example.com").await;
    let food = category(&engine, ana, "Food").await;
    let tx_id = add(&engine, ana, food, TransactionKind::Expense, 1500, "2024-03-05").await;

    let edited = engine
        .edit_transaction(
            ana,
            tx_id,
            TransactionPatch {
                kind: Some(TransactionKind::Goal),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.kind, TransactionKind::Goal);
    assert_eq!(edited.amount, MoneyCents::new(1500));
    assert_eq!(edited.date, "2024-03-05");

    assert!(matches!(
        engine
            .edit_transaction(
                ana,
                tx_id,
                TransactionPatch {
                    date: Some("2024-3-5".to_string()),
                    ..Default::default()
                },
            )
            .await,
        Err(EngineError::DateParse(_))
    ));
    assert!(matches!(
        engine
            .edit_transaction(bea, tx_id, TransactionPatch {
                amount: Some(MoneyCents::new(1)),
                ..Default::default()
            })
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_transaction(bea, tx_id).await,
        Err(EngineError::KeyNotFound(_))
    ));

    engine.delete_transaction(ana, tx_id).await.unwrap();
    assert!(engine.list_transactions(ana).await.unwrap().is_empty());
}

#[tokio::test]
async fn goals_track_status_and_reminders() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "ana@example.com").await;

    let goal = engine
        .create_goal(NewGoal {
            user_id,
            name: "Holiday".to_string(),
            target: MoneyCents::new(50000),
            current: MoneyCents::new(10000),
            deadline: "2024-12-31".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(goal.status, GoalStatus::InProgress);

    let reminder = engine.send_goal_reminder(goal.goal_id, None).await.unwrap();
    assert_eq!(reminder.user_id, user_id);
    assert!(reminder.message.contains("400.00"));

    let custom = engine
        .send_goal_reminder(goal.goal_id, Some("  Put 50 aside on Friday  "))
        .await
        .unwrap();
    assert_eq!(custom.message, "Put 50 aside on Friday");

    let blank = engine
        .send_goal_reminder(goal.goal_id, Some("   "))
        .await
        .unwrap();
    assert_eq!(blank.message, reminder.message);

    let done = engine
        .update_goal(
            goal.goal_id,
            GoalPatch {
                current: Some(MoneyCents::new(50000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(done.status, GoalStatus::Completed);
    assert_eq!(engine.list_goals(user_id).await.unwrap(), [done.clone()]);

    assert!(matches!(
        engine
            .create_goal(NewGoal {
                user_id,
                name: "Nothing".to_string(),
                target: MoneyCents::ZERO,
                current: MoneyCents::ZERO,
                deadline: "2024-12-31".to_string(),
            })
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    assert!(engine.goal_reminder_due(user_id, date("2024-03-15")).await.unwrap());
    let savings = category(&engine, user_id, "Savings").await;
    add(&engine, user_id, savings, TransactionKind::Goal, 500, "2024-03-01").await;
    assert!(!engine.goal_reminder_due(user_id, date("2024-03-15")).await.unwrap());
    assert!(engine.goal_reminder_due(user_id, date("2024-04-15")).await.unwrap());

    engine
        .toggle_setting(user_id, SettingFlag::Notification)
        .await
        .unwrap();
    assert!(!engine.goal_reminder_due(user_id, date("2024-04-15")).await.unwrap());

    engine.delete_goal(done.goal_id).await.unwrap();
    assert!(matches!(
        engine.goal(done.goal_id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
