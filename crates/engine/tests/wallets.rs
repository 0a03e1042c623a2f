use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, Money, NewRecipientCmd, NewTransactionCmd, NewWalletCmd,
    PaymentNetwork, RecipientKind, RecipientPatch, TransactionKind, WalletKind, WalletPatch,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[tokio::test]
async fn new_wallet_normalizes_and_lists_in_creation_order() {
    let (engine, _db) = engine_with_db().await;

    let card = engine
        .new_wallet(
            NewWalletCmd::new("alice", "  Card  ", Money::new(dec!(120.50)))
                .kind(WalletKind::Credit)
                .payment_network(PaymentNetwork::Visa)
                .description("   "),
        )
        .await
        .unwrap();
    assert_eq!(card.name, "Card");
    assert_eq!(card.description, None);

    let cash = engine
        .new_wallet(NewWalletCmd::new("alice", "Cash", Money::ZERO))
        .await
        .unwrap();
    assert_eq!(cash.kind, WalletKind::Cash);

    let wallets = engine.list_wallets("alice").await.unwrap();
    let names: Vec<&str> = wallets.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Card", "Cash"]);
    assert_eq!(wallets[0].balance, Money::new(dec!(120.5)));
    assert_eq!(wallets[0].payment_network, Some(PaymentNetwork::Visa));

    assert!(engine.list_wallets("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn new_wallet_rejects_bad_input() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_wallet(NewWalletCmd::new("alice", " ", Money::ZERO))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("wallet name must not be empty".to_string())
    );

    let err = engine
        .new_wallet(NewWalletCmd::new("alice", "Debt", Money::new(dec!(-1))))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .new_wallet(NewWalletCmd::new("carol", "Cash", Money::ZERO))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
}

#[tokio::test]
async fn update_wallet_sets_balance_directly() {
    let (engine, _db) = engine_with_db().await;
    let wallet = engine
        .new_wallet(NewWalletCmd::new("alice", "Cash", Money::new(dec!(10))))
        .await
        .unwrap();
    engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            wallet.id,
            TransactionKind::Income,
            Money::new(dec!(5)),
            "Salary",
            Utc::now(),
        ))
        .await
        .unwrap();

    let updated = engine
        .update_wallet(
            wallet.id,
            "alice",
            WalletPatch::default()
                .name("Pocket")
                .balance(Money::new(dec!(42)))
                .payment_network(Some(PaymentNetwork::Jcb)),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Pocket");
    assert_eq!(updated.balance, Money::new(dec!(42)));

    let stored = engine.wallet(wallet.id, "alice").await.unwrap();
    assert_eq!(stored, updated);

    let err = engine
        .update_wallet(
            wallet.id,
            "alice",
            WalletPatch::default().balance(Money::new(dec!(-0.01))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .update_wallet(wallet.id, "bob", WalletPatch::default().name("Mine"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("wallet not exists".to_string()));
}

#[tokio::test]
async fn referenced_wallet_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let a = engine
        .new_wallet(NewWalletCmd::new("alice", "A", Money::new(dec!(10))))
        .await
        .unwrap();
    let b = engine
        .new_wallet(NewWalletCmd::new("alice", "B", Money::ZERO))
        .await
        .unwrap();

    let tx = engine
        .create_transaction(
            NewTransactionCmd::new(
                "alice",
                a.id,
                TransactionKind::Transfer,
                Money::new(dec!(3)),
                "Move money",
                Utc::now(),
            )
            .internal_wallet_id(b.id),
        )
        .await
        .unwrap();

    for id in [a.id, b.id] {
        let err = engine.delete_wallet(id, "alice").await.unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("wallet still has transactions".to_string())
        );
    }

    engine.delete_transaction(tx.id, "alice").await.unwrap();
    let deleted = engine.delete_wallet(b.id, "alice").await.unwrap();
    assert_eq!(deleted.id, b.id);
    assert_eq!(
        engine.wallet(b.id, "alice").await.unwrap_err(),
        EngineError::KeyNotFound("wallet not exists".to_string())
    );
}

#[tokio::test]
async fn recipients_crud_and_kind_filter() {
    let (engine, _db) = engine_with_db().await;
    let power = engine
        .new_recipient(
            NewRecipientCmd::new("alice", "Power Co", RecipientKind::Biller)
                .description("monthly bill"),
        )
        .await
        .unwrap();
    let friend = engine
        .new_recipient(NewRecipientCmd::new("alice", "Sam", RecipientKind::Peer))
        .await
        .unwrap();

    let billers = engine
        .list_recipients("alice", Some(RecipientKind::Biller))
        .await
        .unwrap();
    assert_eq!(billers, vec![power.clone()]);
    let all = engine.list_recipients("alice", None).await.unwrap();
    assert_eq!(all.len(), 2);

    let renamed = engine
        .update_recipient(
            friend.id,
            "alice",
            RecipientPatch::default()
                .name("Sam R.")
                .description(Some("flatmate".to_string())),
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Sam R.");
    assert_eq!(renamed.description.as_deref(), Some("flatmate"));

    assert_eq!(
        engine.recipient(power.id, "bob").await.unwrap_err(),
        EngineError::KeyNotFound("recipient not exists".to_string())
    );

    let wallet = engine
        .new_wallet(NewWalletCmd::new("alice", "Cash", Money::new(dec!(50))))
        .await
        .unwrap();
    engine
        .create_transaction(
            NewTransactionCmd::new(
                "alice",
                wallet.id,
                TransactionKind::Expense,
                Money::new(dec!(20)),
                "Groceries",
                Utc::now(),
            )
            .recipient_id(power.id),
        )
        .await
        .unwrap();
    assert!(matches!(
        engine.delete_recipient(power.id, "alice").await,
        Err(EngineError::Validation(_))
    ));

    engine.delete_recipient(friend.id, "alice").await.unwrap();
    assert_eq!(
        engine.delete_recipient(Uuid::new_v4(), "alice").await.unwrap_err(),
        EngineError::KeyNotFound("recipient not exists".to_string())
    );
}

#[tokio::test]
async fn new_user_can_own_wallets() {
    let (engine, _db) = engine_with_db().await;

    let username = engine.new_user("  carol ", "hunter2").await.unwrap();
    assert_eq!(username, "carol");
    engine
        .new_wallet(NewWalletCmd::new("carol", "Cash", Money::ZERO))
        .await
        .unwrap();

    let err = engine.new_user("alice", "other").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("user already exists: alice".to_string())
    );
    let err = engine.new_user("dave", "").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let err = engine.new_user(" ", "pw").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .new_wallet(NewWalletCmd::new("nobody", "Cash", Money::ZERO))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
}
