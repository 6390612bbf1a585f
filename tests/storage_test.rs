use anyhow::Result;
use bank_ledger::domain::Movement;
use bank_ledger::storage::{Repository, accounts, transactions};
use tempfile::TempDir;

/// Helper to create a bootstrapped repository in a temporary directory
async fn test_repo() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let repo = Repository::init(&format!("sqlite:{}?mode=rwc", db_path.display())).await?;
    Ok((repo, temp_dir))
}

#[tokio::test]
async fn test_migrate_is_idempotent() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let account = accounts::create(repo.pool(), "Ana").await?;

    repo.migrate().await?;
    repo.migrate().await?;

    assert_eq!(accounts::list_all(repo.pool()).await?, vec![account]);
    Ok(())
}

#[tokio::test]
async fn test_account_store_basics() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let pool = repo.pool();

    let ana = accounts::create(pool, "Ana").await?;
    assert_eq!(ana.balance, 0);
    assert!(accounts::exists(pool, ana.number).await?);
    assert!(!accounts::exists(pool, ana.number + 1).await?);

    accounts::update_balance(pool, ana.number, 4321).await?;
    let reloaded = accounts::get_by_number(pool, ana.number).await?.unwrap();
    assert_eq!(reloaded.balance, 4321);

    assert!(accounts::get_by_number(pool, 999).await?.is_none());
    assert!(accounts::get_latest_by_holder(pool, "Bruno").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_update_balance_of_missing_account_fails() -> Result<()> {
    let (repo, _temp) = test_repo().await?;

    assert!(accounts::update_balance(repo.pool(), 42, 100).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_schema_rejects_negative_balance() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let ana = accounts::create(repo.pool(), "Ana").await?;

    assert!(accounts::update_balance(repo.pool(), ana.number, -1).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_transaction_log_orders_newest_first() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let pool = repo.pool();
    let ana = accounts::create(pool, "Ana").await?;
    let bruno = accounts::create(pool, "Bruno").await?;

    let first = transactions::record(pool, Movement::Deposit { dest: ana.number }, 100).await?;
    let second = transactions::record(
        pool,
        Movement::Transfer {
            source: ana.number,
            dest: bruno.number,
        },
        50,
    )
    .await?;
    let third =
        transactions::record(pool, Movement::Withdrawal { source: bruno.number }, 20).await?;

    let ana_log = transactions::find_by_account(pool, ana.number).await?;
    assert_eq!(ana_log, vec![second.clone(), first.clone()]);

    let bruno_log = transactions::find_by_account(pool, bruno.number).await?;
    assert_eq!(bruno_log, vec![third.clone(), second.clone()]);

    assert_eq!(
        transactions::list_all(pool).await?,
        vec![first, second, third]
    );
    Ok(())
}

#[tokio::test]
async fn test_transaction_log_rejects_unknown_account() -> Result<()> {
    let (repo, _temp) = test_repo().await?;

    let result = transactions::record(repo.pool(), Movement::Deposit { dest: 77 }, 100).await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_dropped_transaction_rolls_back() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let ana = accounts::create(repo.pool(), "Ana").await?;

    {
        let mut tx = repo.begin().await?;
        accounts::update_balance(&mut *tx, ana.number, 10000).await?;
        transactions::record(&mut *tx, Movement::Deposit { dest: ana.number }, 10000).await?;
        // dropped without commit
    }

    let reloaded = accounts::get_by_number(repo.pool(), ana.number).await?.unwrap();
    assert_eq!(reloaded.balance, 0);
    assert!(transactions::list_all(repo.pool()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_committed_transaction_is_visible() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let ana = accounts::create(repo.pool(), "Ana").await?;

    let mut tx = repo.begin().await?;
    accounts::update_balance(&mut *tx, ana.number, 10000).await?;
    transactions::record(&mut *tx, Movement::Deposit { dest: ana.number }, 10000).await?;
    tx.commit().await?;

    let reloaded = accounts::get_by_number(repo.pool(), ana.number).await?.unwrap();
    assert_eq!(reloaded.balance, 10000);
    assert_eq!(transactions::list_all(repo.pool()).await?.len(), 1);
    Ok(())
}
