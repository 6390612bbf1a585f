mod common;

use anyhow::Result;
use bank_ledger::io::{Exporter, LedgerSnapshot};
use common::{funded_account, test_service};

#[tokio::test]
async fn test_export_accounts_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;
    funded_account(&service, "Ana", 2000).await?;
    service.open_account("Bruno, Jr.").await?;

    let mut buf = Vec::new();
    let count = Exporter::new(&service).export_accounts_csv(&mut buf).await?;
    let csv = String::from_utf8(buf)?;

    assert_eq!(count, 2);
    assert_eq!(
        csv,
        "number,holder,balance\n1,Ana,20.00\n2,\"Bruno, Jr.\",0.00\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_export_transactions_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let ana = funded_account(&service, "Ana", 10000).await?;
    let bruno = service.open_account("Bruno").await?;
    service.transfer(ana.number, bruno.number, 2500).await?;
    service.withdraw(bruno.number, 500).await?;

    let mut buf = Vec::new();
    let count = Exporter::new(&service)
        .export_transactions_csv(&mut buf)
        .await?;
    let csv = String::from_utf8(buf)?;
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(count, 3);
    assert_eq!(
        lines[0],
        "id,timestamp,kind,amount,source_account,dest_account"
    );
    assert!(lines[1].ends_with(",DEPOSIT,100.00,,1"));
    assert!(lines[2].ends_with(",TRANSFER,25.00,1,2"));
    assert!(lines[3].ends_with(",WITHDRAWAL,5.00,2,"));
    Ok(())
}

#[tokio::test]
async fn test_export_full_json() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let ana = funded_account(&service, "Ana", 10000).await?;
    let bruno = service.open_account("Bruno").await?;
    service.transfer(ana.number, bruno.number, 2500).await?;

    let mut buf = Vec::new();
    Exporter::new(&service).export_full_json(&mut buf).await?;
    let snapshot: LedgerSnapshot = serde_json::from_slice(&buf)?;

    assert_eq!(snapshot.accounts, service.list_accounts().await?);
    assert_eq!(snapshot.transactions, service.list_transactions().await?);
    Ok(())
}
