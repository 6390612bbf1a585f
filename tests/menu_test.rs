mod common;

use std::io::Cursor;

use anyhow::Result;
use bank_ledger::cli::run_menu;
use common::{funded_account, test_service};

async fn drive(service: &bank_ledger::application::LedgerService, script: &str) -> Result<String> {
    let mut out = Vec::new();
    run_menu(service, Cursor::new(script.to_string()), &mut out).await?;
    Ok(String::from_utf8(out)?)
}

#[tokio::test]
async fn test_menu_open_deposit_withdraw() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let output = drive(&service, "1\nAna\n6\n1\n100.00\n5\n1\n30\n3\n1\n0\n").await?;

    assert!(output.contains("Account opened!"));
    assert!(output.contains("Deposited 100.00."));
    assert!(output.contains("Withdrew 30.00."));
    assert!(output.contains("Balance: 70.00"));
    assert!(output.ends_with("Goodbye!\n"));

    let ana = service.get_latest_account_by_holder("Ana").await?;
    assert_eq!(ana.balance, 7000);
    Ok(())
}

#[tokio::test]
async fn test_menu_transfer_and_history() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let ana = funded_account(&service, "Ana", 7000).await?;
    let bruno = service.open_account("Bruno").await?;

    let script = format!(
        "7\n{}\n{}\n50\n4\n{}\n0\n",
        ana.number, bruno.number, bruno.number
    );
    let output = drive(&service, &script).await?;

    assert!(output.contains("Transferred 50.00."));
    assert!(output.contains(&format!("New balance of account {}: 20.00", ana.number)));
    assert!(output.contains(&format!("from account {}", ana.number)));
    assert_eq!(service.balance(bruno.number).await?, 5000);
    Ok(())
}

#[tokio::test]
async fn test_menu_reports_errors_and_keeps_going() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let ana = funded_account(&service, "Ana", 2000).await?;

    let script = format!(
        "9\n3\nabc\n3\n404\n5\n{}\n999\n6\n{}\n1.234\n1\n   \n2\n0\n",
        ana.number, ana.number
    );
    let output = drive(&service, &script).await?;

    assert!(output.contains("Invalid option, try again."));
    assert!(output.contains("Invalid account number!"));
    assert!(output.contains("Error: Account not found: 404"));
    assert!(output.contains("Error: Insufficient funds"));
    assert!(output.contains("Invalid amount:"));
    assert!(output.contains("Error: Invalid input"));
    assert!(output.contains("Total accounts: 1"));
    assert_eq!(service.balance(ana.number).await?, 2000);
    Ok(())
}

#[tokio::test]
async fn test_menu_stops_at_end_of_input() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let output = drive(&service, "2\n").await?;

    assert!(output.contains("No accounts found."));
    assert!(!output.contains("Goodbye!"));
    Ok(())
}
