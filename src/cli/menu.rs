//! Numbered interactive menu, the ATM-style front end.
//!
//! Reads one answer per line from any `BufRead` and writes to any `Write`,
//! so the whole loop can be driven from tests. Errors from the ledger are
//! printed and the menu keeps running; only I/O errors end it.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::application::LedgerService;
use crate::domain::{Account, AccountNumber, Cents, format_cents, parse_cents};

use super::render::{write_account, write_accounts_table, write_history};

const MENU: &str = "\
----- Bank Ledger -----

1 - Open account
2 - List all accounts
3 - Show account balance
4 - Show account history
5 - Withdraw
6 - Deposit
7 - Transfer
0 - Exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    OpenAccount,
    ListAccounts,
    Balance,
    History,
    Withdraw,
    Deposit,
    Transfer,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::OpenAccount),
            "2" => Some(MenuChoice::ListAccounts),
            "3" => Some(MenuChoice::Balance),
            "4" => Some(MenuChoice::History),
            "5" => Some(MenuChoice::Withdraw),
            "6" => Some(MenuChoice::Deposit),
            "7" => Some(MenuChoice::Transfer),
            "0" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Run the menu until the user picks exit or input ends.
pub async fn run_menu<R: BufRead, W: Write>(
    service: &LedgerService,
    input: R,
    out: &mut W,
) -> Result<()> {
    let mut session = Session {
        service,
        input,
        out,
    };
    session.run().await
}

struct Session<'a, R, W> {
    service: &'a LedgerService,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    async fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.out)?;
            write!(self.out, "{}", MENU)?;
            let Some(answer) = self.prompt("Choose an option: ")? else {
                break;
            };

            match MenuChoice::parse(&answer) {
                Some(MenuChoice::OpenAccount) => self.open_account().await?,
                Some(MenuChoice::ListAccounts) => self.list_accounts().await?,
                Some(MenuChoice::Balance) => self.balance().await?,
                Some(MenuChoice::History) => self.history().await?,
                Some(MenuChoice::Withdraw) => self.withdraw().await?,
                Some(MenuChoice::Deposit) => self.deposit().await?,
                Some(MenuChoice::Transfer) => self.transfer().await?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.out, "Goodbye!")?;
                    break;
                }
                None => writeln!(self.out, "Invalid option, try again.")?,
            }
        }
        Ok(())
    }

    /// Print a prompt and read one line. `None` means input is exhausted.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{}", message)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for an account number and load the account, reporting problems
    /// to the user.
    async fn prompt_account(&mut self, message: &str) -> Result<Option<Account>> {
        let Some(answer) = self.prompt(message)? else {
            return Ok(None);
        };
        let Ok(number) = answer.parse::<AccountNumber>() else {
            writeln!(self.out, "Invalid account number!")?;
            return Ok(None);
        };

        match self.service.get_account(number).await {
            Ok(account) => Ok(Some(account)),
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
                Ok(None)
            }
        }
    }

    fn prompt_amount(&mut self, message: &str) -> Result<Option<Cents>> {
        let Some(answer) = self.prompt(message)? else {
            return Ok(None);
        };
        match parse_cents(&answer) {
            Ok(amount) => Ok(Some(amount)),
            Err(e) => {
                writeln!(self.out, "Invalid amount: {}", e)?;
                Ok(None)
            }
        }
    }

    async fn open_account(&mut self) -> Result<()> {
        writeln!(self.out, "--- Open account ---")?;
        let Some(holder) = self.prompt("Holder's full name: ")? else {
            return Ok(());
        };

        match self.service.open_account(&holder).await {
            Ok(account) => {
                writeln!(self.out, "Account opened!")?;
                write_account(&mut self.out, &account)?;
            }
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    async fn list_accounts(&mut self) -> Result<()> {
        writeln!(self.out, "--- All accounts ---")?;
        match self.service.list_accounts().await {
            Ok(accounts) => write_accounts_table(&mut self.out, &accounts)?,
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    async fn balance(&mut self) -> Result<()> {
        writeln!(self.out, "--- Balance ---")?;
        if let Some(account) = self.prompt_account("Account number: ").await? {
            write_account(&mut self.out, &account)?;
        }
        Ok(())
    }

    async fn history(&mut self) -> Result<()> {
        writeln!(self.out, "--- Transaction history ---")?;
        let Some(account) = self.prompt_account("Account number: ").await? else {
            return Ok(());
        };

        match self.service.history(account.number).await {
            Ok(entries) => {
                writeln!(self.out, "History of account {}:", account.number)?;
                write_history(&mut self.out, &entries)?;
            }
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    async fn withdraw(&mut self) -> Result<()> {
        writeln!(self.out, "--- Withdraw ---")?;
        let Some(account) = self.prompt_account("Account number: ").await? else {
            return Ok(());
        };
        let Some(amount) = self.prompt_amount("Amount to withdraw: ")? else {
            return Ok(());
        };

        match self.service.withdraw(account.number, amount).await {
            Ok(result) => {
                writeln!(self.out, "Withdrew {}.", format_cents(amount))?;
                writeln!(
                    self.out,
                    "New balance: {}",
                    format_cents(result.account.balance)
                )?;
            }
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    async fn deposit(&mut self) -> Result<()> {
        writeln!(self.out, "--- Deposit ---")?;
        let Some(account) = self.prompt_account("Account number: ").await? else {
            return Ok(());
        };
        let Some(amount) = self.prompt_amount("Amount to deposit: ")? else {
            return Ok(());
        };

        match self.service.deposit(account.number, amount).await {
            Ok(result) => {
                writeln!(self.out, "Deposited {}.", format_cents(amount))?;
                writeln!(
                    self.out,
                    "New balance: {}",
                    format_cents(result.account.balance)
                )?;
            }
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    async fn transfer(&mut self) -> Result<()> {
        writeln!(self.out, "--- Transfer ---")?;
        let Some(source) = self.prompt_account("Source account number: ").await? else {
            return Ok(());
        };
        let Some(dest) = self
            .prompt_account("Destination account number: ")
            .await?
        else {
            return Ok(());
        };
        let Some(amount) = self.prompt_amount("Amount to transfer: ")? else {
            return Ok(());
        };

        match self.service.transfer(source.number, dest.number, amount).await {
            Ok(result) => {
                writeln!(self.out, "Transferred {}.", format_cents(amount))?;
                writeln!(
                    self.out,
                    "New balance of account {}: {}",
                    source.number,
                    format_cents(result.source.balance)
                )?;
            }
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }
}
