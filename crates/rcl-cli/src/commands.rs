use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use rcl_contract::{ContractConfig, QueryResult, ReceivableContract};
use rcl_store::InMemoryLedgerStore;
use rcl_types::{Account, RecOrder, Receivable};

use crate::cli::*;

type Contract = ReceivableContract<InMemoryLedgerStore>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ContractConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ContractConfig::default(),
    };
    let store = InMemoryLedgerStore::load(&cli.ledger)
        .with_context(|| format!("loading ledger {}", cli.ledger.display()))?;
    let contract = ReceivableContract::new(store, config);
    let format = cli.format;

    let mutated = match cli.command {
        Command::Init => cmd_init(&contract, format)?,
        Command::User(args) => cmd_user(&contract, args, format)?,
        Command::Order(args) => cmd_order(&contract, args, format)?,
        Command::Receivable(args) => cmd_receivable(&contract, args, format)?,
        Command::CreateOrder(args) => {
            let order = contract.create_order(&args.company, &args.supplier, args.amount)?;
            emit(format, &order, |o| {
                println!("{} Created {}", "✓".green().bold(), o.order_no.yellow().bold());
                print_order(o);
            })?;
            true
        }
        Command::Sign(args) => {
            let rec = contract.sign_receivable(&args.order, &args.supplier, args.discount_amount)?;
            report(format, "Signed", &rec)?
        }
        Command::Accept(args) => {
            let rec = contract.accept_receivable(&args.company, &args.receivable)?;
            report(format, "Accepted", &rec)?
        }
        Command::Transfer(args) => {
            let rec = contract.transfer_receivable(&args.receivable, &args.owner, &args.to)?;
            report(format, "Transferred", &rec)?
        }
        Command::ApplyDiscount(args) => {
            let rec = contract.apply_discount(&args.receivable, &args.owner, &args.financial)?;
            report(format, "Discount requested for", &rec)?
        }
        Command::ConfirmDiscount(args) => {
            let rec = contract.discount_confirm(&args.receivable, &args.financial)?;
            report(format, "Discounted", &rec)?
        }
        Command::Redeem(args) => {
            let rec = contract.redeem(&args.receivable, &args.company)?;
            report(format, "Redeemed", &rec)?
        }
    };

    if mutated {
        contract
            .store()
            .save(&cli.ledger)
            .with_context(|| format!("saving ledger {}", cli.ledger.display()))?;
        debug!(ledger = %cli.ledger.display(), version = contract.store().version(), "ledger saved");
    }
    Ok(())
}

fn cmd_init(contract: &Contract, format: OutputFormat) -> anyhow::Result<bool> {
    let accounts = contract.init_ledger()?;
    emit(format, &accounts, |accounts| {
        println!("{} Initialized ledger with {} accounts", "✓".green().bold(), accounts.len());
        for account in accounts {
            print_account(account);
        }
    })?;
    Ok(true)
}

fn cmd_user(contract: &Contract, args: LookupArgs, format: OutputFormat) -> anyhow::Result<bool> {
    match args.id {
        Some(id) => emit(format, &contract.query_user(&id)?, print_account)?,
        None => emit(format, &contract.query_all_users()?, |rows| {
            print_listing(rows, "accounts", print_account)
        })?,
    }
    Ok(false)
}

fn cmd_order(contract: &Contract, args: LookupArgs, format: OutputFormat) -> anyhow::Result<bool> {
    match args.id {
        Some(no) => emit(format, &contract.query_rec_order(&no)?, print_order)?,
        None => emit(format, &contract.query_all_rec_orders()?, |rows| {
            print_listing(rows, "orders", print_order)
        })?,
    }
    Ok(false)
}

fn cmd_receivable(contract: &Contract, args: LookupArgs, format: OutputFormat) -> anyhow::Result<bool> {
    match args.id {
        Some(no) => emit(format, &contract.query_receivable(&no)?, print_receivable)?,
        None => emit(format, &contract.query_all_receivables()?, |rows| {
            print_listing(rows, "receivables", print_receivable)
        })?,
    }
    Ok(false)
}

fn report(format: OutputFormat, verb: &str, rec: &Receivable) -> anyhow::Result<bool> {
    emit(format, rec, |r| {
        println!("{} {} {}", "✓".green().bold(), verb, r.receivable_no.yellow().bold());
        print_receivable(r);
    })?;
    Ok(true)
}

// ---- Output ----

fn emit<T: Serialize + ?Sized>(format: OutputFormat, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(value),
    }
    Ok(())
}

fn print_listing<T>(rows: &[QueryResult<T>], noun: &str, print: fn(&T)) {
    if rows.is_empty() {
        println!("No {noun}.");
        return;
    }
    for row in rows {
        print(&row.record);
    }
}

fn print_account(account: &Account) {
    println!(
        "{}  {}  {}  {}",
        account.id.yellow().bold(),
        account.enterprise,
        account.role.to_string().cyan(),
        account.status
    );
}

fn print_order(order: &RecOrder) {
    println!(
        "{}  {} -> {}  amount {}  (goods {}, receivable {})",
        order.order_no.yellow().bold(),
        order.owner_id,
        order.acceptor_id,
        order.total_amount.to_string().bold(),
        order.goods_no.dimmed(),
        order.receivable_no.dimmed()
    );
}

fn print_receivable(rec: &Receivable) {
    println!(
        "{}  {}  owner {}  acceptor {}  discount {}",
        rec.receivable_no.yellow().bold(),
        rec.status.to_string().green(),
        rec.owner_id.bold(),
        rec.acceptor_id,
        rec.discount_apply_amount
    );
    println!("  Order: {}", rec.order_no);
    println!("  Signed: {}  Expires: {}", rec.signed_time, rec.expire_time);
    if let Some(applicant) = &rec.discount_applicant_id {
        println!("  Discount applicant: {}", applicant.cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rcl_store::LedgerStore;
    use rcl_types::{ReceivableStatus, Role};
    use std::path::Path;

    fn run(ledger: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["rcl", "--ledger", ledger.to_str().unwrap()];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap())
    }

    fn reopen(ledger: &Path) -> Contract {
        ReceivableContract::new(InMemoryLedgerStore::load(ledger).unwrap(), ContractConfig::default())
    }

    #[test]
    fn lifecycle_persists_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");

        run(&ledger, &["init"]).unwrap();
        run(&ledger, &["create-order", "user1", "user2", "1000000"]).unwrap();
        run(&ledger, &["sign", "order1", "user2", "900000"]).unwrap();
        run(&ledger, &["accept", "user1", "rec1"]).unwrap();
        run(&ledger, &["transfer", "rec1", "user2", "user3"]).unwrap();
        run(&ledger, &["apply-discount", "rec1", "user3", "user4"]).unwrap();
        run(&ledger, &["confirm-discount", "rec1", "user4"]).unwrap();
        run(&ledger, &["--format", "json", "redeem", "rec1", "user1"]).unwrap();

        let rec = reopen(&ledger).query_receivable("rec1").unwrap();
        assert_eq!(rec.status, ReceivableStatus::Redeemed);
        assert_eq!(rec.owner_id, "user1");
    }

    #[test]
    fn queries_do_not_create_a_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");
        run(&ledger, &["user"]).unwrap();
        run(&ledger, &["--format", "json", "order"]).unwrap();
        assert!(!ledger.exists());
    }

    #[test]
    fn failed_operation_leaves_snapshot_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");
        run(&ledger, &["init"]).unwrap();
        let before = std::fs::read(&ledger).unwrap();

        let err = run(&ledger, &["create-order", "user2", "user1", "10"]).unwrap_err();
        assert_eq!(err.to_string(), "user2 is a Supplier while a Company is needed");
        assert_eq!(std::fs::read(&ledger).unwrap(), before);
    }

    #[test]
    fn missing_record_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");
        run(&ledger, &["init"]).unwrap();
        let err = run(&ledger, &["receivable", "rec7"]).unwrap_err();
        assert_eq!(err.to_string(), "rec7 does not exist");
    }

    #[test]
    fn config_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.json");
        let config = dir.path().join("rcl.toml");
        std::fs::write(&config, "[guard]\naccept = \"acceptor_only\"\n").unwrap();
        let config = config.to_str().unwrap();

        run(&ledger, &["init"]).unwrap();
        run(&ledger, &["create-order", "user1", "user2", "10"]).unwrap();
        run(&ledger, &["sign", "order1", "user2", "10"]).unwrap();
        let store = InMemoryLedgerStore::load(&ledger).unwrap();
        let account = Account::valid("user5", "Other Company", Role::Company);
        store.put("user5", serde_json::to_vec(&account).unwrap()).unwrap();
        store.save(&ledger).unwrap();

        assert!(run(&ledger, &["--config", config, "accept", "user5", "rec1"]).is_err());
        run(&ledger, &["accept", "user5", "rec1"]).unwrap();
    }

    #[test]
    fn bad_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("rcl.toml");
        std::fs::write(&config, "scan = \"sideways\"\n").unwrap();
        let err = run(&dir.path().join("ledger.json"), &["--config", config.to_str().unwrap(), "user"]).unwrap_err();
        assert!(err.to_string().starts_with("loading config"));
    }
}
