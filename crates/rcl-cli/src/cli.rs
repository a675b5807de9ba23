use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rcl",
    about = "Receivable Chain Ledger: orders, receivables, discounting and redemption",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger snapshot to read and update
    #[arg(long, global = true, default_value = "rcl-ledger.json")]
    pub ledger: PathBuf,

    /// Contract configuration (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Seed the genesis accounts
    Init,
    /// Show one account, or list all
    User(LookupArgs),
    /// Show one order, or list all
    Order(LookupArgs),
    /// Show one receivable, or list all
    Receivable(LookupArgs),
    /// Issue an order from a company to a supplier
    CreateOrder(CreateOrderArgs),
    /// Sign an order into a receivable
    Sign(SignArgs),
    /// Accept a signed receivable
    Accept(AcceptArgs),
    /// Transfer an accepted receivable to another supplier
    Transfer(TransferArgs),
    /// Apply to a financial institution for discounting
    ApplyDiscount(ApplyDiscountArgs),
    /// Confirm a pending discount
    ConfirmDiscount(ConfirmDiscountArgs),
    /// Redeem a discounted receivable
    Redeem(RedeemArgs),
}

#[derive(Args)]
pub struct LookupArgs {
    pub id: Option<String>,
}

#[derive(Args)]
pub struct CreateOrderArgs {
    pub company: String,
    pub supplier: String,
    pub amount: u64,
}

#[derive(Args)]
pub struct SignArgs {
    pub order: String,
    pub supplier: String,
    /// Amount applied for when discounting
    pub discount_amount: u64,
}

#[derive(Args)]
pub struct AcceptArgs {
    pub company: String,
    pub receivable: String,
}

#[derive(Args)]
pub struct TransferArgs {
    pub receivable: String,
    pub owner: String,
    pub to: String,
}

#[derive(Args)]
pub struct ApplyDiscountArgs {
    pub receivable: String,
    pub owner: String,
    pub financial: String,
}

#[derive(Args)]
pub struct ConfirmDiscountArgs {
    pub receivable: String,
    pub financial: String,
}

#[derive(Args)]
pub struct RedeemArgs {
    pub receivable: String,
    pub company: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init_defaults() {
        let cli = Cli::try_parse_from(["rcl", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init));
        assert_eq!(cli.ledger, PathBuf::from("rcl-ledger.json"));
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_lookup_with_and_without_id() {
        let cli = Cli::try_parse_from(["rcl", "user"]).unwrap();
        if let Command::User(args) = cli.command {
            assert!(args.id.is_none());
        } else { panic!("wrong command"); }

        let cli = Cli::try_parse_from(["rcl", "receivable", "rec1"]).unwrap();
        if let Command::Receivable(args) = cli.command {
            assert_eq!(args.id, Some("rec1".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_create_order() {
        let cli = Cli::try_parse_from(["rcl", "create-order", "user1", "user2", "1000000"]).unwrap();
        if let Command::CreateOrder(args) = cli.command {
            assert_eq!(args.company, "user1");
            assert_eq!(args.supplier, "user2");
            assert_eq!(args.amount, 1_000_000);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(Cli::try_parse_from(["rcl", "create-order", "user1", "user2", "-5"]).is_err());
    }

    #[test]
    fn parse_transfer() {
        let cli = Cli::try_parse_from(["rcl", "transfer", "rec1", "user2", "user3"]).unwrap();
        if let Command::Transfer(args) = cli.command {
            assert_eq!((args.receivable.as_str(), args.owner.as_str(), args.to.as_str()), ("rec1", "user2", "user3"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_confirm_discount() {
        let cli = Cli::try_parse_from(["rcl", "confirm-discount", "rec1", "user4"]).unwrap();
        assert!(matches!(cli.command, Command::ConfirmDiscount(_)));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rcl", "redeem", "rec1", "user1", "--ledger", "/tmp/l.json", "--format", "json", "-v",
        ])
        .unwrap();
        assert_eq!(cli.ledger, PathBuf::from("/tmp/l.json"));
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(cli.verbose);
    }
}
