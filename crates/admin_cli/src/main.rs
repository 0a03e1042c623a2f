use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal,
};
use engine::{Engine, Money, NewWalletCmd, WalletKind};
use migration::MigratorTrait;

type AdminResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "guap_admin")]
#[command(about = "Admin utilities for Guap (bootstrap users/wallets)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./guap.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    User(UserCommand),
    #[command(subcommand)]
    Wallet(WalletCommand),
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user; the password is read from the terminal.
    Create {
        #[arg(long)]
        username: String,
    },
}

#[derive(Subcommand, Debug)]
enum WalletCommand {
    Create(WalletCreateArgs),
}

#[derive(Args, Debug)]
struct WalletCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    /// Opening balance, e.g. `150.25`.
    #[arg(long, default_value = "0", value_parser = parse_balance)]
    balance: Money,
    /// One of SAVINGS, CREDIT, CASH, E_WALLET, INVESTMENT.
    #[arg(long, default_value = "CASH", value_parser = parse_kind)]
    kind: WalletKind,
}

fn parse_kind(raw: &str) -> Result<WalletKind, String> {
    WalletKind::try_from(raw.to_ascii_uppercase().as_str()).map_err(|err| err.to_string())
}

fn parse_balance(raw: &str) -> Result<Money, String> {
    raw.parse::<Money>().map_err(|err| err.to_string())
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Typed,
    Erased,
    Ignored,
    Done,
    Cancelled,
}

/// Secret typed key by key, echoed as `*`.
#[derive(Debug, Default)]
struct MaskedInput {
    buf: String,
}

impl MaskedInput {
    fn handle(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Ignored;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => KeyOutcome::Done,
            KeyCode::Esc => KeyOutcome::Cancelled,
            KeyCode::Char('c') if ctrl => KeyOutcome::Cancelled,
            KeyCode::Backspace if self.buf.pop().is_some() => KeyOutcome::Erased,
            KeyCode::Char(ch) if !ctrl => {
                self.buf.push(ch);
                KeyOutcome::Typed
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

fn read_masked(out: &mut impl Write) -> AdminResult<String> {
    let mut input = MaskedInput::default();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match input.handle(key) {
            KeyOutcome::Typed => execute!(out, Print('*'))?,
            KeyOutcome::Erased => execute!(out, Print("\u{8} \u{8}"))?,
            KeyOutcome::Ignored => {}
            KeyOutcome::Done => return Ok(input.buf),
            KeyOutcome::Cancelled => return Err("interrupted".into()),
        }
    }
}

fn read_secret(prompt: &str) -> AdminResult<String> {
    let mut err = std::io::stderr();
    execute!(err, Print(prompt))?;
    terminal::enable_raw_mode()?;
    let secret = read_masked(&mut err);
    terminal::disable_raw_mode()?;
    execute!(err, Print("\n"))?;
    secret
}

fn new_password() -> AdminResult<String> {
    for _ in 0..3 {
        let password = read_secret("Password: ")?;
        if password.is_empty() {
            eprintln!("Password must not be empty.");
            continue;
        }
        if read_secret("Confirm password: ")? == password {
            return Ok(password);
        }
        eprintln!("Passwords do not match. Try again.");
    }
    Err("too many attempts".into())
}

#[tokio::main]
async fn main() -> AdminResult<()> {
    let cli = Cli::parse();

    let db = sea_orm::Database::connect(&cli.database_url).await?;
    migration::Migrator::up(&db, None).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(UserCommand::Create { username }) => {
            let password = new_password()?;
            let username = engine.new_user(&username, &password).await?;
            println!("created user: {username}");
        }
        Command::Wallet(WalletCommand::Create(args)) => {
            let mut cmd = NewWalletCmd::new(&args.owner, &args.name, args.balance).kind(args.kind);
            if let Some(description) = args.description {
                cmd = cmd.description(description);
            }
            let wallet = engine.new_wallet(cmd).await?;
            println!(
                "created wallet: {} ({}) balance {}",
                wallet.name, wallet.id, wallet.balance
            );
        }
    }

    Ok(())
}
