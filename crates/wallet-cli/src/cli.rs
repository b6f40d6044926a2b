//! Argument parsing and command dispatch for the `wallet` binary.

use std::collections::HashMap;

use chain_eth::chains::{supported_chains, DEFAULT_CHAIN};
use serde_json::{json, Value};
use thiserror::Error;
use wallet_core::balance::TokenScan;
use wallet_core::config::{RPC_URL_ENV, STRICT_TOKENS_ENV, WALLET_PATH_ENV};
use wallet_core::{
    get_balance, get_history, transfer, ChainRegistry, TokenStore, WalletConfig, WalletError,
    WalletStore,
};

/// Decimals assumed by `token add` without `--decimals`.
const DEFAULT_TOKEN_DECIMALS: u8 = 18;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Unknown command: \"{0}\". Run \"wallet help\" for usage.")]
    UnknownCommand(String),

    #[error("Token \"{symbol}\" not found on chain \"{chain}\"")]
    TokenNotFound { symbol: String, chain: String },

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// `argv` split into command, positionals and `--flag` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub command: String,
    pub positional: Vec<String>,
    pub flags: HashMap<String, String>,
}

impl ParsedArgs {
    fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    fn arg(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    fn chain(&self) -> &str {
        self.flag("chain").unwrap_or(DEFAULT_CHAIN)
    }
}

/// What a successful command prints on stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(Value),
    Text(String),
}

/// Parses the arguments after the program name.
///
/// The first argument is the command (`help` when absent). `--name value`
/// takes the next argument unless it also starts with `--`, in which case
/// the flag is `"true"`. Everything else is positional.
pub fn parse_args<I>(args: I) -> ParsedArgs
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let command = args.next().unwrap_or_else(|| "help".to_string());
    let mut parsed = ParsedArgs {
        command,
        ..Default::default()
    };

    while let Some(arg) = args.next() {
        match arg.strip_prefix("--") {
            Some(name) => {
                let value = match args.peek() {
                    Some(next) if !next.starts_with("--") => args.next().unwrap_or_default(),
                    _ => "true".to_string(),
                };
                parsed.flags.insert(name.to_string(), value);
            }
            None => parsed.positional.push(arg),
        }
    }

    parsed
}

pub fn help_text() -> String {
    let chains: Vec<&str> = supported_chains().iter().map(|c| c.name).collect();
    format!(
        "Usage: wallet <command> [options]

Commands:
  create                          Generate a new wallet
  import <private-key>            Import wallet from private key
  address                         Show wallet address
  balance [--chain <chain>]       Show native + token balances
  send <amount> <to> [options]    Send native currency or tokens
  tokens [--chain <chain>]        List token balances
  history [--chain <chain>]       Recent token transfer history
  token add <symbol> <address>    Register a custom token
  token remove <symbol>           Remove a custom token
  token list                      List custom tokens
  export                          Print private key
  help                            Show this help

Send options:
  --token <symbol|address>        Token to send (default: ETH)
  --chain <chain>                 Chain (default: {DEFAULT_CHAIN})

History options:
  --blocks <n>                    Blocks to scan back from head (default: {blocks})

Token options:
  --decimals <n>                  Token decimals (default: {DEFAULT_TOKEN_DECIMALS})
  --chain <chain>                 Chain (default: {DEFAULT_CHAIN})

Chains: {chains}

Environment:
  {WALLET_PATH_ENV}                     Custom wallet file path (default: .wallet/wallet.json in cwd)
  {RPC_URL_ENV}                  Override the chain's RPC endpoint
  {STRICT_TOKENS_ENV}            Set to 1 to fail on a corrupt tokens.json
  RUST_LOG                        Log filter for stderr (default: warn)",
        blocks = wallet_core::DEFAULT_BLOCK_RANGE,
        chains = chains.join(", "),
    )
}

/// Runs one command against the wallet described by `config`.
pub async fn run(args: &ParsedArgs, config: &WalletConfig) -> Result<Output, CliError> {
    let wallets = WalletStore::from_config(config);
    let tokens = TokenStore::new(&config.tokens_path, config.token_policy);
    let chain = args.chain();

    let value = match args.command.as_str() {
        "help" => return Ok(Output::Text(help_text())),

        "create" => {
            let wallet = wallets.create()?;
            json!({ "status": "created", "address": wallet.address })
        }

        "import" => {
            let key = args
                .arg(0)
                .ok_or_else(|| usage("Usage: wallet import <private-key>"))?;
            let wallet = wallets.import_key(key)?;
            json!({ "status": "imported", "address": wallet.address })
        }

        "address" => json!({ "address": wallets.load()?.address }),

        "balance" => {
            let wallet = wallets.load()?;
            let balance = get_balance(&registry(config, &tokens)?, &wallet.address, chain).await?;
            serde_json::to_value(balance)?
        }

        "tokens" => {
            let wallet = wallets.load()?;
            let balance = get_balance(&registry(config, &tokens)?, &wallet.address, chain).await?;
            serde_json::to_value(TokenScan::from(balance))?
        }

        "history" => {
            let blocks = args
                .flag("blocks")
                .map(|b| {
                    b.parse::<u64>()
                        .map_err(|_| usage("--blocks must be a non-negative integer"))
                })
                .transpose()?;
            let wallet = wallets.load()?;
            let records =
                get_history(&registry(config, &tokens)?, &wallet.address, chain, blocks).await?;
            json!({
                "address": wallet.address,
                "chain": chain,
                "transactions": serde_json::to_value(records)?,
            })
        }

        "send" => {
            let (Some(amount), Some(to)) = (args.arg(0), args.arg(1)) else {
                return Err(usage(
                    "Usage: wallet send <amount> <to> [--token <token>] [--chain <chain>]",
                ));
            };
            let token = args.flag("token").filter(|t| !is_native_alias(t));
            let wallet = wallets.load()?;
            let result =
                transfer(&registry(config, &tokens)?, &wallet, to, amount, token, chain).await?;
            serde_json::to_value(result)?
        }

        "token" => run_token(args, &tokens, chain)?,

        "export" => {
            let wallet = wallets.load()?;
            json!({
                "warning": "NEVER share your private key with anyone!",
                "privateKey": wallet.private_key,
            })
        }

        other => return Err(CliError::UnknownCommand(other.to_string())),
    };

    Ok(Output::Json(value))
}

fn run_token(args: &ParsedArgs, tokens: &TokenStore, chain: &str) -> Result<Value, CliError> {
    let subcommand = args.arg(0);
    if !matches!(subcommand, Some("add" | "remove" | "list")) {
        return Err(usage("Usage: wallet token <add|remove|list> [options]"));
    }

    ChainRegistry::builtin().resolve(chain)?;

    match subcommand {
        Some("add") => {
            let (Some(symbol), Some(address)) = (args.arg(1), args.arg(2)) else {
                return Err(usage(
                    "Usage: wallet token add <symbol> <address> [--decimals <n>] [--chain <chain>]",
                ));
            };
            let decimals = match args.flag("decimals") {
                Some(d) => d
                    .parse::<u8>()
                    .map_err(|_| usage("--decimals must be an integer between 0 and 255"))?,
                None => DEFAULT_TOKEN_DECIMALS,
            };
            let token = tokens.add(chain, symbol, address, decimals)?;
            Ok(json!({ "status": "added", "chain": chain, "token": token }))
        }
        Some("remove") => {
            let symbol = args
                .arg(1)
                .ok_or_else(|| usage("Usage: wallet token remove <symbol> [--chain <chain>]"))?
                .to_uppercase();
            if !tokens.remove(chain, &symbol)? {
                return Err(CliError::TokenNotFound {
                    symbol,
                    chain: chain.to_string(),
                });
            }
            Ok(json!({ "status": "removed", "chain": chain, "symbol": symbol }))
        }
        _ => Ok(serde_json::to_value(tokens.list(Some(chain))?)?),
    }
}

/// The chain registry with the user's token overlay applied.
fn registry(config: &WalletConfig, tokens: &TokenStore) -> Result<ChainRegistry, CliError> {
    Ok(ChainRegistry::new(tokens.load()?).with_rpc_override(config.rpc_url.clone()))
}

/// `--token ETH` and `--token NATIVE` mean the native currency.
fn is_native_alias(token: &str) -> bool {
    token.eq_ignore_ascii_case("ETH") || token.eq_ignore_ascii_case("NATIVE")
}

fn usage(message: &str) -> CliError {
    CliError::Usage(message.to_string())
}
