//! Cross-module tests over the public API: configuration -> wallet file ->
//! token overlay -> chain registry. Everything here stays offline.

use wallet_core::send::resolve_token;
use wallet_core::*;

const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";

#[test]
fn token_overlay_flows_into_resolved_chain() {
    let dir = tempfile::tempdir().unwrap();
    let config = WalletConfig::with_wallet_path(dir.path().join("agent").join("wallet.json"));

    let wallet = WalletStore::from_config(&config).create().unwrap();
    assert!(config.wallet_path.exists());

    let tokens = TokenStore::new(&config.tokens_path, config.token_policy);
    tokens.add("base", "dai", DAI, 18).unwrap();
    assert_eq!(
        config.tokens_path.parent(),
        config.wallet_path.parent(),
        "token registry must sit next to the wallet"
    );

    let registry = ChainRegistry::new(tokens.load().unwrap());
    let base = registry.resolve("base").unwrap();
    assert_eq!(base.symbols(), vec!["USDC", "WETH", "DAI"]);
    assert_eq!(resolve_token(&base, "Dai").unwrap().address, DAI);

    // Other chains are untouched.
    let ethereum = registry.resolve("ethereum").unwrap();
    assert!(ethereum.token("DAI").is_none());

    assert_eq!(WalletStore::from_config(&config).load().unwrap(), wallet);
}

#[test]
fn removing_overlay_restores_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let config = WalletConfig::with_wallet_path(dir.path().join("wallet.json"));
    let tokens = TokenStore::new(&config.tokens_path, config.token_policy);

    tokens
        .add("base", "USDC", "0x000000000000000000000000000000000000dEaD", 6)
        .unwrap();
    let shadowed = ChainRegistry::new(tokens.load().unwrap()).resolve("base").unwrap();
    assert_eq!(
        shadowed.token("USDC").unwrap().address,
        "0x000000000000000000000000000000000000dEaD"
    );

    assert!(tokens.remove("base", "usdc").unwrap());
    assert!(tokens.list(None).unwrap().is_empty());

    let restored = ChainRegistry::new(tokens.load().unwrap()).resolve("base").unwrap();
    assert_eq!(
        restored.token("USDC").unwrap().address,
        ChainRegistry::builtin().resolve("base").unwrap().token("USDC").unwrap().address
    );
}

#[test]
fn independent_wallet_paths_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let a = WalletStore::new(dir.path().join("a").join("wallet.json"));
    let b = WalletStore::new(dir.path().join("b").join("wallet.json"));

    let wa = a.create().unwrap();
    let wb = b.create().unwrap();

    assert_ne!(wa.address, wb.address);
    assert_eq!(a.load().unwrap().address, wa.address);
    assert_eq!(b.load().unwrap().address, wb.address);
}
