//! Account resolution.
//!
//! The scanner only ever reads balances. A private key, when given, is used to
//! derive the address and then dropped; nothing is signed.

use crate::errors::{AppError, Result};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use std::str::FromStr;

/// Resolve the account to scan with.
///
/// A watch-only address wins over a private key. Neither being set is valid
/// and yields `None`.
pub fn resolve_account(
    watch_address: Option<&str>,
    private_key: Option<&str>,
) -> Result<Option<Address>> {
    if let Some(raw) = watch_address {
        let raw = raw.trim();
        let address = Address::from_str(raw)
            .map_err(|e| AppError::Config(format!("WALLET_ADDRESS `{raw}` is invalid: {e}")))?;
        return Ok(Some(address));
    }
    match private_key {
        Some(key) => Ok(Some(address_from_key(key)?)),
        None => Ok(None),
    }
}

/// Derive the address of a hex private key, with or without `0x`.
pub fn address_from_key(key: &str) -> Result<Address> {
    let wallet = LocalWallet::from_str(key.trim())?;
    Ok(wallet.address())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development key (hardhat/anvil account #0).
    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn derives_address_with_and_without_prefix() {
        let expected = Address::from_str(DEV_ADDRESS).unwrap();
        assert_eq!(address_from_key(DEV_KEY).unwrap(), expected);
        assert_eq!(address_from_key(&format!("0x{DEV_KEY}")).unwrap(), expected);
    }

    #[test]
    fn watch_address_takes_precedence() {
        let watch = "0x000000000000000000000000000000000000dEaD";
        let account = resolve_account(Some(watch), Some(DEV_KEY)).unwrap();
        assert_eq!(account, Some(Address::from_str(watch).unwrap()));
    }

    #[test]
    fn missing_account_is_not_an_error() {
        assert_eq!(resolve_account(None, None).unwrap(), None);
    }

    #[test]
    fn garbage_key_is_rejected() {
        assert!(resolve_account(None, Some("not-a-key")).is_err());
    }
}
