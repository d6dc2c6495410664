mod keys;
mod signer;

pub use keys::{derive_account, validate_address, HdWallet, COSMOS_COIN_TYPE, DEFAULT_PREFIX};
pub use signer::Signer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_generation() {
        // BIP39 test vector mnemonic
        let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let wallet = HdWallet::from_mnemonic_no_passphrase(mnemonic, DEFAULT_PREFIX).unwrap();

        assert!(wallet.address.starts_with("orai1"));
        assert_eq!(wallet.account().public_key.len(), 33);
    }

    #[test]
    fn test_deterministic_generation() {
        let mnemonic = "legal winner thank year wave sausage worth useful legal winner thank yellow";

        let signer1 = Signer::from_mnemonic(mnemonic, "orai").unwrap();
        let signer2 = Signer::from_mnemonic(mnemonic, "orai").unwrap();
        assert_eq!(signer1.address(), signer2.address());

        let account = derive_account(mnemonic, "orai").unwrap();
        assert_eq!(signer1.account(), &account);
    }
}
