use secp256k1::{All, Message, Secp256k1};
use sha2::{Digest, Sha256};

use super::keys::{HdWallet, COSMOS_COIN_TYPE};
use crate::chain::error::{ChainError, Result};
use crate::chain::types::{Account, Signature};

/// Transaction signer for Cosmos SDK chains
/// Owns the derived key material for the process lifetime and produces
/// SIGN_MODE_DIRECT signatures. Performs no network I/O.
pub struct Signer {
    wallet: HdWallet,
    account: Account,
    secp: Secp256k1<All>,
}

impl Signer {
    pub fn new(wallet: HdWallet) -> Self {
        let account = wallet.account();
        Self {
            wallet,
            account,
            secp: Secp256k1::new(),
        }
    }

    /// Derive the signing key for `mnemonic` with the Cosmos coin type
    pub fn from_mnemonic(mnemonic: &str, prefix: &str) -> Result<Self> {
        Self::from_mnemonic_with_coin_type(mnemonic, prefix, COSMOS_COIN_TYPE)
    }

    pub fn from_mnemonic_with_coin_type(mnemonic: &str, prefix: &str, coin_type: u32) -> Result<Self> {
        let wallet = HdWallet::from_mnemonic(mnemonic, "", prefix, coin_type)?;
        log::debug!("Derived signing account {}", wallet.address);
        Ok(Self::new(wallet))
    }

    /// The account this signer signs for
    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn address(&self) -> &str {
        &self.account.address
    }

    /// Sign arbitrary payload bytes: compact ECDSA over SHA-256(payload).
    /// `account` must be this signer's own account.
    pub fn sign(&self, account: &Account, payload: &[u8]) -> Result<Signature> {
        if account != &self.account {
            return Err(ChainError::SigningError(format!(
                "signer holds keys for {}, asked to sign for {}",
                self.account.address, account.address
            )));
        }

        let hash: [u8; 32] = Sha256::digest(payload).into();
        let message = Message::from_digest_slice(&hash)
            .map_err(|e| ChainError::SigningError(e.to_string()))?;

        let private_key = self.wallet.private_key()?;
        let signature = self.secp.sign_ecdsa(&message, &private_key);

        Ok(Signature(signature.serialize_compact()))
    }

    /// Check a signature produced by `sign` against the signer's public key
    pub fn verify(&self, payload: &[u8], signature: &Signature) -> bool {
        let hash: [u8; 32] = Sha256::digest(payload).into();
        let (Ok(message), Ok(sig), Ok(public_key)) = (
            Message::from_digest_slice(&hash),
            secp256k1::ecdsa::Signature::from_compact(signature.as_bytes()),
            secp256k1::PublicKey::from_slice(&self.account.public_key),
        ) else {
            return false;
        };
        self.secp.verify_ecdsa(&message, &sig, &public_key).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::wallet::derive_account;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_transaction_signing() {
        let signer = Signer::from_mnemonic(TEST_MNEMONIC, "orai").unwrap();
        let account = signer.account().clone();
        let payload = b"test sign doc bytes";

        let signature = signer.sign(&account, payload).unwrap();
        assert_eq!(signature.as_bytes().len(), 64);

        // RFC6979 nonces make signing deterministic
        let signature2 = signer.sign(&account, payload).unwrap();
        assert_eq!(signature, signature2);

        assert!(signer.verify(payload, &signature));
        assert!(!signer.verify(b"tampered", &signature));
    }

    #[test]
    fn test_signer_matches_derived_account() {
        let signer = Signer::from_mnemonic(TEST_MNEMONIC, "orai").unwrap();
        let account = derive_account(TEST_MNEMONIC, "orai").unwrap();
        assert_eq!(signer.account(), &account);
    }

    #[test]
    fn test_foreign_account_rejected() {
        let signer = Signer::from_mnemonic(TEST_MNEMONIC, "orai").unwrap();
        let other = derive_account(
            "legal winner thank year wave sausage worth useful legal winner thank yellow",
            "orai",
        )
        .unwrap();

        match signer.sign(&other, b"payload") {
            Err(ChainError::SigningError(msg)) => assert!(msg.contains(&other.address)),
            other => panic!("expected SigningError, got {:?}", other),
        }
    }
}
