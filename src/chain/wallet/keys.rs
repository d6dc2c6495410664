use std::fmt;

use bech32::{self, Hrp};
use bip32::{ChildNumber, XPrv};
use bip39::Mnemonic;
use ripemd::Ripemd160;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::chain::error::{ChainError, Result};
use crate::chain::types::Account;

/// Cosmos Hub coin type, used by Oraichain wallets
pub const COSMOS_COIN_TYPE: u32 = 118;
pub const DEFAULT_PREFIX: &str = "orai";

/// HD wallet for Cosmos SDK chains
/// Implements BIP32 derivation along m/44'/{coin_type}'/0'/0/0.
/// Private key bytes are wiped when the wallet is dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HdWallet {
    #[zeroize(skip)]
    pub address: String,

    private_key_bytes: [u8; 32],
    public_key_bytes: [u8; 33],
}

impl HdWallet {
    /// Create a wallet from a BIP39 mnemonic phrase with optional passphrase
    pub fn from_mnemonic(
        mnemonic_str: &str,
        passphrase: &str,
        prefix: &str,
        coin_type: u32,
    ) -> Result<Self> {
        // Word list and checksum validation
        let mnemonic = Mnemonic::parse(mnemonic_str)
            .map_err(|e| ChainError::InvalidMnemonic(e.to_string()))?;

        let mut seed = mnemonic.to_seed(passphrase);
        let derived = derive_private_key_bip32(&seed, coin_type);
        seed.zeroize();
        let mut private_key = derived?;

        let secp = Secp256k1::signing_only();
        let secret_key = SecretKey::from_slice(&private_key)
            .map_err(|e| ChainError::InvalidMnemonic(format!("derived key rejected: {}", e)))?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        let address = generate_cosmos_address(&public_key, prefix)?;

        let mut private_key_bytes = [0u8; 32];
        private_key_bytes.copy_from_slice(&private_key);
        private_key.zeroize();

        Ok(Self {
            address,
            private_key_bytes,
            public_key_bytes: public_key.serialize(),
        })
    }

    /// Create a wallet from a BIP39 mnemonic with no passphrase and the Cosmos coin type
    pub fn from_mnemonic_no_passphrase(mnemonic_str: &str, prefix: &str) -> Result<Self> {
        Self::from_mnemonic(mnemonic_str, "", prefix, COSMOS_COIN_TYPE)
    }

    /// Get the private key as a SecretKey (for signing)
    pub(crate) fn private_key(&self) -> Result<SecretKey> {
        SecretKey::from_slice(&self.private_key_bytes)
            .map_err(|e| ChainError::SigningError(format!("private key unavailable: {}", e)))
    }

    /// Compressed public key (33 bytes)
    pub fn public_key_compressed(&self) -> [u8; 33] {
        self.public_key_bytes
    }

    /// Public half of the wallet
    pub fn account(&self) -> Account {
        Account {
            address: self.address.clone(),
            public_key: self.public_key_bytes.to_vec(),
        }
    }
}

impl fmt::Debug for HdWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdWallet")
            .field("address", &self.address)
            .field("private_key_bytes", &"<redacted>")
            .finish()
    }
}

/// Derive the account for a mnemonic without keeping any key material around.
pub fn derive_account(mnemonic: &str, prefix: &str) -> Result<Account> {
    HdWallet::from_mnemonic_no_passphrase(mnemonic, prefix).map(|w| w.account())
}

/// Derive a private key using BIP32 HD derivation
fn derive_private_key_bip32(seed: &[u8], coin_type: u32) -> Result<[u8; 32]> {
    let derive_err = |e: bip32::Error| ChainError::InvalidMnemonic(format!("key derivation failed: {}", e));

    let xprv = XPrv::new(seed).map_err(derive_err)?;

    // m/44'/coin_type'/0'/0/0
    let derived = xprv
        .derive_child(ChildNumber::new(44, true).map_err(derive_err)?)
        .and_then(|k| k.derive_child(ChildNumber::new(coin_type, true)?))
        .and_then(|k| k.derive_child(ChildNumber::new(0, true)?))
        .and_then(|k| k.derive_child(ChildNumber::new(0, false)?))
        .and_then(|k| k.derive_child(ChildNumber::new(0, false)?))
        .map_err(derive_err)?;

    Ok(derived.to_bytes())
}

/// bech32(prefix, RIPEMD160(SHA256(compressed pubkey)))
fn generate_cosmos_address(public_key: &PublicKey, prefix: &str) -> Result<String> {
    let sha = Sha256::digest(public_key.serialize());
    let hash = Ripemd160::digest(sha);

    let hrp = Hrp::parse(prefix)
        .map_err(|e| ChainError::InvalidArgument(format!("invalid address prefix '{}': {}", prefix, e)))?;
    bech32::encode::<bech32::Bech32>(hrp, &hash)
        .map_err(|e| ChainError::Encoding(format!("bech32 encoding failed: {}", e)))
}

/// Structural check of a bech32 account or contract address.
/// Returns the human-readable prefix on success.
pub fn validate_address(address: &str) -> std::result::Result<String, String> {
    let (hrp, data) = bech32::decode(address).map_err(|e| format!("malformed address '{}': {}", address, e))?;
    if data.len() != 20 && data.len() != 32 {
        return Err(format!(
            "malformed address '{}': unexpected payload length {}",
            address,
            data.len()
        ));
    }
    Ok(hrp.to_string())
}
