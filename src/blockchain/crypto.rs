use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors that can occur during cryptographic operations
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Entropy-source failure; fatal and non-retryable
    #[error("Failed to generate keypair: {0}")]
    KeypairGeneration(String),

    #[error("Malformed public key: {0}")]
    MalformedPublicKey(String),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),
}

/// A digital signature in base58 encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DigitalSignature(pub String);

impl DigitalSignature {
    fn from_signature(signature: &Signature) -> Self {
        DigitalSignature(bs58::encode(signature.to_bytes()).into_string())
    }

    fn to_signature(&self) -> Result<Signature, CryptoError> {
        let bytes = bs58::decode(&self.0)
            .into_vec()
            .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;

        let signature_bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CryptoError::MalformedSignature("invalid signature length".to_string()))?;

        Ok(Signature::from_bytes(&signature_bytes))
    }
}

/// Decodes a base58 address back into a verifying key
fn decode_public_key(address: &str) -> Result<VerifyingKey, CryptoError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| CryptoError::MalformedPublicKey(e.to_string()))?;

    let key_bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CryptoError::MalformedPublicKey("invalid public key length".to_string()))?;

    VerifyingKey::from_bytes(&key_bytes).map_err(|e| CryptoError::MalformedPublicKey(e.to_string()))
}

/// Represents a wallet with an ed25519 keypair
///
/// The address is the base58 encoding of the verifying key, so the address
/// doubles as the public key on the wire. Signing uses ed25519 (RFC 8032),
/// which is deterministic for a given key and message.
#[derive(Debug, Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    address: String,
}

impl Wallet {
    /// Generates a new wallet with a random keypair
    pub fn generate() -> Result<Self, CryptoError> {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let verifying_key = VerifyingKey::from(&signing_key);
        let address = bs58::encode(verifying_key.as_bytes()).into_string();

        Ok(Wallet {
            signing_key,
            verifying_key,
            address,
        })
    }

    /// Restores a wallet from an exported secret key
    pub fn from_secret_key(secret_key_bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes_array: [u8; 32] = secret_key_bytes
            .try_into()
            .map_err(|_| CryptoError::KeypairGeneration("invalid private key length".to_string()))?;

        let signing_key = SigningKey::from_bytes(&bytes_array);
        let verifying_key = VerifyingKey::from(&signing_key);
        let address = bs58::encode(verifying_key.as_bytes()).into_string();

        Ok(Wallet {
            signing_key,
            verifying_key,
            address,
        })
    }

    /// Gets the wallet's address (base58 public key)
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Gets the wallet's public key in base58 encoding
    pub fn public_key(&self) -> String {
        bs58::encode(self.verifying_key.as_bytes()).into_string()
    }

    /// Signs a message with the wallet's private key
    pub fn sign(&self, message: &[u8]) -> DigitalSignature {
        DigitalSignature::from_signature(&self.signing_key.sign(message))
    }

    /// Exports the wallet's secret key as bytes
    pub fn export_secret_key(&self) -> Vec<u8> {
        self.signing_key.to_bytes().to_vec()
    }
}

/// Verifies a base58 signature over a message against a base58 public key
///
/// Returns `Ok(false)` for a signature that does not match; errors only when
/// the key or signature encoding itself cannot be decoded.
pub fn verify_signature(
    public_key: &str,
    message: &[u8],
    signature: &DigitalSignature,
) -> Result<bool, CryptoError> {
    let verifying_key = decode_public_key(public_key)?;
    let signature = signature.to_signature()?;

    Ok(verifying_key.verify(message, &signature).is_ok())
}
