//! Format-dependent password encoding: clear, hashed (plain or keyed
//! digest), and reversible AES-256-CBC encryption.
//!
//! Encoding is deterministic: the same `(plaintext, salt, format, key)`
//! tuple always yields the same output, so verification is
//! encode-and-compare. The salt is never omitted and is generated fresh
//! per user.

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use rand::RngExt;
use rand::seq::SliceRandom;
use sha2::{Digest, Sha256, Sha512};

use doorman_core::config::{MembershipConfig, PasswordFormat};
use doorman_core::error::AppError;
use doorman_core::result::AppResult;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Characters used for the non-alphanumeric portion of generated
/// passwords.
const SPECIAL_CHARS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.?";
/// Characters used for the alphanumeric portion of generated passwords.
const ALNUM_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

/// Digest algorithm for the hashed format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashAlgorithm {
    Sha256,
    Sha512,
    HmacSha256,
    HmacSha512,
}

impl HashAlgorithm {
    /// Parse an algorithm name, e.g. `"sha256"` or `"HMACSHA512"`.
    fn parse(name: &str) -> AppResult<Self> {
        match name.to_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "hmacsha256" => Ok(Self::HmacSha256),
            "hmacsha512" => Ok(Self::HmacSha512),
            other => Err(AppError::configuration(format!(
                "Unsupported hash algorithm '{other}'"
            ))),
        }
    }

    /// Whether this is a keyed (MAC) variant requiring a validation key.
    fn is_keyed(self) -> bool {
        matches!(self, Self::HmacSha256 | Self::HmacSha512)
    }
}

/// Encodes, verifies, and (where the format allows) decodes passwords
/// and challenge answers under the configured format.
#[derive(Debug, Clone)]
pub struct PasswordCodec {
    format: PasswordFormat,
    algorithm: HashAlgorithm,
    validation_key: Vec<u8>,
    encryption_key: String,
}

impl PasswordCodec {
    /// Build a codec from configuration, surfacing contradictory
    /// settings as configuration errors at initialization time.
    pub fn from_config(config: &MembershipConfig) -> AppResult<Self> {
        let algorithm = HashAlgorithm::parse(&config.hash_algorithm)?;
        if algorithm.is_keyed() && config.validation_key.is_empty() {
            return Err(AppError::configuration(format!(
                "Hash algorithm '{}' requires a non-empty validation_key",
                config.hash_algorithm
            )));
        }
        if config.password_format == PasswordFormat::Encrypted && config.encryption_key.is_empty() {
            return Err(AppError::configuration(
                "Password format 'encrypted' requires a non-empty encryption_key",
            ));
        }
        Ok(Self {
            format: config.password_format,
            algorithm,
            validation_key: config.validation_key.as_bytes().to_vec(),
            encryption_key: config.encryption_key.clone(),
        })
    }

    /// The configured password format.
    pub fn format(&self) -> PasswordFormat {
        self.format
    }

    /// Generate a fresh random salt as a text-safe encoding.
    pub fn create_salt() -> String {
        let bytes: [u8; 16] = rand::random();
        BASE64.encode(bytes)
    }

    /// Generate a random password with at least `length` characters, of
    /// which at least `min_non_alphanumeric` are special characters.
    pub fn generate_password(length: usize, min_non_alphanumeric: usize) -> String {
        let mut rng = rand::rng();
        let specials = min_non_alphanumeric.min(length);
        let mut chars: Vec<char> = Vec::with_capacity(length);
        for _ in 0..specials {
            chars.push(SPECIAL_CHARS[rng.random_range(0..SPECIAL_CHARS.len())] as char);
        }
        for _ in specials..length {
            chars.push(ALNUM_CHARS[rng.random_range(0..ALNUM_CHARS.len())] as char);
        }
        chars.shuffle(&mut rng);
        chars.into_iter().collect()
    }

    /// Encode a plaintext under the configured format and the given salt.
    pub fn encode(&self, plain: &str, salt: &str) -> AppResult<String> {
        match self.format {
            PasswordFormat::Clear => Ok(plain.to_string()),
            PasswordFormat::Hashed => self.hash(plain, salt),
            PasswordFormat::Encrypted => self.encrypt(plain, salt),
        }
    }

    /// Decode a stored encoding back to plaintext. Only valid for the
    /// clear and encrypted formats; hashes are one-way.
    pub fn decode(&self, encoded: &str, salt: &str) -> AppResult<String> {
        match self.format {
            PasswordFormat::Clear => Ok(encoded.to_string()),
            PasswordFormat::Hashed => Err(AppError::unsupported(
                "Hashed passwords cannot be decoded",
            )),
            PasswordFormat::Encrypted => self.decrypt(encoded, salt),
        }
    }

    /// Verify a plaintext against a stored encoding by re-encoding.
    pub fn verify(&self, plain: &str, salt: &str, stored: &str) -> AppResult<bool> {
        Ok(self.encode(plain, salt)? == stored)
    }

    /// Digest `salt ‖ plaintext` (salt bytes first) under the configured
    /// algorithm.
    fn hash(&self, plain: &str, salt: &str) -> AppResult<String> {
        if salt.is_empty() {
            return Err(AppError::configuration(
                "Hashed format requires a non-empty salt",
            ));
        }
        let mut data = Vec::with_capacity(salt.len() + plain.len());
        data.extend_from_slice(salt.as_bytes());
        data.extend_from_slice(plain.as_bytes());

        let digest = match self.algorithm {
            HashAlgorithm::Sha256 => Sha256::digest(&data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(&data).to_vec(),
            HashAlgorithm::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(&self.validation_key)
                    .map_err(|e| AppError::internal(format!("HMAC key setup failed: {e}")))?;
                mac.update(&data);
                mac.finalize().into_bytes().to_vec()
            }
            HashAlgorithm::HmacSha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(&self.validation_key)
                    .map_err(|e| AppError::internal(format!("HMAC key setup failed: {e}")))?;
                mac.update(&data);
                mac.finalize().into_bytes().to_vec()
            }
        };
        Ok(BASE64.encode(digest))
    }

    /// Key and IV for the reversible format, derived so that encryption
    /// is deterministic per `(plaintext, salt, key)`.
    fn key_iv(&self, salt: &str) -> ([u8; 32], [u8; 16]) {
        let key: [u8; 32] = Sha256::digest(self.encryption_key.as_bytes()).into();
        let salt_digest: [u8; 32] = Sha256::digest(salt.as_bytes()).into();
        let mut iv = [0u8; 16];
        iv.copy_from_slice(&salt_digest[..16]);
        (key, iv)
    }

    fn encrypt(&self, plain: &str, salt: &str) -> AppResult<String> {
        let (key, iv) = self.key_iv(salt);
        let cipher = Aes256CbcEnc::new_from_slices(&key, &iv)
            .map_err(|e| AppError::internal(format!("Cipher setup failed: {e}")))?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plain.as_bytes());
        Ok(BASE64.encode(ciphertext))
    }

    fn decrypt(&self, encoded: &str, salt: &str) -> AppResult<String> {
        let ciphertext = BASE64
            .decode(encoded)
            .map_err(|e| AppError::internal(format!("Stored password is not valid base64: {e}")))?;
        let (key, iv) = self.key_iv(salt);
        let cipher = Aes256CbcDec::new_from_slices(&key, &iv)
            .map_err(|e| AppError::internal(format!("Cipher setup failed: {e}")))?;
        let plain = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|e| AppError::internal(format!("Password decryption failed: {e}")))?;
        String::from_utf8(plain)
            .map_err(|e| AppError::internal(format!("Decrypted password is not UTF-8: {e}")))
    }
}
