// Keystore module - manages the signing key encryption and storage using age encryption
//
// Layout under the key directory (default ~/.metaclaw/keys/):
//   signing.age - the 32-byte Ed25519 seed, age-encrypted with a passphrase
//   key.json    - public key info, readable without the passphrase

use age::secrecy::SecretString;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use ed25519_dalek::SigningKey;
use metaclaw_crypto::{derive_key_id, encode_public_key, generate_keypair};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const SECRET_KEY_FILE: &str = "signing.age";
const KEY_INFO_FILE: &str = "key.json";

/// Environment variable consulted before prompting for a passphrase.
pub const PASSPHRASE_ENV: &str = "METACLAW_PASSPHRASE";

/// Public information about the local signing key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    /// Base64 (standard alphabet) of the raw 32-byte public key
    pub public_key: String,
    pub key_id: String,
    pub created_at: String,
}

/// Encrypts private key bytes with a passphrase using age encryption.
///
/// # Arguments
/// * `key_bytes` - The raw private key bytes to encrypt
/// * `passphrase` - The passphrase to use for encryption
///
/// # Returns
/// Encrypted bytes suitable for file storage
pub fn encrypt_key(key_bytes: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let encryptor = age::Encryptor::with_user_passphrase(SecretString::from(passphrase.to_string()));

    let mut encrypted = vec![];
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .context("Failed to create age encryptor")?;

    writer
        .write_all(key_bytes)
        .context("Failed to write key bytes to encryptor")?;

    writer
        .finish()
        .context("Failed to finalize encryption")?;

    Ok(encrypted)
}

/// Decrypts bytes produced by [`encrypt_key`].
pub fn decrypt_key(encrypted: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let decryptor = match age::Decryptor::new(encrypted).context("Failed to create age decryptor")? {
        age::Decryptor::Passphrase(d) => d,
        _ => return Err(anyhow!("Key file is not passphrase-encrypted")),
    };

    let mut decrypted = vec![];
    let mut reader = decryptor
        .decrypt(&SecretString::from(passphrase.to_string()), None)
        .map_err(|_| anyhow!("Failed to decrypt signing key (wrong passphrase?)"))?;

    reader
        .read_to_end(&mut decrypted)
        .context("Failed to read decrypted bytes")?;

    Ok(decrypted)
}

/// Returns the default key directory (~/.metaclaw/keys/).
pub fn default_key_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    let home = std::env::var("HOME")
        .map_err(|_| anyhow!("HOME environment variable not set"))?;

    #[cfg(windows)]
    let home = std::env::var("USERPROFILE")
        .map_err(|_| anyhow!("USERPROFILE environment variable not set"))?;

    Ok(PathBuf::from(home).join(".metaclaw").join("keys"))
}

/// Generates a new signing key and stores it in `dir`.
///
/// This function:
/// 1. Refuses to overwrite an existing key unless `force` is set
/// 2. Generates a fresh Ed25519 keypair
/// 3. Writes the age-encrypted seed (mode 0600 on unix) and the public key.json
pub fn init_key(dir: &Path, passphrase: &str, force: bool) -> Result<KeyInfo> {
    let secret_path = dir.join(SECRET_KEY_FILE);
    if secret_path.exists() && !force {
        return Err(anyhow!(
            "A signing key already exists at {}. Use --force to overwrite.",
            secret_path.display()
        ));
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create key directory {}", dir.display()))?;

    let (signing_key, verifying_key) = generate_keypair();
    let encrypted = encrypt_key(signing_key.as_bytes(), passphrase)?;
    write_private(&secret_path, &encrypted)?;

    let info = KeyInfo {
        public_key: encode_public_key(&verifying_key),
        key_id: derive_key_id(&verifying_key),
        created_at: now_rfc3339(),
    };
    let json = serde_json::to_string_pretty(&info)?;
    std::fs::write(dir.join(KEY_INFO_FILE), json)
        .with_context(|| format!("Failed to write {}", dir.join(KEY_INFO_FILE).display()))?;

    Ok(info)
}

/// Loads the public key info without touching the encrypted seed.
pub fn load_key_info(dir: &Path) -> Result<KeyInfo> {
    let path = dir.join(KEY_INFO_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| {
        anyhow!(
            "No signing key found at {} ({}). Run 'metaclaw key init' first.",
            path.display(),
            e
        )
    })?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Decrypts the stored seed and checks it against key.json.
pub fn load_signing_key(dir: &Path, passphrase: &str) -> Result<SigningKey> {
    let path = dir.join(SECRET_KEY_FILE);
    let encrypted = std::fs::read(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let seed = decrypt_key(&encrypted, passphrase)?;
    let seed: [u8; 32] = seed
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("Signing key has {} bytes, expected 32", seed.len()))?;
    let signing_key = SigningKey::from_bytes(&seed);

    let info = load_key_info(dir)?;
    let key_id = derive_key_id(&signing_key.verifying_key());
    if info.key_id != key_id {
        return Err(anyhow!(
            "{} does not match the encrypted key (expected {}, found {})",
            KEY_INFO_FILE,
            key_id,
            info.key_id
        ));
    }

    Ok(signing_key)
}

/// Reads the passphrase from METACLAW_PASSPHRASE or prompts for it.
///
/// With `confirm` set, an interactive prompt asks twice and requires a match.
pub fn read_passphrase(confirm: bool) -> Result<String> {
    if let Ok(passphrase) = std::env::var(PASSPHRASE_ENV) {
        if !passphrase.is_empty() {
            return Ok(passphrase);
        }
    }

    let passphrase = rpassword::prompt_password("Passphrase: ")
        .context("Failed to read passphrase")?;
    if passphrase.is_empty() {
        return Err(anyhow!("Passphrase cannot be empty"));
    }

    if confirm {
        let again = rpassword::prompt_password("Confirm passphrase: ")
            .context("Failed to read passphrase")?;
        if again != passphrase {
            return Err(anyhow!("Passphrases do not match"));
        }
    }

    Ok(passphrase)
}

/// Current time as RFC 3339 with second precision, e.g. "2026-01-02T03:04:05Z".
pub fn now_rfc3339() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
