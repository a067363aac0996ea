//! Encrypted on-disk key-value store.
//!
//! Values live in a single JSON map encrypted with XChaCha20-Poly1305. The
//! key is generated on first use and kept next to the data in a file only the
//! owner can read. Every operation holds an exclusive lock on `store.lock`.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::{Engine, engine::general_purpose::STANDARD};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use directories::ProjectDirs;
use fs2::FileExt;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use budgeit_core::{Error, Result, SecureStore};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

const KEY_FILE: &str = "store.key";
const DATA_FILE: &str = "store.enc";
const LOCK_FILE: &str = "store.lock";

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;

fn store_error(context: &str, err: impl Display) -> Error {
    Error::Store {
        message: format!("{}: {}", context, err),
    }
}

/// Encrypted file on disk.
#[derive(Debug, Serialize, Deserialize)]
struct EncryptedData {
    /// Base64-encoded nonce
    nonce: String,
    /// Base64-encoded ciphertext
    ciphertext: String,
}

/// File-backed [`SecureStore`].
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store in `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context("Failed to create data directory")?;
        Ok(Self { dir })
    }

    /// Open the store in the platform data directory.
    pub fn open_default() -> anyhow::Result<Self> {
        let dirs =
            ProjectDirs::from("", "", "budgeit").context("Could not determine data directory")?;
        Self::new(dirs.data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Run `f` while holding the store lock.
    fn locked<R>(&self, f: impl FnOnce() -> Result<R>) -> Result<R> {
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.path(LOCK_FILE))
            .map_err(|e| store_error("failed to open lock file", e))?;

        lock_file
            .lock_exclusive()
            .map_err(|e| store_error("failed to lock store", e))?;

        let result = f();

        lock_file
            .unlock()
            .map_err(|e| store_error("failed to unlock store", e))?;

        result
    }

    fn cipher(&self) -> Result<XChaCha20Poly1305> {
        let key = self.load_or_create_key()?;
        XChaCha20Poly1305::new_from_slice(&key).map_err(|e| store_error("invalid store key", e))
    }

    fn load_or_create_key(&self) -> Result<[u8; KEY_LEN]> {
        let path = self.path(KEY_FILE);

        if path.exists() {
            let encoded =
                fs::read_to_string(&path).map_err(|e| store_error("failed to read key", e))?;
            let bytes = STANDARD
                .decode(encoded.trim())
                .map_err(|e| store_error("malformed key file", e))?;
            return <[u8; KEY_LEN]>::try_from(bytes.as_slice())
                .map_err(|_| store_error("malformed key file", "wrong key length"));
        }

        debug!("Generating store key");
        let mut key = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        write_private(&path, STANDARD.encode(key).as_bytes())?;
        Ok(key)
    }

    fn read_map(&self) -> Result<BTreeMap<String, Value>> {
        let path = self.path(DATA_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let raw = fs::read_to_string(&path).map_err(|e| store_error("failed to read store", e))?;
        let encrypted: EncryptedData = serde_json::from_str(&raw)?;

        let nonce = STANDARD
            .decode(&encrypted.nonce)
            .map_err(|e| store_error("malformed nonce", e))?;
        if nonce.len() != NONCE_LEN {
            return Err(store_error("malformed nonce", "wrong nonce length"));
        }
        let ciphertext = STANDARD
            .decode(&encrypted.ciphertext)
            .map_err(|e| store_error("malformed ciphertext", e))?;

        let plaintext = self
            .cipher()?
            .decrypt(XNonce::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|e| store_error("failed to decrypt store", e))?;

        Ok(serde_json::from_slice(&plaintext)?)
    }

    fn write_map(&self, map: &BTreeMap<String, Value>) -> Result<()> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let plaintext = serde_json::to_vec(map)?;
        let ciphertext = self
            .cipher()?
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|e| store_error("failed to encrypt store", e))?;

        let encrypted = EncryptedData {
            nonce: STANDARD.encode(nonce),
            ciphertext: STANDARD.encode(ciphertext),
        };

        let tmp = self.path(&format!("{}.tmp", DATA_FILE));
        write_private(&tmp, serde_json::to_string_pretty(&encrypted)?.as_bytes())?;
        fs::rename(&tmp, self.path(DATA_FILE))
            .map_err(|e| store_error("failed to replace store", e))
    }
}

/// Write `contents` to `path` readable only by the owner.
///
/// New files are created with mode 0600; an existing file is narrowed to
/// 0600 before anything is written to it.
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .map_err(|e| store_error("failed to open file", e))?;

    #[cfg(unix)]
    file.set_permissions(fs::Permissions::from_mode(0o600))
        .map_err(|e| store_error("failed to set permissions", e))?;

    file.write_all(contents)
        .map_err(|e| store_error("failed to write file", e))?;
    file.sync_all()
        .map_err(|e| store_error("failed to sync file", e))
}

impl SecureStore for FileStore {
    #[instrument(skip(self))]
    fn get_value(&self, key: &str) -> Result<Option<Value>> {
        self.locked(|| Ok(self.read_map()?.remove(key)))
    }

    #[instrument(skip(self, value))]
    fn set_value(&self, key: &str, value: Value) -> Result<()> {
        self.locked(|| {
            let mut map = self.read_map()?;
            map.insert(key.to_string(), value);
            self.write_map(&map)
        })
    }

    #[instrument(skip(self))]
    fn delete(&self, key: &str) -> Result<()> {
        self.locked(|| {
            let mut map = self.read_map()?;
            if map.remove(key).is_some() {
                self.write_map(&map)?;
            }
            Ok(())
        })
    }
}
