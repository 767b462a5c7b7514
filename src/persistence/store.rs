use super::crypto::{self, CryptoKey};
use super::files::storage_file;
use super::security::{SecurityConfig, SecurityError, SecurityMode};
use super::storage::Storage;
use crate::domain::{ListKind, Settings, TaskList};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const SECURITY_KEY: &str = "pomodo.security";
pub const TASKS_KEY: &str = "pomodo.tasks";
pub const BACKLOG_KEY: &str = "pomodo.backlog";
pub const SETTINGS_KEY: &str = "pomodo.settings";

const BLOB_KEYS: [&str; 3] = [TASKS_KEY, BACKLOG_KEY, SETTINGS_KEY];

fn list_key(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Tasks => TASKS_KEY,
        ListKind::Backlog => BACKLOG_KEY,
    }
}

/// Storage wrapper that encrypts every domain blob with the active key
#[derive(Debug)]
pub struct EncryptedStore {
    storage: Storage,
    security: SecurityConfig,
    key: Option<CryptoKey>,
}

impl EncryptedStore {
    /// Open the store in `data_dir`, creating an auto-key config on first run
    pub fn open(data_dir: &Path) -> Result<Self> {
        let mut storage = Storage::open(storage_file(data_dir))?;

        let existing = storage.get(SECURITY_KEY).and_then(|raw| {
            serde_json::from_str::<SecurityConfig>(raw)
                .map_err(|e| tracing::warn!(error = %e, "security config is unreadable"))
                .ok()
        });

        let (security, key) = match existing {
            Some(config) => match config.auto_key() {
                Ok(key) => (config, key),
                Err(e) => {
                    tracing::warn!(error = %e, "auto key is unusable, generating a new one");
                    let (config, key) = SecurityConfig::new_auto();
                    (config, Some(key))
                }
            },
            None => {
                let (config, key) = SecurityConfig::new_auto();
                tracing::info!("created new auto-key security config");
                (config, Some(key))
            }
        };

        let serialized = serde_json::to_string(&security).context("Failed to serialize security config")?;
        if storage.get(SECURITY_KEY) != Some(serialized.as_str()) {
            storage.set(SECURITY_KEY, serialized)?;
        }

        Ok(Self {
            storage,
            security,
            key,
        })
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    /// PIN mode and no PIN entered yet
    pub fn is_locked(&self) -> bool {
        self.key.is_none()
    }

    pub fn unlock(&mut self, pin: &str) -> Result<(), SecurityError> {
        let key = self.security.unlock(pin)?;
        self.key = Some(key);
        tracing::info!("store unlocked");
        Ok(())
    }

    pub fn load_list(&self, kind: ListKind) -> TaskList {
        self.load_blob::<TaskList>(list_key(kind))
            .map(|list| TaskList::from_tasks(list.tasks().to_vec()))
            .unwrap_or_default()
    }

    pub fn save_list(&mut self, kind: ListKind, list: &TaskList) -> Result<()> {
        self.save_blob(list_key(kind), list)
    }

    /// Stored settings, or defaults when missing, undecryptable or invalid
    pub fn load_settings(&self) -> Settings {
        match self.load_blob::<Settings>(SETTINGS_KEY) {
            Some(settings) => match settings.validate() {
                Ok(()) => settings,
                Err(e) => {
                    tracing::warn!(error = %e, "stored settings are invalid, using defaults");
                    Settings::default()
                }
            },
            None => Settings::default(),
        }
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.save_blob(SETTINGS_KEY, settings)
    }

    /// Switch to PIN protection and re-encrypt everything under the PIN key
    pub fn set_pin(&mut self, pin: &str) -> Result<()> {
        let (config, key) = SecurityConfig::new_pin(pin)?;
        self.rekey(config, key)
    }

    /// Switch to a device key and re-encrypt everything under it
    pub fn use_auto_key(&mut self) -> Result<()> {
        let (config, key) = SecurityConfig::new_auto();
        self.rekey(config, key)
    }

    /// Remove all stored data including key material
    pub fn wipe(&mut self) -> Result<()> {
        let (config, key) = SecurityConfig::new_auto();
        let serialized = serde_json::to_string(&config).context("Failed to serialize security config")?;
        let mut entries = BTreeMap::new();
        entries.insert(SECURITY_KEY.to_string(), serialized);
        self.storage.replace_all(entries)?;

        self.security = config;
        self.key = Some(key);
        tracing::warn!("storage wiped");
        Ok(())
    }

    /// Re-encrypt every blob under `key` and store `config` in one write
    fn rekey(&mut self, config: SecurityConfig, key: CryptoKey) -> Result<()> {
        let old_key = self.key.as_ref().context("Store is locked")?;

        let serialized = serde_json::to_string(&config).context("Failed to serialize security config")?;
        let mut changes = vec![(SECURITY_KEY, Some(serialized))];
        for name in BLOB_KEYS {
            let Some(blob) = self.storage.get(name) else {
                continue;
            };
            match crypto::decrypt(old_key, blob) {
                Ok(plain) => {
                    let blob = crypto::encrypt(&key, &plain)
                        .with_context(|| format!("Failed to re-encrypt {}", name))?;
                    changes.push((name, Some(blob)));
                }
                Err(e) => {
                    tracing::warn!(key = name, error = %e, "dropping blob that no longer decrypts");
                    changes.push((name, None));
                }
            }
        }
        self.storage.apply_batch(changes)?;

        let mode = match config.mode {
            SecurityMode::Auto => "auto",
            SecurityMode::Pin => "pin",
        };
        self.security = config;
        self.key = Some(key);
        tracing::info!(mode, "re-encrypted stored data");
        Ok(())
    }

    fn load_blob<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let key = self.key.as_ref()?;
        let blob = self.storage.get(name)?;

        let plain = match crypto::decrypt(key, blob) {
            Ok(plain) => plain,
            Err(e) => {
                tracing::warn!(key = name, error = %e, "could not decrypt stored data");
                return None;
            }
        };
        match serde_json::from_slice(&plain) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = name, error = %e, "stored data is not valid JSON");
                None
            }
        }
    }

    fn save_blob<T: Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        let key = self.key.as_ref().context("Store is locked")?;
        let json = serde_json::to_vec(value).with_context(|| format!("Failed to serialize {}", name))?;
        let blob = crypto::encrypt(key, &json).with_context(|| format!("Failed to encrypt {}", name))?;
        self.storage.set(name, blob)
    }
}
