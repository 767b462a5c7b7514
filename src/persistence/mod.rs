pub mod crypto;
pub mod files;
pub mod security;
pub mod storage;
pub mod store;

pub use crypto::{CryptoError, CryptoKey};
pub use files::{
    atomic_write, ensure_data_dir, get_data_dir, init_local_data_dir, log_file_name, read_file,
    storage_file,
};
pub use security::{validate_pin, SecurityConfig, SecurityError, SecurityMode};
pub use storage::Storage;
pub use store::EncryptedStore;
