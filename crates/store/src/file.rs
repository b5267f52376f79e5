use async_trait::async_trait;
use kasen_core::store::error::StoreError;
use kasen_core::store::port::KvStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// # Summary
/// 文件 KV 存储：每个键对应根目录下的一个 JSON 文件。
///
/// # Invariants
/// - 键经过转义后作为文件名，不同键绝不映射到同一文件。
/// - 写入先落临时文件再原子重命名，读者不会看到半写状态。
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// 在全局数据根目录下的 `kv` 子目录创建存储。
    pub fn new() -> Result<Self, StoreError> {
        Self::with_root(crate::config::root_dir().join("kv"))
    }

    /// # Summary
    /// 在指定目录创建存储，目录不存在时自动创建。
    ///
    /// # Errors
    /// 目录无法创建时返回 `StoreError::InitError`。
    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.exists() {
            std::fs::create_dir_all(&root).map_err(|e| StoreError::InitError(e.to_string()))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }
}

// 保留字母数字与 `-_.`，其余字节转为 `%XX`
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.') {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

#[async_trait]
impl KvStore for FileStore {
    async fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_key_is_injective_for_separators() {
        assert_eq!(encode_key("drawings:EUR/USD:5m"), "drawings%3AEUR%2FUSD%3A5m");
        assert_ne!(encode_key("EUR/USD"), encode_key("EUR_USD"));
    }
}
