use async_trait::async_trait;
use dashmap::DashMap;
use kasen_core::store::error::StoreError;
use kasen_core::store::port::KvStore;

/// # Summary
/// 基于 DashMap 的内存 KV 存储，进程退出即丢失。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
#[derive(Default)]
pub struct MemStore {
    storage: DashMap<String, String>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl KvStore for MemStore {
    async fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.storage.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.storage.get(key).map(|v| v.value().clone()))
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.storage.remove(key);
        Ok(())
    }
}
