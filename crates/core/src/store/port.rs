use crate::store::error::StoreError;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// # Summary
/// 业务无关的异步 KV 存储接口 (Port)。
///
/// # Invariants
/// - 值以原始字符串存取，确保 Trait 是对象安全的 (Object Safe)。
/// - 数据生命周期与键命名由上游业务层决定。
#[async_trait]
pub trait KvStore: Send + Sync {
    /// # Summary
    /// 写入原始字符串。
    ///
    /// # Logic
    /// 1. 将数据以覆盖方式写入内存或持久化介质。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    /// * `value`: 原始字符串。
    ///
    /// # Returns
    /// 成功返回 Ok，失败返回 `StoreError`。
    async fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// # Summary
    /// 读取原始字符串。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    ///
    /// # Returns
    /// 存在则返回 `Some(String)`，否则返回 `None`。
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Summary
    /// 删除指定键。键不存在时同样返回 Ok。
    async fn del(&self, key: &str) -> Result<(), StoreError>;
}

/// # Summary
/// KV 存储泛型扩展接口，提供 JSON 序列化支持。
///
/// # Invariants
/// - 自动为所有实现 `KvStore` 的类型提供支持。
#[async_trait]
pub trait KvStoreExt: KvStore {
    /// # Summary
    /// 存入强类型对象。
    ///
    /// # Logic
    /// 1. 使用 JSON 序列化对象。
    /// 2. 调用底层 `set_raw` 写入。
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text =
            serde_json::to_string(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.set_raw(key, text).await
    }

    /// # Summary
    /// 取出强类型对象。
    ///
    /// # Logic
    /// 1. 调用底层 `get_raw` 获取字符串。
    /// 2. 使用 JSON 反序列化为目标类型。
    ///
    /// # Returns
    /// 反序列化后的对象或 None。
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key).await? {
            Some(text) => {
                let val = serde_json::from_str(&text)
                    .map_err(|e| StoreError::Deserialize(e.to_string()))?;
                Ok(Some(val))
            }
            None => Ok(None),
        }
    }
}

impl<T: KvStore + ?Sized> KvStoreExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl KvStore for MapStore {
        async fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
            self.0.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        async fn del(&self, key: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Level {
        price: f64,
    }

    #[tokio::test]
    async fn test_typed_get_set() {
        let store = MapStore::default();
        store.set("k", &Level { price: 1.5 }).await.unwrap();
        assert_eq!(store.get::<Level>("k").await.unwrap(), Some(Level { price: 1.5 }));
        assert_eq!(store.get::<Level>("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bad_json_is_deserialize_error() {
        let store = MapStore::default();
        store.set_raw("k", "{not json".to_string()).await.unwrap();
        assert!(matches!(
            store.get::<Level>("k").await,
            Err(StoreError::Deserialize(_))
        ));
    }
}
