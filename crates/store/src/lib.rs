//! `KvStore` 端口的存储适配器。

pub mod config;
pub mod file;
pub mod mem;

pub use file::FileStore;
pub use mem::MemStore;
