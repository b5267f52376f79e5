//! Kasen 核心领域层：实体、端口 (Port) 与领域错误。
//!
//! 本 crate 不包含任何具体实现，所有适配器（存储、行情源、视口映射）
//! 均在外部 crate 中实现并通过 trait 注入。

pub mod alert;
pub mod common;
pub mod config;
pub mod drawing;
pub mod indicator;
pub mod market;
pub mod store;
