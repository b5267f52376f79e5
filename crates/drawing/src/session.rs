use kasen_core::common::ChartKey;
use kasen_core::config::DrawingConfig;
use kasen_core::drawing::entity::Annotation;
use kasen_core::drawing::error::DrawingError;
use kasen_core::drawing::port::CoordinateMapper;
use kasen_core::store::port::{KvStore, KvStoreExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::shape::Shape;
use crate::state::{DrawingEvent, DrawingState, Transition};

/// # Summary
/// 绑定到某个图表键的绘图会话，负责标注集合的加载与持久化。
///
/// # Invariants
/// - 内存中的标注集合是唯一事实来源；保存失败时标记为脏，下次变更时重试。
/// - 加载失败或数据损坏时回退为空集合，不向上抛错。
pub struct DrawingSession {
    store: Arc<dyn KvStore>,
    key: ChartKey,
    state: DrawingState,
    dirty: bool,
}

impl DrawingSession {
    /// 打开会话并加载该图表键下已保存的标注。
    pub async fn open(store: Arc<dyn KvStore>, key: ChartKey, settings: DrawingConfig) -> Self {
        let mut state = DrawingState::new(settings);
        state.replace_annotations(load(store.as_ref(), &key).await);
        Self {
            store,
            key,
            state,
            dirty: false,
        }
    }

    pub fn key(&self) -> &ChartKey {
        &self.key
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.state.annotations()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn render<M: CoordinateMapper + ?Sized>(&self, mapper: &M) -> Vec<Shape> {
        self.state.render(mapper)
    }

    /// # Summary
    /// 应用一个交互事件，集合变化（或此前保存失败）时写回存储。
    ///
    /// # Returns
    /// 状态机产生的 `Transition`；持久化失败不影响返回值。
    pub async fn dispatch<M: CoordinateMapper + Sync + ?Sized>(
        &mut self,
        event: DrawingEvent,
        mapper: &M,
    ) -> Transition {
        let transition = self.state.reduce(event, mapper);
        if transition.store_changed || self.dirty {
            if let Err(e) = self.flush().await {
                warn!("Drawings for {} kept in memory: {}", self.key, e);
            }
        }
        transition
    }

    /// # Summary
    /// 立即持久化当前标注集合。
    ///
    /// # Errors
    /// 写入失败返回 `DrawingError::Persist`，同时会话保持脏标记。
    pub async fn flush(&mut self) -> Result<(), DrawingError> {
        let result = self
            .store
            .set(&self.key.drawings_key(), &self.state.annotations())
            .await;
        match result {
            Ok(()) => {
                self.dirty = false;
                debug!(
                    "Saved {} drawings for {}",
                    self.state.annotations().len(),
                    self.key
                );
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                Err(DrawingError::Persist(e.to_string()))
            }
        }
    }

    /// # Summary
    /// 切换到另一个图表键。
    ///
    /// # Logic
    /// 1. 尝试保存旧键下尚未落盘的变更。
    /// 2. 加载新键的标注集合（不存在则为空），丢弃草稿与选中状态。
    pub async fn switch_key(&mut self, key: ChartKey) {
        if key == self.key {
            return;
        }
        if self.dirty {
            if let Err(e) = self.flush().await {
                warn!("Unsaved drawings for {} dropped on switch: {}", self.key, e);
            }
        }
        let annotations = load(self.store.as_ref(), &key).await;
        info!("Switched drawings {} -> {} ({} loaded)", self.key, key, annotations.len());
        self.state.replace_annotations(annotations);
        self.key = key;
        self.dirty = false;
    }
}

async fn load(store: &dyn KvStore, key: &ChartKey) -> Vec<Annotation> {
    match store.get::<Vec<Annotation>>(&key.drawings_key()).await {
        Ok(Some(annotations)) => {
            let total = annotations.len();
            let complete: Vec<Annotation> =
                annotations.into_iter().filter(Annotation::is_complete).collect();
            if complete.len() < total {
                warn!(
                    "Dropped {} incomplete drawings for {}",
                    total - complete.len(),
                    key
                );
            }
            complete
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Failed to load drawings for {}: {}", key, e);
            Vec::new()
        }
    }
}
