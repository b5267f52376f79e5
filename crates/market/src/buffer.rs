use serde::{Deserialize, Serialize};

/// # Summary
/// 固定容量的滚动环形缓冲区。
///
/// # Invariants
/// - 内存空间在初始化时一次性分配，后续不再扩容。
/// - 写满后每次写入覆盖最旧的元素，始终保持最近 N 个。
/// - `head` 指向最旧元素（写满后也是下一个写入位置）。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RollingBuffer<T> {
    // 内部存储容器
    data: Vec<T>,
    // 最大容量
    capacity: usize,
    // 最旧元素的下标
    head: usize,
}

impl<T> RollingBuffer<T> {
    /// # Summary
    /// 创建一个新的滚动缓冲区。
    ///
    /// # Arguments
    /// * `capacity`: 固定容量上限，0 会被提升为 1。
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// # Summary
    /// 推入新元素。
    ///
    /// # Logic
    /// 1. 未满时直接追加。
    /// 2. 已满时覆盖 `head` 处最旧的元素，并后移 `head`。
    ///
    /// # Returns
    /// 被淘汰的最旧元素（未满时为 `None`）。
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.data.len() < self.capacity {
            self.data.push(item);
            return None;
        }
        let evicted = std::mem::replace(&mut self.data[self.head], item);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    /// 第 `index` 旧的元素（0 为最旧）。
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.data.len() {
            return None;
        }
        self.data.get((self.head + index) % self.data.len())
    }

    /// 最新插入的元素。
    pub fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// 按插入顺序（由旧到新）遍历。
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.data.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.head = 0;
    }
}

impl<T: Clone> RollingBuffer<T> {
    /// 按插入顺序复制出全部元素。
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_oldest() {
        let mut buf = RollingBuffer::new(3);
        assert_eq!(buf.push(1), None);
        buf.push(2);
        buf.push(3);
        assert_eq!(buf.push(4), Some(1));
        assert_eq!(buf.push(5), Some(2));
        assert_eq!(buf.to_vec(), vec![3, 4, 5]);
        assert_eq!(buf.last(), Some(&5));
        assert_eq!(buf.get(0), Some(&3));
        assert_eq!(buf.get(3), None);
    }

    #[test]
    fn test_not_full_order() {
        let mut buf = RollingBuffer::new(5);
        buf.push("a");
        buf.push("b");
        assert_eq!(buf.to_vec(), vec!["a", "b"]);
        assert!(!buf.is_full());
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.last(), None);
    }
}
