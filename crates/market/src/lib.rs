//! 行情数据管线：报文解码、有界价格历史与互斥的数据生产者（实时 / 回放）。

pub mod buffer;
pub mod feed;
pub mod history;
pub mod line;
pub mod replay;
pub mod source;
pub mod tick;

pub use buffer::RollingBuffer;
pub use feed::FeedConnection;
pub use history::PriceHistory;
pub use line::LineFeed;
pub use replay::{ReplayProducer, ReplaySettings};
pub use source::{SourceEvent, SourceKind, SourceSwitch};
pub use tick::decode_tick;
