//! On-disk store format: MessagePack object graph, gzip-compressed.

pub mod compression;
pub mod reader;
pub mod writer;

pub use reader::StoreReader;
pub use writer::StoreWriter;
