mod chunk;

pub use chunk::{chunk, ChunkError};
