pub mod column_codec;
pub mod logging;

pub use column_codec::{BlobCodec, DbValue};
