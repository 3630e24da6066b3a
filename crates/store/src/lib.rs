pub mod charset;
mod commit;
pub mod fsutil;
pub mod serialize;
pub mod writer;

pub use charset::Charset;
pub use commit::{backup_path, staging_path};
pub use serialize::serialize_document;
pub use writer::{DurableWriter, WriteError, WriteOptions};
