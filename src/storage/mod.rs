pub mod blob_store;
pub mod image_store;

pub use blob_store::{BlobStore, LocalBlobStore};
pub use image_store::{ImageStore, UploadedImage};
