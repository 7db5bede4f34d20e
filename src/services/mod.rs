pub mod cloudinary_service;
pub mod media_host;

pub use cloudinary_service::CloudinaryClient;
pub use media_host::{MediaHost, MediaHostError, UploadOptions, UploadedAsset};
