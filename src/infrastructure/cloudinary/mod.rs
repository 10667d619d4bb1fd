//! Cloudinary media store adapter.

pub mod client;
pub mod credentials;
pub mod dto;
pub mod upload_form;

pub use client::{CLOUDINARY_API_BASE, CloudinaryClient};
pub use credentials::{ApiSecret, CloudinaryCredentials};
