pub mod config;
pub mod s3;
