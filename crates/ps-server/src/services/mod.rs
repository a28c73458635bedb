//! Storage services for uploaded documents and the room → file map.

pub mod blob_store;
pub mod room_files;
pub mod s3;
