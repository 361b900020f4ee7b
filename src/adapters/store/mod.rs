//! Record store backends
//!
//! - [`traits`] - The [`RecordStore`] contract
//! - [`json_file`] - Single JSON file with atomic replace
//! - [`memory`] - Process memory, for tests and throwaway instances
//! - [`factory`] - Builds the backend named in configuration

pub mod factory;
pub mod json_file;
pub mod memory;
pub mod traits;

pub use factory::create_record_store;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::RecordStore;
