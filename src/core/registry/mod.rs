//! Patient registry operations
//!
//! - [`service`] - [`PatientRegistry`], the read and write operations over a record store
//! - [`sort`] - Sort field and order parsing and the stable ordering of views

pub mod service;
pub mod sort;

pub use service::{PatientListing, PatientRegistry};
pub use sort::{sort_views, SortField, SortOrder};
