//! Interchangeable adapters for course-content access.
//!
//! The [`CoursePort`] trait is the capability contract; three adapters
//! satisfy it: [`StubAdapter`] (JSON fixtures), [`FileAdapter`] (local
//! directory scan), and [`RemoteAdapter`] (a placeholder for the live
//! Moodle API). [`AdapterFactory`] builds the one selected by config.

pub mod factory;
pub mod file;
pub mod port;
pub mod remote;
pub mod stub;

pub use factory::AdapterFactory;
pub use file::FileAdapter;
pub use lectern_core::{Error, Result};
pub use port::{CoursePort, PortProbe, verify_port};
pub use remote::RemoteAdapter;
pub use stub::StubAdapter;
