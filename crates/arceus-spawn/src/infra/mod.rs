//! Infrastructure layer - I/O and external dependencies
//!
//! Record byte layouts, encounter table files and the memory channel seam.

pub mod channel;
pub mod records;
pub mod table_io;
