//! Consolidated integration tests for anyconv.

mod containers;
mod converters;
mod errors;
mod hooks;
mod scalars;
mod scan_list;
mod structs;
