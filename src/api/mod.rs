//! xlrecords API Server module
//!
//! Provides HTTP REST API for reading workbooks and generating `.xlsx` files.
//! Run with `xlrecords-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server};
