pub mod config;
pub mod time;

// Wall-clock time at build, stamped by the build script.
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
