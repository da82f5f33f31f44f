//! This build script stamps the current UTC time into the output directory so the
//! wall clock has a sane starting point before the host provides one.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));

    // create rs file with current UTC time
    File::create(out.join("utc.rs"))
        .expect("create utc.rs")
        .write_fmt(format_args!(
            "/// Wall-clock time at build, in milliseconds since the Unix epoch.\npub const BUILD_UTC_EPOCH_MILLIS: i64 = {:?};\n",
            chrono::Utc::now().timestamp_millis()
        ))
        .expect("write utc.rs");

    // Only re-run when the build script itself changes.
    println!("cargo:rerun-if-changed=build.rs");
}
