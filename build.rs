// build.rs

use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Get the output directory set by Cargo
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    let build_date = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    // BUILD_DATE is logged by the daemon at startup
    fs::write(
        &dest_path,
        format!("pub const BUILD_DATE: &str = \"{}\";", build_date),
    ).unwrap();

    // the bundled skin is compiled in, rebuild when it changes
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=resources/LCD.xml.defaults");
}
