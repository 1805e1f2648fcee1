use std::path::Path;
use std::{env, fs};

// Places `omniboard.<profile>.toml` beside the built binary as `omniboard.toml`,
// which is where `config::load_config` looks for it.
fn main() {
    let profile = env::var("PROFILE").unwrap();
    let source_file = format!("omniboard.{profile}.toml");
    println!("cargo:rerun-if-changed={source_file}");

    if !Path::new(&source_file).is_file() {
        println!("cargo:warning=No {source_file} found, binary will need OMNIBOARD_CONFIG");
        return;
    }

    let out_dir = env::var("OUT_DIR").unwrap();
    let bin_dir = Path::new(&out_dir)
        .ancestors()
        .nth(3)
        .expect("OUT_DIR is nested inside the profile directory");

    fs::create_dir_all(bin_dir).expect("Failed to create profile directory");
    fs::copy(&source_file, bin_dir.join("omniboard.toml"))
        .unwrap_or_else(|e| panic!("Failed to copy {source_file}: {e}"));
}
