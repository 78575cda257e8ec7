//! Generate `friends_ffi.h` into `OUT_DIR`, or into `FRIENDS_FFI_HEADER_DIR`
//! when that is set.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=FRIENDS_FFI_HEADER_DIR");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let out_dir = env::var("FRIENDS_FFI_HEADER_DIR")
        .or_else(|_| env::var("OUT_DIR"))
        .unwrap_or_else(|_| ".".to_string());

    let header = PathBuf::from(out_dir).join("friends_ffi.h");
    match cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("FRIENDS_FFI_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(&header);
        }
        // A header failure must not break the library build.
        Err(err) => println!("cargo:warning=cbindgen failed: {err}"),
    }
}
