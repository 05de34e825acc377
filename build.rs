use std::path::{Path, PathBuf};

// include_dir! does not track the embedded files itself.
fn watch_dir(dir: &Path) {
    let entries = std::fs::read_dir(dir).unwrap_or_else(|err| {
        panic!("failed to read {}: {err}", dir.display());
    });
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            watch_dir(&path);
        } else {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR");
    let assets_dir = PathBuf::from(manifest_dir).join("assets");

    println!("cargo:rerun-if-changed=assets");
    watch_dir(&assets_dir);
}
