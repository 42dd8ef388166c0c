// ABOUTME: Build script for the storage package
// ABOUTME: Rebuilds when migrations change so the embedded schema stays current

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
