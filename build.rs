use std::fs;

fn main() {
    let version_file =
        fs::read_to_string("VERSION").expect("VERSION file not found - run: echo '0.1.0' > VERSION");

    let version = version_file.trim();
    let cargo_version = env!("CARGO_PKG_VERSION");

    if version != cargo_version {
        panic!(
            "VERSION mismatch: VERSION file says {}, Cargo.toml says {}",
            version, cargo_version
        );
    }

    println!("cargo:rerun-if-changed=VERSION");
}
