//! Handler for `gopack version`.

pub fn exec() {
    println!("gopack version {}", gopack_core::GOPACK_VERSION);
}
