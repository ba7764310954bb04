use std::{ffi::OsStr, io::Write};

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let test_file = std::path::Path::new(&out_dir).join("generated_tests.rs");
    let mut f = std::fs::File::create(test_file).unwrap();

    let fixtures = std::fs::read_dir("tests/data").unwrap().filter_map(|entry| {
        let entry = entry.unwrap();
        let file_type = entry.file_type().unwrap();
        let path = entry.path();
        if file_type.is_file() && path.extension().is_some_and(|e| e == OsStr::new("toml")) {
            Some(path)
        } else {
            None
        }
    });

    println!("cargo:rerun-if-changed=tests/data");

    for fixture in fixtures {
        let name = fixture.file_stem().and_then(|e| e.to_str()).unwrap();
        let path = fixture.canonicalize().unwrap();

        write!(
            f,
            "
#[test]
fn {name}_test() {{
    let fixture = include_str!(\"{path}\");
    run_fixture(\"{name}\", fixture);
}}",
            name = name,
            path = path.display()
        )
        .unwrap();
    }
}
