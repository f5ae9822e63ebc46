use glob::glob;
use std::{fs::File, io, path::PathBuf};

pub fn get_fixtures() -> Vec<(String, String)> {
    let pattern = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/*.plats");
    glob(pattern)
        .expect("Failed to load fixtures")
        .filter_map(Result::ok)
        .map(open_plats_file)
        .filter_map(Result::ok)
        .collect()
}

fn open_plats_file(path: PathBuf) -> io::Result<(String, String)> {
    use std::io::Read;
    let name = path.file_stem().expect("Fixture should be file");
    let name = name.to_str().expect("Invalid fixture file name").to_owned();
    let mut file = File::open(path)?;
    let mut s = String::new();
    file.read_to_string(&mut s)?;
    Ok((name, s))
}
