fn main() {
    if let Err(err) = md_mindmap::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
