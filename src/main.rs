fn main() {
    if let Err(err) = action_graph::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
