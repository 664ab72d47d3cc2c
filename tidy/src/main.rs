use std::env;
use std::process;
use tidy::TidyCli;

fn main() {
    let args: Vec<String> = env::args().collect();
    let cli = TidyCli::new();

    if let Err(e) = cli.run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
