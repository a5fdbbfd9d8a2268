fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match fastfind_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[fastfind-core] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = fastfind_core::runtime::run_with_options(options) {
        tracing::error!(%error, "runtime failed");
        eprintln!("[fastfind-core] runtime failed: {error}");
        std::process::exit(1);
    }
}
