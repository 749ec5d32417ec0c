use std::process::ExitCode;

fn main() -> ExitCode {
    initree_cli::run()
}
