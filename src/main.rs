use std::process::ExitCode;

fn main() -> ExitCode {
    taskboard::cli::main()
}
