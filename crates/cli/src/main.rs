use std::process::ExitCode;

fn main() -> ExitCode {
    linkwise_cli::run()
}
