use std::process::ExitCode;

fn main() -> ExitCode {
    paysys_cli::run()
}
