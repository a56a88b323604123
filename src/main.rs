use std::process::ExitCode;

fn main() -> ExitCode {
    prioflow::app::startup::startup()
}
