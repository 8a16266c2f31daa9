use std::process::ExitCode;

fn main() -> ExitCode {
    civit_fetch_cli_lib::run()
}
