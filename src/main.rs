use std::process::ExitCode;

fn main() -> ExitCode {
    match ec2_plans::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
