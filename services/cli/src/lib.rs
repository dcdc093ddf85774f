mod brief;
mod cli;
mod infra;
mod profiles;

use exec_signals::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
