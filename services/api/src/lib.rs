mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use skills_diagnostic::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
