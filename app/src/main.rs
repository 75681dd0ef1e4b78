use std::process::ExitCode;

use employee_api::app_module;
use employee_db::migrations::Migrator;
use roster::Application;

#[tokio::main]
async fn main() -> ExitCode {
    let result = Application::new()
        .module(app_module::register)
        .migrations::<Migrator>()
        .run()
        .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Config errors can surface before the subscriber is installed
            if tracing::dispatcher::has_been_set() {
                tracing::error!(error = %e, "application failed");
            } else {
                eprintln!("error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}
