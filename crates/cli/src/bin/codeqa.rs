use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match codeqa_cli::main_entry().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(codeqa_cli::EXIT_CONFIG_ERROR)
        }
    }
}
