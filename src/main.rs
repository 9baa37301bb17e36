//! release_flow - release workflow automation against GitHub or Gitee.

use release_flow::cli::{self, Args, OutputManager};
use std::process;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    let debug = args.debug;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if debug { "debug" } else { "info" }),
    )
    .init();

    match cli::run(args).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) if e.is_remote_ref_missing() => {
            let output = OutputManager::new(debug, false);
            output.warn(&e.to_string());
            for suggestion in e.recovery_suggestions() {
                output.indent(&suggestion);
            }
            process::exit(0);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(debug, false);
            if debug {
                output.error(&format!("Fatal error: {e:?}"));
            } else {
                output.error(&format!("Fatal error: {e}"));
            }

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
