use itags::cli::{Args, Runner};
use itags::logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_args();
    logging::init_tracing(args.verbose);

    let runner = Runner::new(args);
    match runner.run().await {
        Ok(summary) if summary.all_failed() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            runner.logger().error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
