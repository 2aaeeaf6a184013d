//! Ledger Engine CLI
//!
//! Applies account creation and transfer commands from a CSV file and prints
//! the final account balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > accounts.csv
//! cargo run -- --strategy sync commands.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv > accounts.csv
//! RUST_LOG=info cargo run -- --log-json commands.csv > accounts.csv
//! ```
//!
//! # Processing Strategies
//!
//! - **sync**: Commands applied one by one in file order
//! - **async**: Batches applied on a multi-threaded runtime, transfers from
//!   different source accounts in parallel (default)
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, report not writable, etc.)

use ledger_engine::{cli, logging, strategy};
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();
    logging::init(args.log_json);

    let strategy = {
        let config = (args.strategy == cli::StrategyType::Async).then(|| args.to_batch_config());
        strategy::create_strategy(args.strategy, config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, input = %args.input_file.display(), "processing failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
