//! starprep entry point.

use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = starprep::app::run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
