#![forbid(unsafe_code)]

mod startup;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    startup::run().await
}
