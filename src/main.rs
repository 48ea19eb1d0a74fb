pub mod calculation;
pub mod config;
pub mod crawler;
pub mod declare;
pub mod driver;
pub mod logging;
pub mod util;

use std::io;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let settings = config::App::load()?;
    let mut out = io::stdout().lock();

    driver::start(&settings, util::datetime::today(), &mut out).await
}
