use anyhow::Result;
use catalog_synth::utils::logging;
use catalog_synth::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::load()?;

    // 初始化并运行应用
    let _report = App::initialize(config)?.run().await?;

    Ok(())
}
