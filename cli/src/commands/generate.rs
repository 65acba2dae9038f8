use pvesd_common::config::Config;
use pvesd_core::pipeline;

pub async fn generate(cfg: &Config) -> anyhow::Result<()> {
    let client = pipeline::connect(cfg)?;
    pipeline::generate(&client, cfg).await?;
    Ok(())
}
