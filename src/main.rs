use anyhow::Result;

use statsig_console::{
    provider::ProviderConfig,
    resources::{DynamicConfigModel, TagModel, TargetAppModel},
    ConsoleOptions, Provider,
};

/// Prints the tags, target apps and dynamic configs of the project owning
/// the key in STATSIG_CONSOLE_KEY.
#[tokio::main]
async fn main() -> Result<()> {
    let provider = Provider::configure(&ProviderConfig::default(), ConsoleOptions::default())?;

    let tags = provider.data_source::<TagModel>().read().await?;
    println!("{}", serde_json::to_string_pretty(&tags)?);

    let target_apps = provider.data_source::<TargetAppModel>().read().await?;
    println!("{}", serde_json::to_string_pretty(&target_apps)?);

    let dynamic_configs = provider.data_source::<DynamicConfigModel>().read().await?;
    println!("{}", serde_json::to_string_pretty(&dynamic_configs)?);

    Ok(())
}
