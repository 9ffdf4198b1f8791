use anyhow::Result;
use tidyup_core::configs::targets::targets_config_schema;

pub fn execute() -> Result<()> {
    println!("{}", targets_config_schema()?);
    Ok(())
}
