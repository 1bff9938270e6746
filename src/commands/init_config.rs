use anyhow::{bail, Result};
use fieldmap_settings::Config;

use crate::cli::{Cli, InitConfigArgs};

pub fn run(cli: &Cli, args: &InitConfigArgs) -> Result<()> {
    let path = super::config_path(cli)?;
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save_to_file(&path)?;
    println!("{}", path.display());
    Ok(())
}
