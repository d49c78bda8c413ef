//! `formguard schemas`: list the bundled schemas.

use clap::Args;
use formguard_validator::NodeSnapshot;

use crate::config::CliConfig;
use crate::schemas;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print each schema's snapshot as JSON instead of its name.
    #[arg(long)]
    pub json: bool,
}

pub fn run_list(args: &ListArgs, config: &CliConfig) -> anyhow::Result<u8> {
    let snapshots = schemas::NAMES
        .iter()
        .map(|name| Ok((*name, schemas::build(name, &config.validator)?.snapshot())))
        .collect::<anyhow::Result<Vec<(&str, NodeSnapshot)>>>()?;

    if args.json {
        let listing: serde_json::Map<String, serde_json::Value> = snapshots
            .into_iter()
            .map(|(name, snapshot)| Ok((name.to_owned(), serde_json::to_value(snapshot)?)))
            .collect::<anyhow::Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for (name, snapshot) in snapshots {
            println!("{name}\t{}", snapshot.description);
        }
    }
    Ok(0)
}
