use clap::Subcommand;
use ecoshake_core::Config;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List the challenges a trigger draws from
    List,
    /// Show one challenge
    Show {
        /// Challenge ID
        id: String,
    },
}

pub fn run(action: CatalogAction) -> CmdResult {
    let catalog = Config::load()?.catalog()?;

    match action {
        CatalogAction::List => print_json(catalog.challenges())?,
        CatalogAction::Show { id } => match catalog.get(&id) {
            Some(challenge) => print_json(challenge)?,
            None => return Err(format!("no challenge with id '{id}'").into()),
        },
    }
    Ok(())
}
