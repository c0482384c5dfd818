// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use foodgram_backend::{api, database, import, Error, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Override the on-disk database location.
    #[arg(long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load an ingredient fixture file into the database.
    ImportIngredients { path: PathBuf },
    /// Load a tag fixture file into the database.
    ImportTags { path: PathBuf },
    /// Print the aggregated shopping list for a user.
    ShoppingList { username: String },
}

/// This is where the database lives on-disk. On Linux it should be like:
/// `~/.local/share/foodgram/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().expect("failed to get user home directory");
    let path = dirs.data_dir().join("foodgram");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info).expect("failed to initialize logging");

    let args = Args::parse();
    let database_path = match args.database {
        Some(path) => path,
        None => data_path()?.join("data.sqlite"),
    };
    let mut conn = database::establish_connection(database_path)?;

    match args.commands {
        Commands::ImportIngredients { path } => {
            import::import_ingredients(&mut conn, path)?;
        }
        Commands::ImportTags { path } => {
            import::import_tags(&mut conn, path)?;
        }
        Commands::ShoppingList { username: target } => {
            use database::models::UserId;
            use diesel::ExpressionMethods as _;
            use diesel::OptionalExtension as _;
            use diesel::QueryDsl as _;
            use diesel::RunQueryDsl as _;

            let for_user: UserId = {
                use database::schema::users::dsl::*;
                users
                    .filter(username.eq(&target))
                    .select(id)
                    .get_result(&mut conn)
                    .optional()?
                    .ok_or(Error::NotFound("user"))?
            };
            let items = api::shopping_list::shopping_list(&mut conn, for_user)?;
            print!("{}", api::shopping_list::format_shopping_list(&items));
        }
    }
    Ok(())
}
