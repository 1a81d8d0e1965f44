//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `geneu_core` linkage.
//! - Open the configured store and optionally run one similarity query.
//!
//! Usage: `geneu [<person_uuid> <relation>]`, configured through `GENEU_*`
//! environment variables.

use geneu_core::db::migrations::current_user_version;
use geneu_core::{
    open_db_from_config, CoreConfig, RelationKind, SimilarityService, SqliteGenealogyRepository,
};
use log::error;
use std::process::ExitCode;
use uuid::Uuid;

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("geneu: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    geneu_core::init_logging_from_config(&config)?;

    println!("geneu_core ping={}", geneu_core::ping());
    println!("geneu_core version={}", geneu_core::core_version());

    let conn = open_db_from_config(&config).map_err(|err| err.to_string())?;
    let schema_version = current_user_version(&conn).map_err(|err| err.to_string())?;
    println!("geneu_core schema_version={schema_version}");

    match args.as_slice() {
        [] => Ok(()),
        [person, relation] => {
            let person_uuid = Uuid::parse_str(person)
                .map_err(|_| format!("invalid person uuid `{person}`"))?;
            let relation: RelationKind = relation.parse()?;
            let repo = SqliteGenealogyRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let similar = SimilarityService::new(repo)
                .find_similar(person_uuid, relation)
                .map_err(|err| err.to_string())?;
            for found in similar {
                println!("{}\t{}", found.uuid, found.name);
            }
            Ok(())
        }
        _ => Err("usage: geneu [<person_uuid> <relation>]".to_string()),
    }
}
