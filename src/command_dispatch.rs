//! Purpose: Hold top-level CLI command dispatch for `cartelera`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate execution.
//! Invariants: Each query command loads the table once, then runs one pure
//! lookup against it; output envelopes match the HTTP routes byte for byte.

use super::*;

use cartelera::api::Table;

use crate::serve::ServeConfig;

pub(super) fn dispatch_command(command: Command, data: PathBuf) -> Result<RunOutcome, Error> {
    match command {
        Command::Serve {
            bind,
            allow_non_loopback,
        } => {
            let table = Table::load(&data)?;
            let config = ServeConfig {
                bind,
                allow_non_loopback,
            };
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|err| {
                    Error::new(ErrorKind::Internal)
                        .with_message("failed to start async runtime")
                        .with_source(err)
                })?;
            runtime.block_on(serve::serve(config, table))?;
            Ok(RunOutcome::ok())
        }
        Command::Info => {
            let table = Table::load(&data)?;
            let stats = table.stats();
            emit_json(json!({
                "path": data.to_string_lossy(),
                "rows": stats.rows,
                "dated": stats.dated,
            }));
            Ok(RunOutcome::ok())
        }
        Command::Month { mes } => {
            let table = Table::load(&data)?;
            emit_json(reply::month_reply(&mes, table.count_by_month(&mes)));
            Ok(RunOutcome::ok())
        }
        Command::Day { dia } => {
            let table = Table::load(&data)?;
            emit_json(reply::day_reply(&dia, table.count_by_weekday(&dia)));
            Ok(RunOutcome::ok())
        }
        Command::Score { titulo } => {
            let table = Table::load(&data)?;
            emit_json(reply::score_reply(table.score_by_title(&titulo)));
            Ok(RunOutcome::ok())
        }
        Command::Votes { titulo } => {
            let table = Table::load(&data)?;
            emit_json(reply::votes_reply(&titulo, table.votes_by_title(&titulo)));
            Ok(RunOutcome::ok())
        }
        Command::Actor { nombre } => {
            let table = Table::load(&data)?;
            emit_json(reply::actor_reply(&nombre, table.actor_tally(&nombre)));
            Ok(RunOutcome::ok())
        }
        Command::Director { nombre } => {
            let table = Table::load(&data)?;
            emit_json(reply::director_reply(&nombre, table.director_credits(&nombre)));
            Ok(RunOutcome::ok())
        }
        Command::Recommend { titulo } => {
            let table = Table::load(&data)?;
            emit_json(reply::recommend_reply(table.recommend(&titulo)));
            Ok(RunOutcome::ok())
        }
    }
}
