//! Purpose: Shared reply-envelope JSON builders for CLI and HTTP serving paths.
//! Exports: one builder per catalog operation.
//! Role: Keep the client-visible payload shape identical across entry points.
//! Invariants: Key names and message strings are a fixed contract with API
//! clients, including the Spanish field names; do not rename them.
//! Invariants: Absent values render as JSON null, never as a crash or NaN.

use serde_json::{json, Value};
use time::format_description::BorrowedFormatItem;
use time::Date;

use cartelera::api::{ActorTally, DirectorCredit, ScoreRow, VotesOutcome};

const ISO_DATE: &[BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

const FILM_NOT_FOUND: &str = "Película no encontrada";
const ACTOR_NOT_FOUND: &str = "Actor no encontrado";
const DIRECTOR_NOT_FOUND: &str = "Director no encontrado";
const INVALID_MONTH: &str = "Mes no válido";
const INSUFFICIENT_VOTES: &str = "La película no tiene suficientes votos (menos de 2000)";

pub(crate) fn month_reply(mes: &str, count: Option<usize>) -> Value {
    match count {
        Some(count) => json!({
            "mensaje":
                format!("{count} cantidad de películas fueron estrenadas en el mes de {mes}")
        }),
        None => json!({ "mensaje": INVALID_MONTH }),
    }
}

pub(crate) fn day_reply(dia: &str, count: usize) -> Value {
    json!({
        "mensaje": format!("{count} cantidad de películas fueron estrenadas en los días {dia}")
    })
}

pub(crate) fn score_reply(row: Option<ScoreRow>) -> Value {
    match row {
        Some(row) => json!({
            "titulo": row.title,
            "año_estreno": row.release_year,
            "score": row.popularity,
        }),
        None => json!({ "mensaje": FILM_NOT_FOUND }),
    }
}

/// The votes envelope echoes the query title as typed, matching the upstream
/// contract, rather than the stored title.
pub(crate) fn votes_reply(titulo: &str, outcome: VotesOutcome) -> Value {
    match outcome {
        VotesOutcome::Qualified {
            vote_count,
            vote_average,
        } => json!({
            "titulo": titulo,
            "votos": vote_count,
            "promedio_votos": vote_average,
        }),
        VotesOutcome::BelowThreshold => json!({ "mensaje": INSUFFICIENT_VOTES }),
        VotesOutcome::NotFound => json!({ "mensaje": FILM_NOT_FOUND }),
    }
}

pub(crate) fn actor_reply(nombre: &str, tally: Option<ActorTally>) -> Value {
    match tally {
        Some(tally) => json!({
            "actor": nombre,
            "cantidad_peliculas": tally.films,
            "retorno_total": tally.total_return,
            "promedio_retorno": tally.average_return,
        }),
        None => json!({ "mensaje": ACTOR_NOT_FOUND }),
    }
}

pub(crate) fn director_reply(nombre: &str, credits: Option<Vec<DirectorCredit>>) -> Value {
    match credits {
        Some(credits) => {
            let peliculas: Vec<Value> = credits
                .iter()
                .map(|credit| {
                    json!({
                        "titulo": credit.title,
                        "fecha_lanzamiento": iso_date(credit.release_date),
                        "retorno": credit.return_ratio,
                        "costo": credit.budget,
                        "ganancia": credit.profit,
                    })
                })
                .collect();
            json!({ "director": nombre, "peliculas": peliculas })
        }
        None => json!({ "mensaje": DIRECTOR_NOT_FOUND }),
    }
}

pub(crate) fn recommend_reply(titles: Option<Vec<String>>) -> Value {
    match titles {
        Some(titles) => json!({ "recomendaciones": titles }),
        None => json!({ "mensaje": FILM_NOT_FOUND }),
    }
}

fn iso_date(date: Option<Date>) -> Value {
    date.and_then(|date| date.format(ISO_DATE).ok())
        .map(Value::from)
        .unwrap_or(Value::Null)
}
