//! Purpose: Implement the six catalog lookups over the immutable table.
//! Exports: `ScoreRow`, `VotesOutcome`, `ActorTally`, `DirectorCredit`, query methods.
//! Role: Pure read-only engine; every operation is total over any string input.
//! Invariants: First matching row in table order is authoritative for
//! single-record lookups; absent fields never match and never enter sums.
//! Invariants: Queries allocate only call-local state, so concurrent callers
//! share the table without locking.

use time::Date;

use crate::core::calendar;
use crate::core::dataset::{Film, Table};

/// Minimum vote count for `votes_by_title` to report averages (inclusive).
pub const VOTE_THRESHOLD: i64 = 2000;

/// How many similar rows are ranked before the query title is excluded.
const RECOMMEND_POOL: usize = 6;
/// How many titles a recommendation reply may carry.
const RECOMMEND_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRow {
    pub title: String,
    pub release_year: Option<i32>,
    pub popularity: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VotesOutcome {
    NotFound,
    BelowThreshold,
    Qualified {
        vote_count: i64,
        vote_average: Option<f64>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActorTally {
    pub films: usize,
    pub total_return: f64,
    pub average_return: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectorCredit {
    pub title: String,
    pub release_date: Option<Date>,
    pub return_ratio: Option<f64>,
    pub budget: Option<f64>,
    pub profit: Option<f64>,
}

impl Table {
    /// Count films released in the given Spanish month name. `None` means the
    /// month name itself is invalid; undated rows never match.
    pub fn count_by_month(&self, month_name: &str) -> Option<usize> {
        let month = calendar::month_from_spanish(month_name)?;
        let count = self
            .films
            .iter()
            .filter(|film| film.release_date.is_some_and(|date| date.month() == month))
            .count();
        Some(count)
    }

    /// Count films released on the given weekday. Day names are matched
    /// case-insensitively against the calendar's native names; an
    /// unrecognized name simply counts zero. Matching is exact apart from
    /// casing, so stray whitespace also counts zero.
    pub fn count_by_weekday(&self, day_name: &str) -> usize {
        let needle = day_name.to_lowercase();
        self.films
            .iter()
            .filter(|film| {
                film.release_date
                    .is_some_and(|date| calendar::weekday_name(date.weekday()) == needle)
            })
            .count()
    }

    /// First row whose title equals `title` case-insensitively, in table order.
    pub fn find_by_title(&self, title: &str) -> Option<&Film> {
        let needle = title.to_lowercase();
        self.films
            .iter()
            .find(|film| film.title.to_lowercase() == needle)
    }

    pub fn score_by_title(&self, title: &str) -> Option<ScoreRow> {
        let film = self.find_by_title(title)?;
        Some(ScoreRow {
            title: film.title.clone(),
            release_year: film.release_date.map(|date| date.year()),
            popularity: film.popularity,
        })
    }

    /// Vote summary for a title. An absent vote count is below threshold, not
    /// an error; the threshold is inclusive at [`VOTE_THRESHOLD`].
    pub fn votes_by_title(&self, title: &str) -> VotesOutcome {
        let Some(film) = self.find_by_title(title) else {
            return VotesOutcome::NotFound;
        };
        match film.vote_count {
            Some(vote_count) if vote_count >= VOTE_THRESHOLD => VotesOutcome::Qualified {
                vote_count,
                vote_average: film.vote_average,
            },
            _ => VotesOutcome::BelowThreshold,
        }
    }

    /// Aggregate view over all rows whose credits field contains `name`.
    /// The credits field is shared between actor and director lookups
    /// (inherited dataset defect, reproduced); an absent return contributes 0.
    pub fn actor_tally(&self, name: &str) -> Option<ActorTally> {
        let matches: Vec<&Film> = self.credit_matches(name).collect();
        if matches.is_empty() {
            return None;
        }
        let films = matches.len();
        let total_return: f64 = matches
            .iter()
            .map(|film| film.return_ratio.unwrap_or(0.0))
            .sum();
        let average_return = if films > 0 {
            total_return / films as f64
        } else {
            0.0
        };
        Some(ActorTally {
            films,
            total_return,
            average_return,
        })
    }

    /// Per-film view over the same credits match, in table order.
    pub fn director_credits(&self, name: &str) -> Option<Vec<DirectorCredit>> {
        let credits: Vec<DirectorCredit> = self
            .credit_matches(name)
            .map(|film| DirectorCredit {
                title: film.title.clone(),
                release_date: film.release_date,
                return_ratio: film.return_ratio,
                budget: film.budget,
                profit: film
                    .revenue
                    .zip(film.budget)
                    .map(|(revenue, budget)| revenue - budget),
            })
            .collect();
        if credits.is_empty() {
            None
        } else {
            Some(credits)
        }
    }

    /// Up to five titles closest in popularity to the queried film, ascending
    /// by distance with table order breaking ties. The distance column is
    /// call-local; the shared table is never written. Rows without a
    /// popularity rank as maximally dissimilar, and a target without one
    /// yields an empty list. Exclusion of the query title is case-SENSITIVE
    /// while the lookup is case-insensitive; the mismatch is inherited from
    /// the upstream contract and covered by tests.
    pub fn recommend(&self, title: &str) -> Option<Vec<String>> {
        let target = self.find_by_title(title)?;
        let Some(anchor) = target.popularity else {
            return Some(Vec::new());
        };

        let mut ranked: Vec<(&Film, f64)> = self
            .films
            .iter()
            .map(|film| {
                let distance = film
                    .popularity
                    .map_or(f64::INFINITY, |popularity| (popularity - anchor).abs());
                (film, distance)
            })
            .collect();
        // Stable sort keeps table order for equal distances.
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let titles = ranked
            .into_iter()
            .take(RECOMMEND_POOL)
            .filter(|(film, _)| film.title != title)
            .take(RECOMMEND_LIMIT)
            .map(|(film, _)| film.title.clone())
            .collect();
        Some(titles)
    }

    fn credit_matches<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Film> {
        let needle = name.to_lowercase();
        self.films
            .iter()
            .filter(move |film| film.production_companies.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::VotesOutcome;
    use crate::core::dataset::{Film, Table};
    use time::macros::date;
    use time::Date;

    fn film(title: &str, release_date: Option<Date>, popularity: Option<f64>) -> Film {
        Film {
            title: title.to_string(),
            release_date,
            popularity,
            vote_count: None,
            vote_average: None,
            budget: None,
            revenue: None,
            return_ratio: None,
            production_companies: String::new(),
        }
    }

    #[test]
    fn month_count_skips_undated_rows() {
        let table = Table::from_films(vec![
            film("A", Some(date!(1999 - 01 - 10)), None),
            film("B", Some(date!(2005 - 01 - 02)), None),
            film("C", Some(date!(2005 - 02 - 02)), None),
            film("D", None, None),
        ]);
        assert_eq!(table.count_by_month("enero"), Some(2));
        assert_eq!(table.count_by_month("ENERO"), Some(2));
        assert_eq!(table.count_by_month("febrero"), Some(1));
        assert_eq!(table.count_by_month("marzo"), Some(0));
        assert_eq!(table.count_by_month("january"), None);
    }

    #[test]
    fn weekday_count_is_case_insensitive_and_total() {
        // 2024-01-01 is a Monday, 2024-01-02 a Tuesday.
        let table = Table::from_films(vec![
            film("A", Some(date!(2024 - 01 - 01)), None),
            film("B", Some(date!(2024 - 01 - 08)), None),
            film("C", Some(date!(2024 - 01 - 02)), None),
            film("D", None, None),
        ]);
        assert_eq!(table.count_by_weekday("monday"), 2);
        assert_eq!(table.count_by_weekday("MONDAY"), 2);
        assert_eq!(table.count_by_weekday("tuesday"), 1);
        // Unrecognized day names count zero rather than erroring, and
        // whitespace is not stripped before matching.
        assert_eq!(table.count_by_weekday("lunes"), 0);
        assert_eq!(table.count_by_weekday(""), 0);
        assert_eq!(table.count_by_weekday("monday "), 0);
        assert_eq!(table.count_by_weekday(" monday"), 0);
    }

    #[test]
    fn first_match_in_table_order_is_authoritative() {
        let table = Table::from_films(vec![
            film("Solaris", Some(date!(1972 - 03 - 20)), Some(9.0)),
            film("solaris", Some(date!(2002 - 11 - 27)), Some(4.0)),
        ]);
        let row = table.score_by_title("SOLARIS").expect("found");
        assert_eq!(row.title, "Solaris");
        assert_eq!(row.release_year, Some(1972));
        assert_eq!(row.popularity, Some(9.0));
    }

    #[test]
    fn score_lookup_misses_return_none() {
        let table = Table::from_films(vec![film("A", None, Some(1.0))]);
        assert_eq!(table.score_by_title("B"), None);
        // An undated match still resolves, with no release year.
        let row = table.score_by_title("a").expect("found");
        assert_eq!(row.release_year, None);
    }

    #[test]
    fn votes_threshold_is_inclusive_at_2000() {
        let mut qualified = film("Heat", Some(date!(1995 - 12 - 15)), Some(17.0));
        qualified.vote_count = Some(2000);
        qualified.vote_average = Some(7.9);
        let mut below = film("Bottle Rocket", None, Some(5.0));
        below.vote_count = Some(1999);
        let uncounted = film("Obscure", None, None);
        let table = Table::from_films(vec![qualified, below, uncounted]);

        assert_eq!(
            table.votes_by_title("heat"),
            VotesOutcome::Qualified {
                vote_count: 2000,
                vote_average: Some(7.9),
            }
        );
        assert_eq!(
            table.votes_by_title("bottle rocket"),
            VotesOutcome::BelowThreshold
        );
        assert_eq!(table.votes_by_title("obscure"), VotesOutcome::BelowThreshold);
        assert_eq!(table.votes_by_title("missing"), VotesOutcome::NotFound);
    }

    #[test]
    fn actor_tally_sums_returns_with_absent_as_zero() {
        let mut a = film("A", None, None);
        a.production_companies = "Pixar Animation Studios".to_string();
        a.return_ratio = Some(2.5);
        let mut b = film("B", None, None);
        b.production_companies = "PIXAR animation studios".to_string();
        b.return_ratio = None;
        let mut c = film("C", None, None);
        c.production_companies = "TriStar Pictures".to_string();
        c.return_ratio = Some(100.0);
        let table = Table::from_films(vec![a, b, c]);

        let tally = table.actor_tally("pixar").expect("matches");
        assert_eq!(tally.films, 2);
        assert_eq!(tally.total_return, 2.5);
        assert_eq!(tally.average_return, 1.25);
        assert!(table.actor_tally("ghibli").is_none());
    }

    #[test]
    fn empty_needle_matches_every_row() {
        let mut a = film("A", None, None);
        a.production_companies = "Pixar".to_string();
        a.return_ratio = Some(1.0);
        let b = film("B", None, None);
        let table = Table::from_films(vec![a, b]);

        let tally = table.actor_tally("").expect("universal match");
        assert_eq!(tally.films, 2);
        assert_eq!(tally.total_return, 1.0);
        assert_eq!(tally.average_return, 0.5);
    }

    #[test]
    fn director_credits_preserve_table_order() {
        let mut first = film("First", Some(date!(1990 - 05 - 01)), None);
        first.production_companies = "Amblin".to_string();
        first.budget = Some(10.0);
        first.revenue = Some(35.0);
        first.return_ratio = Some(3.5);
        let mut second = film("Second", None, None);
        second.production_companies = "Amblin Entertainment".to_string();
        second.revenue = Some(8.0);
        let table = Table::from_films(vec![second.clone(), first.clone()]);

        let credits = table.director_credits("amblin").expect("matches");
        assert_eq!(credits.len(), 2);
        assert_eq!(credits[0].title, "Second");
        assert_eq!(credits[0].release_date, None);
        // Profit needs both revenue and budget.
        assert_eq!(credits[0].profit, None);
        assert_eq!(credits[1].title, "First");
        assert_eq!(credits[1].profit, Some(25.0));
        assert_eq!(credits[1].budget, Some(10.0));
        assert!(table.director_credits("Ghibli").is_none());
    }

    #[test]
    fn recommend_returns_five_closest_by_popularity() {
        let table = Table::from_films(vec![
            film("A", None, Some(1.0)),
            film("B", None, Some(2.0)),
            film("C", None, Some(3.0)),
            film("D", None, Some(4.0)),
            film("E", None, Some(5.0)),
            film("F", None, Some(6.0)),
            film("G", None, Some(7.0)),
        ]);
        // D sits at the median; ties resolve in table order.
        let titles = table.recommend("D").expect("found");
        assert_eq!(titles, vec!["C", "E", "B", "F", "A"]);
    }

    #[test]
    fn recommend_treats_absent_popularity_as_maximally_dissimilar() {
        let table = Table::from_films(vec![
            film("A", None, Some(1.0)),
            film("Unranked", None, None),
            film("B", None, Some(1.1)),
            film("C", None, Some(1.2)),
        ]);
        let titles = table.recommend("A").expect("found");
        // With only four rows the unranked one still lands in the pool, last.
        assert_eq!(titles, vec!["B", "C", "Unranked"]);
    }

    #[test]
    fn recommend_with_unranked_target_is_empty() {
        let table = Table::from_films(vec![
            film("Target", None, None),
            film("A", None, Some(1.0)),
            film("B", None, Some(2.0)),
        ]);
        assert_eq!(table.recommend("Target"), Some(Vec::new()));
        assert_eq!(table.recommend("missing"), None);
    }

    #[test]
    fn recommend_exclusion_is_case_sensitive_unlike_lookup() {
        let table = Table::from_films(vec![
            film("Alien", None, Some(5.0)),
            film("ALIEN", None, Some(5.0)),
            film("B", None, Some(5.1)),
            film("C", None, Some(5.2)),
        ]);
        // Lookup resolves "alien" to the first row, but exclusion compares the
        // query string as typed, so both differently-cased rows survive.
        let titles = table.recommend("alien").expect("found");
        assert_eq!(titles, vec!["Alien", "ALIEN", "B", "C"]);
        // Queried with exact casing, only that casing is excluded.
        let titles = table.recommend("Alien").expect("found");
        assert_eq!(titles, vec!["ALIEN", "B", "C"]);
    }
}
