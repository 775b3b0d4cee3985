use super::{BoxOfficeEntry, code};
use crate::stdx::{
    error::{Invariant, ParseError, invariant},
    html,
};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, btree_map::Entry};
use tracing::instrument;

/// Format of the date in a ranking section heading, eg. `2024년 01월 15일`.
///
/// The heading itself carries a three character suffix after the date which
/// is stripped before parsing.
pub const HEADING_DATE_FORMAT: &str = "%Y년 %m월 %d일";

/// Length, in characters, of the text following the date in a section heading.
const HEADING_SUFFIX_LEN: usize = 3;

#[instrument(name = "parsing ranking page", skip(html))]
pub(super) fn parse(
    html: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BTreeMap<NaiveDate, Vec<BoxOfficeEntry>>, ParseError> {
    let document = Html::parse_document(html);

    let selector = Selector::parse(".rst_sch > div") //
        .invariant("`.rst_sch > div` should be a valid selector")?;

    let mut days = BTreeMap::new();

    for section in document.select(&selector) {
        // Each section holds the heading and table for a single date. They are
        // paired through this shared parent rather than by their position in the page.
        let mut heading = None;
        let mut table = None;

        for child in section.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "h4" if heading.is_none() => heading = Some(child),
                "table" if table.is_none() => table = Some(child),
                _ => {}
            }
        }

        let (heading, table) = match (heading, table) {
            (Some(heading), Some(table)) => (heading, table),
            // Not a ranking section.
            (None, None) => continue,
            (Some(heading), None) => invariant!(
                "ranking section `{}` has a heading but no table",
                html::text(heading)
            ),
            (None, Some(_)) => invariant!("ranking section has a table but no `h4` heading"),
        };

        let date = heading_date(&html::text(heading), HEADING_DATE_FORMAT)?;

        invariant!(
            start <= date && date <= end,
            "ranking section for `{date}` is outside of the requested `{start}..={end}`"
        );

        let entries = rows(table)?;

        tracing::debug!(%date, rows = entries.len(), "parsed ranking section");

        match days.entry(date) {
            Entry::Vacant(vacant) => {
                vacant.insert(entries);
            }
            Entry::Occupied(_) => {
                invariant!("ranking page has more than one section for `{date}`")
            }
        }
    }

    Ok(days)
}

/// Parses a section heading such as `2024년 01월 15일 순위` into its date.
///
/// The last [`HEADING_SUFFIX_LEN`] characters are dropped and the rest must
/// match `format` exactly.
fn heading_date(heading: &str, format: &str) -> Result<NaiveDate, ParseError> {
    let heading = heading.trim();

    let cut = heading
        .char_indices()
        .rev()
        .nth(HEADING_SUFFIX_LEN - 1)
        .map(|(idx, _)| idx)
        .invariant(format!(
            "ranking section heading should be longer than its {HEADING_SUFFIX_LEN} character suffix, got `{heading}`"
        ))?;

    let text = heading[..cut].trim();

    let date = NaiveDate::parse_from_str(text, format).invariant(format!(
        "ranking section heading should have a date of pattern `{format}`, got `{heading}`"
    ))?;

    // chrono accepts unpadded fields and missing spaces, so the date has to
    // format back to the same text.
    invariant!(
        date.format(format).to_string() == text,
        "ranking section heading should have a date of exactly pattern `{format}`, got `{heading}`"
    );

    Ok(date)
}

fn rows(table: ElementRef<'_>) -> Result<Vec<BoxOfficeEntry>, ParseError> {
    let row_selector = Selector::parse("tbody > tr") //
        .invariant("`tbody > tr` should be a valid selector")?;

    let cell_selector = Selector::parse("td") //
        .invariant("`td` should be a valid selector")?;

    let anchor_selector = Selector::parse("a") //
        .invariant("`a` should be a valid selector")?;

    let mut entries = Vec::new();

    for row in table.select(&row_selector) {
        let cells = row.select(&cell_selector).collect::<Vec<_>>();

        let rank = cells
            .first()
            .invariant("ranking row should have a rank cell")?;

        let rank = html::text(*rank);

        let rank = rank
            .parse::<u32>()
            .invariant(format!("ranking row rank should be a number, got `{rank}`"))?;

        invariant!(rank >= 1, "ranking row rank should start at one");

        let anchor = cells
            .get(1)
            .invariant(format!("ranking row #{rank} should have a title cell"))?
            .select(&anchor_selector)
            .next()
            .invariant(format!("ranking row #{rank} should have an `a` in its title cell"))?;

        let title = anchor
            .value()
            .attr("title")
            .invariant(format!("ranking row #{rank} `a` should have a `title`"))?;

        let onclick = anchor
            .value()
            .attr("onclick")
            .invariant(format!("ranking row #{rank} `a` should have an `onclick`"))?;

        entries.push(BoxOfficeEntry {
            rank,
            title: title.to_owned(),
            code: code::parse(onclick)?,
        });
    }

    Ok(entries)
}
