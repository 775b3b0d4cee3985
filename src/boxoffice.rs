//! Daily box-office rankings scraped from `kobis.or.kr`.

mod code;
mod page;

pub use page::HEADING_DATE_FORMAT;

use crate::{
    Client,
    errors::{BoxOfficeError, NotScrappedDate},
};
use chrono::NaiveDate;
use core::fmt::{self, Display};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

/// A single ranked movie on one day's box office.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BoxOfficeEntry {
    rank: u32,
    title: String,
    code: u32,
}

impl BoxOfficeEntry {
    /// Position on the day's ranking, starting at `1`.
    #[inline]
    #[must_use]
    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// Title of the movie as shown on the ranking.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The site's standard code for the movie.
    ///
    /// This is what [`Client::movie()`] and the other movie lookups take.
    #[inline]
    #[must_use]
    pub fn code(&self) -> u32 {
        self.code
    }
}

impl Display for BoxOfficeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.rank, self.title, self.code)
    }
}

/// The box office for a contiguous range of dates, keyed by date.
///
/// Built once by [`Client::box_office()`] and read-only afterwards. Every date
/// present had exactly one section on the ranking page, and no date outside of
/// the requested range is ever present.
///
/// # Example
///
/// ```no_run
/// # use kobis::{Client, errors::Error};
/// # use chrono::NaiveDate;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Error> {
/// let client = Client::new();
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
///
/// let box_office = client.box_office(start, end).await?;
///
/// for (date, entries) in &box_office {
///     if let Some(first) = entries.first() {
///         println!("{date}: {}", first.title());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BoxOffice {
    start: NaiveDate,
    end: NaiveDate,
    days: BTreeMap<NaiveDate, Vec<BoxOfficeEntry>>,
}

impl BoxOffice {
    /// Scrapes the box office for every date from `start` to `end`, inclusive.
    ///
    /// Same as [`Client::box_office()`].
    #[instrument(name = "scraping box office", skip(client))]
    pub async fn fetch(
        client: &Client,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, BoxOfficeError> {
        if start > end {
            tracing::debug!("empty date range, skipping request");
            return Ok(Self {
                start,
                end,
                days: BTreeMap::new(),
            });
        }

        let html = client.post_ranking_page(start, end).await?;
        let days = page::parse(&html, start, end)?;

        tracing::debug!(dates = days.len(), "parsed ranking page");

        Ok(Self { start, end, days })
    }

    /// Returns the ranking for `date`, in the order the site lists it.
    ///
    /// # Errors
    ///
    /// Returns [`NotScrappedDate`] if `date` was not part of the scraped range.
    pub fn by_date(&self, date: NaiveDate) -> Result<&[BoxOfficeEntry], NotScrappedDate> {
        self.days
            .get(&date)
            .map(Vec::as_slice)
            .ok_or(NotScrappedDate(date))
    }

    /// Whether a ranking for `date` was scraped.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// First date of the requested range.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the requested range, inclusive.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Scraped dates, in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// Scraped dates with their rankings, in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[BoxOfficeEntry])> + '_ {
        self.days
            .iter()
            .map(|(date, entries)| (*date, entries.as_slice()))
    }

    /// Number of scraped dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no date was scraped at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl<'a> IntoIterator for &'a BoxOffice {
    type Item = (NaiveDate, &'a [BoxOfficeEntry]);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
