//! Represents a client abstraction for `kobis.or.kr`, both public and private methods.

use crate::{
    boxoffice::BoxOffice,
    errors::{BoxOfficeError, ClientError, MovieError},
    movie::{ImageType, MovieDetail},
    stdx::http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT},
};
use chrono::NaiveDate;
use std::{sync::Arc, time::Duration};
use tracing::instrument;

const RANKING_PATH: &str = "/kobis/business/stat/boxs/findDailyBoxOfficeList.do";
const POPUP_PATH: &str = "/kobis/business/mast/mvie/searchMovieDtl.do";

/// A builder for configuring and creating instances of [`Client`] with custom settings.
///
/// # Example
///
/// ```
/// # use kobis::ClientBuilder;
/// # use std::time::Duration;
/// let client = ClientBuilder::new()
///     .user_agent("custom-agent/1.0")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok::<(), kobis::errors::ClientError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    builder: reqwest::ClientBuilder,
    base_url: Arc<str>,
}

impl Default for ClientBuilder {
    #[must_use]
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    ///
    /// This includes a default user agent (`kobis/VERSION`), a 30 second request timeout, and
    /// `https://www.kobis.or.kr` as the origin.
    #[must_use]
    pub fn new() -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .use_rustls_tls()
            .timeout(DEFAULT_TIMEOUT)
            .brotli(true);

        Self {
            builder,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    /// Sets a custom `User-Agent` header for the [`Client`].
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        Self {
            builder: self.builder.user_agent(user_agent),
            ..self
        }
    }

    /// Sets the timeout applied to each request, from connecting until the body has been read.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            builder: self.builder.timeout(timeout),
            ..self
        }
    }

    /// Overrides the origin requests are sent to and image paths are resolved against.
    ///
    /// Mostly useful for pointing the client at a mirror or a local test server.
    #[must_use]
    pub fn base_url(self, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').into(),
            ..self
        }
    }

    /// Consumes the `ClientBuilder` and returns a fully-configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if the underlying HTTP client could not be built,
    /// such as when TLS initialization fails.
    pub fn build(self) -> Result<Client, ClientError> {
        Ok(Client {
            base_url: self.base_url,
            http: self
                .builder
                .build()
                .map_err(|err| ClientError::Unexpected(err.into()))?,
        })
    }
}

/// A high-level, asynchronous client to interact with `kobis.or.kr`.
///
/// Cloning is cheap; clones share the same connection pool.
///
/// # Example
///
/// ```
/// # use kobis::Client;
/// let client = Client::new();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Arc<str>,
}

// Creation impls
impl Client {
    /// Instantiates a new [`Client`] with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized. Use [`ClientBuilder`] to handle
    /// that case as an error instead.
    #[must_use]
    pub fn new() -> Self {
        ClientBuilder::new().build().expect("Client::new()")
    }

    /// Returns a [`ClientBuilder`] for creating a custom-configured `Client`.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The origin this client talks to, without a trailing `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Public facing impls
impl Client {
    /// Scrapes the daily box office for every date from `start` to `end`, inclusive.
    ///
    /// If `start` is after `end`, no request is made and the returned [`BoxOffice`] is empty.
    ///
    /// # Errors
    ///
    /// Fails as a whole if the request fails or if any section or row of the ranking page is
    /// malformed. No partial result is returned.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use kobis::{Client, errors::Error};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Error> {
    /// let client = Client::new();
    /// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    ///
    /// let box_office = client.box_office(day, day).await?;
    ///
    /// for entry in box_office.by_date(day)? {
    ///     println!("{} {}", entry.rank(), entry.title());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn box_office(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BoxOffice, BoxOfficeError> {
        BoxOffice::fetch(self, start, end).await
    }

    /// Fetches and parses the detail popup of the movie with the given `code`.
    ///
    /// Prefer this over the single-purpose lookups when more than one fact about the movie is
    /// needed, as the popup is only requested once.
    pub async fn movie(&self, code: u32) -> Result<MovieDetail, MovieError> {
        MovieDetail::fetch(self, code).await
    }

    /// Returns the absolute URLs of every image in the poster or still-cut block of the movie's
    /// detail popup, in the order they appear.
    ///
    /// With `thumbnail` set, the URLs point at the 640px wide variant. Otherwise they point at
    /// the full-size asset.
    pub async fn image_urls(
        &self,
        code: u32,
        image_type: ImageType,
        thumbnail: bool,
    ) -> Result<Vec<String>, MovieError> {
        self.movie(code).await?.image_urls(image_type, thumbnail)
    }

    /// Returns the absolute URL of the movie's main poster.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if the popup has no main poster.
    pub async fn main_poster(&self, code: u32) -> Result<String, MovieError> {
        self.movie(code).await?.main_poster().map(str::to_owned)
    }

    /// Returns the movie's synopsis.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if the popup has no synopsis block.
    pub async fn synopsis(&self, code: u32) -> Result<String, MovieError> {
        self.movie(code).await?.synopsis().map(str::to_owned)
    }
}

// Internal only impls
impl Client {
    #[instrument(name = "requesting ranking page", skip(self))]
    pub(crate) async fn post_ranking_page(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, ClientError> {
        let url = format!("{}{RANKING_PATH}", self.base_url);
        let start = start.to_string();
        let end = end.to_string();

        let form = [
            ("loadEnd", "0"),
            ("sMultiMovieYn", ""),
            ("sRepNationCd", ""),
            ("sSearchFrom", start.as_str()),
            ("sSearchTo", end.as_str()),
            ("sWideAreaCd", ""),
            ("searchType", "search"),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    #[instrument(name = "requesting movie popup", skip(self))]
    pub(crate) async fn post_movie_popup(&self, code: u32) -> Result<String, ClientError> {
        let url = format!("{}{POPUP_PATH}", self.base_url);
        let code = code.to_string();

        let form = [
            ("code", code.as_str()),
            ("sType", ""),
            ("titleYN", "Y"),
            ("etcParam", ""),
            ("isOuterReq", "false"),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
