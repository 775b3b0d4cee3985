//! Movie details scraped from the `kobis.or.kr` detail popup.

mod popup;

use crate::{
    Client,
    errors::MovieError,
    stdx::{
        error::{Invariant, ParseError},
        http,
    },
};
use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};
use tracing::instrument;

/// Label of the image-info block holding the synopsis.
pub const SYNOPSIS_LABEL: &str = "시놉시스";

/// Matches the size segment of an image path, eg. `thumb_x192`.
static SIZE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"thumb_x\d{3}").expect("incorrect regex pattern"));

/// Matches the thumbnail part of an image path, eg. `thumb_x192/thn_`.
static THUMBNAIL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"thumb_x\d{3}/thn_").expect("incorrect regex pattern"));

/// Which image gallery of the detail popup to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// Posters, the first image-info block.
    Poster,
    /// Still cuts, the second image-info block.
    StillCut,
}

impl ImageType {
    fn block_index(self) -> usize {
        match self {
            Self::Poster => 0,
            Self::StillCut => 1,
        }
    }
}

/// The detail popup of a single movie.
///
/// Gotten through [`Client::movie()`]. The popup is requested and parsed once;
/// every accessor reads from what was extracted then.
///
/// # Example
///
/// ```no_run
/// # use kobis::{Client, ImageType, errors::Error};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Error> {
/// let client = Client::new();
/// let movie = client.movie(20_231_234).await?;
///
/// println!("poster: {}", movie.main_poster()?);
/// println!("synopsis: {}", movie.synopsis()?);
///
/// for url in movie.image_urls(ImageType::StillCut, true)? {
///     println!("still cut: {url}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MovieDetail {
    code: u32,
    base_url: String,
    main_poster: Option<Anchor>,
    blocks: Vec<InfoBlock>,
}

#[derive(Debug, Clone)]
enum Anchor {
    Href(String),
    NoHref,
}

/// A `div.info2` of the popup.
#[derive(Debug, Clone, Default)]
struct InfoBlock {
    /// Text of the block's first `strong`.
    label: Option<String>,
    /// `src` of every `img`, in document order.
    images: Vec<Option<String>>,
    /// Text of the block's `.desc_info`.
    description: Option<String>,
}

impl MovieDetail {
    #[instrument(name = "scraping movie popup", skip(client))]
    pub(crate) async fn fetch(client: &Client, code: u32) -> Result<Self, MovieError> {
        let html = client.post_movie_popup(code).await?;
        let detail = popup::parse(&html, code, client.base_url())?;

        tracing::debug!(blocks = detail.blocks.len(), "parsed movie popup");

        Ok(detail)
    }

    /// The standard code of the movie.
    #[must_use]
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Returns the absolute URL of every image in the poster or still-cut block, in the order
    /// they appear.
    ///
    /// With `thumbnail` set, the URLs point at the 640px wide variant. Otherwise they point at
    /// the full-size asset. An empty block gives an empty `Vec`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`](crate::errors::ParseError) if the popup doesn't have the block,
    /// or if an image in it has no `src`.
    pub fn image_urls(
        &self,
        image_type: ImageType,
        thumbnail: bool,
    ) -> Result<Vec<String>, MovieError> {
        let index = image_type.block_index();

        let block = self.blocks.get(index).invariant(format!(
            "movie popup should have a `div.info2` at index {index} for {image_type:?} images, found {} blocks",
            self.blocks.len()
        ))?;

        let mut urls = Vec::with_capacity(block.images.len());

        for src in &block.images {
            let src = src
                .as_deref()
                .invariant(format!("`img` in {image_type:?} block should have a `src`"))?;

            let path = if thumbnail {
                thumbnail_path(src)
            } else {
                full_size_path(src)
            };

            urls.push(http::absolute(&self.base_url, &path));
        }

        Ok(urls)
    }

    /// Returns the absolute URL of the main poster.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if the popup has no `a.fl.thumb` anchor.
    pub fn main_poster(&self) -> Result<&str, MovieError> {
        match &self.main_poster {
            Some(Anchor::Href(url)) => Ok(url),
            Some(Anchor::NoHref) => {
                Err(ParseError::from("main poster `a.fl.thumb` should have an `href`").into())
            }
            None => Err(MovieError::NotFound("main poster")),
        }
    }

    /// Returns the synopsis, whitespace collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if no block is labeled `시놉시스`.
    pub fn synopsis(&self) -> Result<&str, MovieError> {
        let block = self
            .blocks
            .iter()
            .find(|block| block.label.as_deref() == Some(SYNOPSIS_LABEL))
            .ok_or(MovieError::NotFound("synopsis"))?;

        Ok(block
            .description
            .as_deref()
            .invariant("synopsis block should have a `.desc_info`")?)
    }
}

/// Swaps the size segment of an image path for the 640px wide variant.
fn thumbnail_path(src: &str) -> Cow<'_, str> {
    SIZE_SEGMENT.replace(src, "thumb_x640")
}

/// Strips the thumbnail part of an image path, leaving the full-size asset.
fn full_size_path(src: &str) -> Cow<'_, str> {
    THUMBNAIL_PREFIX.replace(src, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_rewrite_to_640_thumbnail() {
        assert_eq!(
            "/common/mast/movie/2024/01/thumb_x640/img.jpg",
            thumbnail_path("/common/mast/movie/2024/01/thumb_x150/img.jpg")
        );
        assert_eq!(
            "/common/mast/movie/2024/01/thumb_x640/thn_img.jpg",
            thumbnail_path("/common/mast/movie/2024/01/thumb_x192/thn_img.jpg")
        );
    }

    #[test]
    fn should_rewrite_to_full_size() {
        assert_eq!(
            "/common/mast/movie/2024/01/img.jpg",
            full_size_path("/common/mast/movie/2024/01/thumb_x150/thn_img.jpg")
        );
    }

    #[test]
    fn should_leave_paths_without_size_segment() {
        assert_eq!("/common/img.jpg", thumbnail_path("/common/img.jpg"));
        assert_eq!("/common/img.jpg", full_size_path("/common/img.jpg"));
        // Only the first occurrence is rewritten.
        assert_eq!(
            "/thumb_x640/thumb_x150/a.jpg",
            thumbnail_path("/thumb_x300/thumb_x150/a.jpg")
        );
    }

    fn detail(blocks: Vec<InfoBlock>, main_poster: Option<Anchor>) -> MovieDetail {
        MovieDetail {
            code: 12345,
            base_url: "https://www.kobis.or.kr".to_owned(),
            main_poster,
            blocks,
        }
    }

    fn images(srcs: &[&str]) -> InfoBlock {
        InfoBlock {
            images: srcs.iter().map(|src| Some((*src).to_owned())).collect(),
            ..InfoBlock::default()
        }
    }

    #[test]
    fn should_select_block_by_image_type() {
        let detail = detail(
            vec![
                images(&["/p/thumb_x192/thn_poster.jpg"]),
                images(&["/s/thumb_x192/thn_a.jpg", "/s/thumb_x192/thn_b.jpg"]),
            ],
            None,
        );

        assert_eq!(
            vec!["https://www.kobis.or.kr/p/poster.jpg"],
            detail.image_urls(ImageType::Poster, false).unwrap()
        );
        assert_eq!(
            vec![
                "https://www.kobis.or.kr/s/thumb_x640/thn_a.jpg",
                "https://www.kobis.or.kr/s/thumb_x640/thn_b.jpg",
            ],
            detail.image_urls(ImageType::StillCut, true).unwrap()
        );
    }

    #[test]
    fn should_give_empty_urls_for_empty_block() {
        let detail = detail(vec![images(&[]), images(&[])], None);
        assert!(detail.image_urls(ImageType::StillCut, true).unwrap().is_empty());
    }

    #[test]
    fn should_fail_on_missing_block() {
        let detail = detail(vec![images(&[])], None);
        assert!(matches!(
            detail.image_urls(ImageType::StillCut, true),
            Err(MovieError::ParseError(_))
        ));
    }

    #[test]
    fn should_fail_on_img_without_src() {
        let block = InfoBlock {
            images: vec![None],
            ..InfoBlock::default()
        };
        let detail = detail(vec![block], None);
        assert!(matches!(
            detail.image_urls(ImageType::Poster, true),
            Err(MovieError::ParseError(_))
        ));
    }

    #[test]
    fn should_distinguish_missing_main_poster() {
        let found = detail(vec![], Some(Anchor::Href("https://www.kobis.or.kr/p.jpg".to_owned())));
        assert_eq!("https://www.kobis.or.kr/p.jpg", found.main_poster().unwrap());

        let missing = detail(vec![], None);
        assert!(matches!(missing.main_poster(), Err(MovieError::NotFound(_))));

        let no_href = detail(vec![], Some(Anchor::NoHref));
        assert!(matches!(no_href.main_poster(), Err(MovieError::ParseError(_))));
    }

    #[test]
    fn should_find_synopsis_by_label() {
        let synopsis = InfoBlock {
            label: Some(SYNOPSIS_LABEL.to_owned()),
            description: Some("A story.".to_owned()),
            ..InfoBlock::default()
        };
        let detail = detail(vec![images(&[]), images(&[]), synopsis], None);

        assert_eq!("A story.", detail.synopsis().unwrap());
    }

    #[test]
    fn should_not_find_missing_synopsis() {
        let detail = detail(vec![images(&[]), images(&[])], None);
        assert!(matches!(detail.synopsis(), Err(MovieError::NotFound("synopsis"))));
    }
}
