use super::{Anchor, InfoBlock, MovieDetail};
use crate::stdx::{
    error::{Invariant, ParseError},
    html, http,
};
use scraper::{ElementRef, Html, Selector};
use tracing::instrument;

#[instrument(name = "parsing movie popup", skip(html, base_url))]
pub(super) fn parse(html: &str, code: u32, base_url: &str) -> Result<MovieDetail, ParseError> {
    let document = Html::parse_document(html);

    Ok(MovieDetail {
        code,
        base_url: base_url.to_owned(),
        main_poster: main_poster(&document, base_url)?,
        blocks: blocks(&document)?,
    })
}

fn main_poster(document: &Html, base_url: &str) -> Result<Option<Anchor>, ParseError> {
    let selector = Selector::parse("a.fl.thumb") //
        .invariant("`a.fl.thumb` should be a valid selector")?;

    let Some(anchor) = document.select(&selector).next() else {
        return Ok(None);
    };

    let anchor = match anchor.value().attr("href") {
        Some(href) => Anchor::Href(http::absolute(base_url, href)),
        None => Anchor::NoHref,
    };

    Ok(Some(anchor))
}

fn blocks(document: &Html) -> Result<Vec<InfoBlock>, ParseError> {
    let selector = Selector::parse("div.info2") //
        .invariant("`div.info2` should be a valid selector")?;

    let mut blocks = Vec::new();

    for info in document.select(&selector) {
        blocks.push(block(info)?);
    }

    Ok(blocks)
}

fn block(info: ElementRef<'_>) -> Result<InfoBlock, ParseError> {
    let label_selector = Selector::parse("strong") //
        .invariant("`strong` should be a valid selector")?;

    let image_selector = Selector::parse("img") //
        .invariant("`img` should be a valid selector")?;

    let description_selector = Selector::parse(".desc_info") //
        .invariant("`.desc_info` should be a valid selector")?;

    Ok(InfoBlock {
        label: info.select(&label_selector).next().map(html::text),
        images: info
            .select(&image_selector)
            .map(|img| img.value().attr("src").map(str::to_owned))
            .collect(),
        description: info.select(&description_selector).next().map(html::text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageType, errors::MovieError, movie::SYNOPSIS_LABEL};
    use pretty_assertions::assert_eq;

    const BASE_URL: &str = "https://www.kobis.or.kr";

    const POPUP: &str = r##"
        <html><body>
        <div class="hd_layer">
            <div class="item_tab basic">
                <div class="ovf info info1">
                    <a href="/common/mast/movie/2024/01/thumb_x640/thn_main.jpg" class="fl thumb" onclick="return false;">
                        <img src="/common/mast/movie/2024/01/thumb_x192/thn_main.jpg" alt="" />
                    </a>
                </div>
                <div class="info info2">
                    <strong class="tit_info">포스터</strong>
                    <ul>
                        <li><a href="#"><img src="/common/mast/movie/2024/01/thumb_x192/thn_p1.jpg" alt="" /></a></li>
                        <li><a href="#"><img src="/common/mast/movie/2024/01/thumb_x192/thn_p2.jpg" alt="" /></a></li>
                    </ul>
                </div>
                <div class="info info2">
                    <strong class="tit_info">스틸컷</strong>
                    <ul>
                        <li><a href="#"><img src="/common/mast/movie/2024/01/thumb_x192/thn_s1.jpg" alt="" /></a></li>
                    </ul>
                </div>
                <div class="info info2">
                    <strong class="tit_info">
                        시놉시스
                    </strong>
                    <p class="desc_info">
                        A quiet town.
                        A loud secret.
                    </p>
                </div>
            </div>
        </div>
        </body></html>
    "##;

    #[test]
    fn should_parse_popup() {
        let detail = parse(POPUP, 12345, BASE_URL).unwrap();

        assert_eq!(12345, detail.code());
        assert_eq!(3, detail.blocks.len());
        assert_eq!(Some("포스터"), detail.blocks[0].label.as_deref());
        assert_eq!(Some(SYNOPSIS_LABEL), detail.blocks[2].label.as_deref());
    }

    #[test]
    fn should_extract_poster_urls_in_order() {
        let detail = parse(POPUP, 12345, BASE_URL).unwrap();

        assert_eq!(
            vec![
                "https://www.kobis.or.kr/common/mast/movie/2024/01/thumb_x640/thn_p1.jpg",
                "https://www.kobis.or.kr/common/mast/movie/2024/01/thumb_x640/thn_p2.jpg",
            ],
            detail.image_urls(ImageType::Poster, true).unwrap()
        );
        assert_eq!(
            vec![
                "https://www.kobis.or.kr/common/mast/movie/2024/01/p1.jpg",
                "https://www.kobis.or.kr/common/mast/movie/2024/01/p2.jpg",
            ],
            detail.image_urls(ImageType::Poster, false).unwrap()
        );
    }

    #[test]
    fn should_extract_still_cut_urls() {
        let detail = parse(POPUP, 12345, BASE_URL).unwrap();

        assert_eq!(
            vec!["https://www.kobis.or.kr/common/mast/movie/2024/01/s1.jpg"],
            detail.image_urls(ImageType::StillCut, false).unwrap()
        );
    }

    #[test]
    fn should_extract_main_poster() {
        let detail = parse(POPUP, 12345, BASE_URL).unwrap();

        assert_eq!(
            "https://www.kobis.or.kr/common/mast/movie/2024/01/thumb_x640/thn_main.jpg",
            detail.main_poster().unwrap()
        );
    }

    #[test]
    fn should_extract_synopsis() {
        let detail = parse(POPUP, 12345, BASE_URL).unwrap();

        assert_eq!("A quiet town. A loud secret.", detail.synopsis().unwrap());
    }

    #[test]
    fn should_report_missing_elements() {
        let html = r#"<html><body><div class="info2"><strong>포스터</strong></div></body></html>"#;
        let detail = parse(html, 1, BASE_URL).unwrap();

        assert!(matches!(detail.main_poster(), Err(MovieError::NotFound(_))));
        assert!(matches!(detail.synopsis(), Err(MovieError::NotFound(_))));
        assert!(detail.image_urls(ImageType::Poster, true).unwrap().is_empty());
        assert!(matches!(
            detail.image_urls(ImageType::StillCut, true),
            Err(MovieError::ParseError(_))
        ));
    }

    #[test]
    fn should_skip_blocks_without_label() {
        let html = format!(
            r#"<html><body>
                <div class="info2"><p class="desc_info">not this</p></div>
                <div class="info2"><strong>{SYNOPSIS_LABEL}</strong><p class="desc_info">this</p></div>
            </body></html>"#
        );
        let detail = parse(&html, 1, BASE_URL).unwrap();

        assert_eq!("this", detail.synopsis().unwrap());
    }

    #[test]
    fn should_fail_on_synopsis_without_description() {
        let html = format!(
            r#"<html><body><div class="info2"><strong>{SYNOPSIS_LABEL}</strong></div></body></html>"#
        );
        let detail = parse(&html, 1, BASE_URL).unwrap();

        assert!(matches!(detail.synopsis(), Err(MovieError::ParseError(_))));
    }
}
