//! Workshop listing enumeration: walks the browse pages for every configured
//! filter combination and collects the maps worth downloading.

use std::collections::HashSet;

use regex::Regex;

use brodl_core::{Difficulty, GameplayType, APP_ID};

use crate::client::PageSource;
use crate::config::Config;
use crate::error::Error;

const BROWSE_URL: &str = "https://steamcommunity.com/workshop/browse/";

/// One map discovered on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapListing {
    pub workshop_id: u64,
    pub title: String,
    /// Star rating digit from the listing thumbnail, `'0'` when unrated.
    pub stars: char,
    pub gameplay: GameplayType,
    pub difficulty: Difficulty,
}

impl MapListing {
    /// Three-digit artifact prefix: gameplay code, difficulty code, stars.
    pub fn prefix(&self) -> String {
        let mut prefix = String::with_capacity(3);
        prefix.push(self.gameplay.code());
        prefix.push(self.difficulty.code());
        prefix.push(self.stars);
        prefix
    }
}

/// Browse URL for one page of one filter combination.
pub fn browse_url(
    config: &Config,
    gameplay: GameplayType,
    difficulty: Difficulty,
    page: u32,
) -> String {
    format!(
        "{BROWSE_URL}?appid={APP_ID}&browsesort=trend&section=readytouseitems&actualsort=trend\
         &p={page}&days={days}&numperpage={per_page}\
         &requiredtags[]={diff_tag}&requiredtags[]={game_tag}",
        days = config.time_period.days(),
        per_page = config.maps_per_page,
        diff_tag = difficulty.tag(),
        game_tag = gameplay.tag(),
    )
}

/// Extracts workshop items out of a listing page body.
struct ItemExtractor {
    id: Regex,
    title: Regex,
    stars: Regex,
}

impl ItemExtractor {
    fn new() -> Self {
        // Hard-coded patterns; a failure here is a bug, not a runtime condition.
        Self {
            id: Regex::new(r"id=(\d+)").expect("invalid item id pattern"),
            title: Regex::new(r#"class="workshopItemTitle[^"]*"\s*>([^<]*)<"#)
                .expect("invalid item title pattern"),
            stars: Regex::new(r"(\d+)-star\.png").expect("invalid star rating pattern"),
        }
    }

    /// Split the page into per-item chunks and pull id, title and rating out
    /// of each. Chunks missing an id or title are skipped with a warning:
    /// Steam occasionally serves half-rendered tiles.
    fn extract(&self, body: &str, gameplay: GameplayType, difficulty: Difficulty) -> Vec<MapListing> {
        let mut items = Vec::new();
        for chunk in body.split("class=\"workshopItem\"").skip(1) {
            let Some(id) = self
                .id
                .captures(chunk)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u64>().ok())
            else {
                log::warn!("workshop item without an id, skipping");
                continue;
            };
            let Some(title) = self
                .title
                .captures(chunk)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
            else {
                log::warn!("workshop item {id} without a title, skipping");
                continue;
            };
            let stars = self
                .stars
                .captures(chunk)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().chars().last())
                .unwrap_or('0');
            items.push(MapListing {
                workshop_id: id,
                title,
                stars,
                gameplay,
                difficulty,
            });
        }
        items
    }
}

/// Walk every configured filter combination page by page and collect listings
/// that are neither on disk already nor seen earlier in this scan.
///
/// An empty page ends the page walk for that combination early, since the
/// workshop pads out-of-range pages with no items. A page that comes back
/// with a non-200 status, or whose fetch fails outright, is logged and
/// skipped without ending the walk.
pub fn enumerate<S, F>(
    source: &S,
    config: &Config,
    existing: &HashSet<u64>,
    mut on_page: F,
) -> Result<Vec<MapListing>, Error>
where
    S: PageSource,
    F: FnMut(u32, u32),
{
    let extractor = ItemExtractor::new();
    let total = config.total_pages();
    let mut visited = 0u32;
    let mut seen: HashSet<u64> = HashSet::new();
    let mut listings = Vec::new();

    for &gameplay in &config.gameplay_types {
        for &difficulty in &config.difficulty_levels {
            for page in 1..=config.page_count {
                visited += 1;
                on_page(visited, total);

                let url = browse_url(config, gameplay, difficulty, page);
                let fetched = match source.page(&url) {
                    Ok(fetched) => fetched,
                    Err(err) => {
                        log::warn!(
                            "listing page {page} ({} / {}): {err}",
                            gameplay.tag(),
                            difficulty.tag()
                        );
                        continue;
                    }
                };
                if !fetched.is_success() {
                    log::warn!(
                        "listing page {page} ({} / {}): HTTP {}",
                        gameplay.tag(),
                        difficulty.tag(),
                        fetched.status
                    );
                    continue;
                }

                let items = extractor.extract(&fetched.body, gameplay, difficulty);
                if items.is_empty() {
                    // Past the end of this combination's results
                    break;
                }
                for item in items {
                    if existing.contains(&item.workshop_id) {
                        log::info!("skipping {}, already downloaded", item.workshop_id);
                        continue;
                    }
                    if !seen.insert(item.workshop_id) {
                        continue;
                    }
                    listings.push(item);
                }
            }
        }
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_html(id: u64, title: &str, stars: Option<u32>) -> String {
        let rating = match stars {
            Some(n) => format!(
                r#"<img class="fileRating" src="https://community.fastly.steamstatic.com/public/images/sharedfiles/{n}-star.png"/>"#
            ),
            None => String::new(),
        };
        format!(
            r#"<div class="workshopItem">
                <a href="https://steamcommunity.com/sharedfiles/filedetails/?id={id}&searchtext=">
                {rating}
                </a>
                <div class="workshopItemTitle ellipsis">{title}</div>
            </div>"#
        )
    }

    fn page(items: &[String]) -> String {
        let mut body = String::from("<html><body><div class=\"workshopBrowseItems\">");
        for item in items {
            // The split key appears inside each item div
            body.push_str(item);
        }
        body.push_str("</div></body></html>");
        body
    }

    #[test]
    fn extracts_id_title_and_rating() {
        let body = page(&[
            item_html(123456, "Bro Fortress", Some(5)),
            item_html(789, "City of Bros", None),
        ]);
        let items =
            ItemExtractor::new().extract(&body, GameplayType::Standard, Difficulty::Normal);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].workshop_id, 123456);
        assert_eq!(items[0].title, "Bro Fortress");
        assert_eq!(items[0].stars, '5');
        assert_eq!(items[0].prefix(), "115");
        assert_eq!(items[1].stars, '0');
        assert_eq!(items[1].prefix(), "110");
    }

    #[test]
    fn empty_page_yields_no_items() {
        let items = ItemExtractor::new().extract(
            "<html><body>No items matching your search criteria.</body></html>",
            GameplayType::Puzzle,
            Difficulty::Brotal,
        );
        assert!(items.is_empty());
    }

    #[test]
    fn browse_url_carries_all_filters() {
        let config = Config::parse(
            "[settings]\npage_count = 3\nmaps_per_page = 18\ntime_period = 90\n\
             gameplay_types = \"2\"\ndifficulty_levels = \"3\"\n",
        )
        .unwrap();
        let url = browse_url(&config, GameplayType::Puzzle, Difficulty::Brotal, 2);
        assert!(url.contains("appid=274190"));
        assert!(url.contains("p=2"));
        assert!(url.contains("days=90"));
        assert!(url.contains("numperpage=18"));
        assert!(url.contains("requiredtags[]=Brotal"));
        assert!(url.contains("requiredtags[]=Puzzle"));
    }
}
