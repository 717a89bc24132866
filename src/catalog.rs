use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::media::MediaType;

const TMDB_IMAGE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Type filter for a catalog search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    All,
    Tv,
    Movie,
}

impl SearchKind {
    pub fn as_display(&self) -> &'static str {
        match self {
            SearchKind::All => "All",
            SearchKind::Tv => "TV Shows",
            SearchKind::Movie => "Movies",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SearchKind::All => SearchKind::Tv,
            SearchKind::Tv => SearchKind::Movie,
            SearchKind::Movie => SearchKind::All,
        }
    }

    fn media_types(&self) -> &'static [MediaType] {
        match self {
            SearchKind::All => &[MediaType::Tv, MediaType::Movie],
            SearchKind::Tv => &[MediaType::Tv],
            SearchKind::Movie => &[MediaType::Movie],
        }
    }
}

/// One catalog match, normalized across the TV and movie response shapes.
/// Transient: it only exists to seed the add-media modal.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub id: String,
    pub tmdb_id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub year: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
}

#[derive(Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    results: Vec<CatalogItem>,
}

/// Raw catalog entry. TV uses `name`/`first_air_date`, movies use
/// `title`/`release_date`; everything else is shared.
#[derive(Deserialize)]
struct CatalogItem {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

fn extract_year(date: Option<&str>) -> String {
    match date {
        Some(d) if !d.is_empty() => d.chars().take(4).collect(),
        _ => "Unknown".to_string(),
    }
}

fn normalize(item: CatalogItem, media_type: MediaType) -> SearchResult {
    let (title, date) = match media_type {
        MediaType::Tv => (item.name, item.first_air_date),
        MediaType::Movie => (item.title, item.release_date),
    };

    SearchResult {
        id: format!("{}-{}", media_type.as_str(), item.id),
        tmdb_id: item.id,
        media_type,
        title: title.unwrap_or_else(|| "Untitled".to_string()),
        year: extract_year(date.as_deref()),
        overview: item.overview.filter(|o| !o.is_empty()),
        poster_path: item
            .poster_path
            .map(|p| format!("{}{}", TMDB_IMAGE_URL, p)),
    }
}

/// Descending by numeric year. Years that don't parse (e.g. "Unknown") sort
/// after every numeric year and keep their arrival order among themselves.
pub fn sort_by_year_desc(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        match (a.year.parse::<i32>().ok(), b.year.parse::<i32>().ok()) {
            (Some(ya), Some(yb)) => yb.cmp(&ya),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        media_type: MediaType,
        year: Option<&str>,
    ) -> Result<Vec<SearchResult>>;
}

/// Run one catalog request per concrete type covered by `kind` and merge the
/// results, newest first. Any failing request fails the whole search; no
/// partial results are shown.
pub async fn run_search(
    provider: &dyn CatalogProvider,
    kind: SearchKind,
    query: &str,
    year: Option<&str>,
) -> Result<Vec<SearchResult>> {
    let mut combined = Vec::new();

    for media_type in kind.media_types() {
        let results = provider.search(query, *media_type, year).await?;
        combined.extend(results);
    }

    sort_by_year_desc(&mut combined);
    Ok(combined)
}

/// Catalog access through the backend's search proxy.
pub struct TmdbProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl TmdbProxyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("mita/0.1")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProxyClient {
    async fn search(
        &self,
        query: &str,
        media_type: MediaType,
        year: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        let mut url = format!(
            "{}/api/tmdb/search?media_type={}&query={}",
            self.base_url,
            media_type.as_str(),
            urlencoding::encode(query)
        );
        if let Some(year) = year {
            url.push_str(&format!("&year={}", urlencoding::encode(year)));
        }

        debug!(url = %url, "Searching catalog");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::CatalogSearch(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body: CatalogResponse = response.json().await?;
        debug!(count = body.results.len(), "Catalog results");

        Ok(body
            .results
            .into_iter()
            .map(|item| normalize(item, media_type))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64) -> CatalogItem {
        CatalogItem {
            id,
            name: None,
            title: None,
            first_air_date: None,
            release_date: None,
            overview: None,
            poster_path: None,
        }
    }

    #[test]
    fn year_comes_from_first_four_chars() {
        assert_eq!(extract_year(Some("1984-09-12")), "1984");
        assert_eq!(extract_year(Some("1984")), "1984");
    }

    #[test]
    fn year_defaults_to_unknown() {
        assert_eq!(extract_year(None), "Unknown");
        assert_eq!(extract_year(Some("")), "Unknown");
    }

    #[test]
    fn tv_normalization_uses_name_and_air_date() {
        let mut raw = item(603);
        raw.name = Some("Monster".to_string());
        raw.first_air_date = Some("2004-04-07".to_string());
        raw.poster_path = Some("/abc.jpg".to_string());

        let result = normalize(raw, MediaType::Tv);
        assert_eq!(result.id, "tv-603");
        assert_eq!(result.title, "Monster");
        assert_eq!(result.year, "2004");
        assert_eq!(
            result.poster_path.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
    }

    #[test]
    fn movie_normalization_uses_title_and_release_date() {
        let mut raw = item(438631);
        raw.title = Some("Dune".to_string());
        raw.release_date = Some("2021-09-15".to_string());
        // TV-shaped fields on a movie item are ignored
        raw.name = Some("wrong".to_string());
        raw.first_air_date = Some("1999-01-01".to_string());

        let result = normalize(raw, MediaType::Movie);
        assert_eq!(result.id, "movie-438631");
        assert_eq!(result.title, "Dune");
        assert_eq!(result.year, "2021");
        assert!(result.poster_path.is_none());
    }

    fn result(id: &str, year: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            tmdb_id: 0,
            media_type: MediaType::Movie,
            title: id.to_string(),
            year: year.to_string(),
            overview: None,
            poster_path: None,
        }
    }

    #[test]
    fn sort_is_descending_with_unknown_years_last() {
        let mut results = vec![
            result("a", "Unknown"),
            result("b", "1984"),
            result("c", "2021"),
            result("d", "Unknown"),
            result("e", "2000"),
        ];
        sort_by_year_desc(&mut results);

        let order: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["c", "e", "b", "a", "d"]);
    }

    struct StubProvider;

    #[async_trait::async_trait]
    impl CatalogProvider for StubProvider {
        async fn search(
            &self,
            _query: &str,
            media_type: MediaType,
            _year: Option<&str>,
        ) -> Result<Vec<SearchResult>> {
            Ok(match media_type {
                MediaType::Tv => vec![SearchResult {
                    id: "tv-90228".to_string(),
                    tmdb_id: 90228,
                    media_type,
                    title: "Dune".to_string(),
                    year: "2000".to_string(),
                    overview: None,
                    poster_path: None,
                }],
                MediaType::Movie => vec![SearchResult {
                    id: "movie-438631".to_string(),
                    tmdb_id: 438631,
                    media_type,
                    title: "Dune".to_string(),
                    year: "2021".to_string(),
                    overview: None,
                    poster_path: None,
                }],
            })
        }
    }

    #[tokio::test]
    async fn search_all_unions_both_types_sorted() {
        let results = run_search(&StubProvider, SearchKind::All, "Dune", None)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].media_type, MediaType::Movie);
        assert_eq!(results[0].year, "2021");
        assert_eq!(results[1].media_type, MediaType::Tv);
        assert_eq!(results[1].year, "2000");
    }

    #[tokio::test]
    async fn search_single_type_queries_once() {
        let results = run_search(&StubProvider, SearchKind::Tv, "Dune", None)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "tv-90228");
    }
}
