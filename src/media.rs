use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Tv,
    Movie,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Tv => "tv",
            MediaType::Movie => "movie",
        }
    }

    pub fn as_display(&self) -> &'static str {
        match self {
            MediaType::Tv => "TV Show",
            MediaType::Movie => "Movie",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatchStatus {
    ToWatch,
    Watching,
    Completed,
    Dropped,
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::ToWatch => "to-watch",
            WatchStatus::Watching => "watching",
            WatchStatus::Completed => "completed",
            WatchStatus::Dropped => "dropped",
        }
    }

    pub fn label(&self) -> String {
        format_status(self.as_str())
    }

    /// Statuses offered for a media type; `dropped` is TV-only.
    pub fn options_for(media_type: MediaType) -> &'static [WatchStatus] {
        match media_type {
            MediaType::Tv => &[
                WatchStatus::ToWatch,
                WatchStatus::Watching,
                WatchStatus::Completed,
                WatchStatus::Dropped,
            ],
            MediaType::Movie => &[
                WatchStatus::ToWatch,
                WatchStatus::Watching,
                WatchStatus::Completed,
            ],
        }
    }

    /// Cycle to the next status a view of `media_type` can filter by.
    pub fn next_for(&self, media_type: MediaType) -> Self {
        let options = Self::options_for(media_type);
        let pos = options.iter().position(|s| s == self).unwrap_or(0);
        options[(pos + 1) % options.len()]
    }

    pub fn prev_for(&self, media_type: MediaType) -> Self {
        let options = Self::options_for(media_type);
        let pos = options.iter().position(|s| s == self).unwrap_or(0);
        options[(pos + options.len() - 1) % options.len()]
    }
}

/// Display label for a status code. Unknown input passes through unchanged.
pub fn format_status(status: &str) -> String {
    match status {
        "to-watch" => "Plan to Watch".to_string(),
        "watching" => "Watching".to_string(),
        "completed" => "Completed".to_string(),
        "dropped" => "Dropped".to_string(),
        other => other.to_string(),
    }
}

/// A tracked TV show or movie as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub status: WatchStatus,
    #[serde(default)]
    pub watched_episodes: u32,
    #[serde(default)]
    pub total_episodes: u32,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
}

impl MediaRecord {
    /// Watch progress as a percentage. Episode-fraction for TV (0 when the
    /// total is unknown), the stored percentage for movies.
    pub fn progress_percent(&self) -> u32 {
        match self.media_type {
            MediaType::Tv => {
                if self.total_episodes == 0 {
                    0
                } else {
                    let ratio = f64::from(self.watched_episodes) / f64::from(self.total_episodes);
                    (ratio * 100.0).round() as u32
                }
            }
            MediaType::Movie => self.progress,
        }
    }
}

/// Create/update body for POST /media and PUT /media/{id}.
#[derive(Debug, Clone, Serialize)]
pub struct MediaPayload {
    pub id: String,
    pub username: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub year: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub status: WatchStatus,
    pub watched_episodes: u32,
    pub total_episodes: u32,
    pub progress: u32,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Add,
    Update,
    Remove,
    #[serde(other)]
    Other,
}

/// One backend-owned history entry, rendered newest-first on the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    pub action: ActivityAction,
    #[serde(default)]
    pub media_type: Option<String>,
    pub message: String,
    pub timestamp: String,
}

impl Activity {
    pub fn icon(&self) -> &'static str {
        match self.action {
            ActivityAction::Add => match self.media_type.as_deref() {
                Some("tv") => "📺",
                _ => "🎬",
            },
            ActivityAction::Update => "✎",
            ActivityAction::Remove => "✗",
            ActivityAction::Other => "•",
        }
    }

    /// Backend timestamps are `YYYY-MM-DD HH:MM:SS`; anything else renders raw.
    pub fn formatted_timestamp(&self) -> String {
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.format("%b %e, %Y %H:%M").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

pub fn tv_by_status(media: &[MediaRecord], status: WatchStatus) -> Vec<usize> {
    media
        .iter()
        .enumerate()
        .filter(|(_, m)| m.media_type == MediaType::Tv && m.status == status)
        .map(|(i, _)| i)
        .collect()
}

pub fn movies_by_status(media: &[MediaRecord], status: WatchStatus) -> Vec<usize> {
    media
        .iter()
        .enumerate()
        .filter(|(_, m)| m.media_type == MediaType::Movie && m.status == status)
        .map(|(i, _)| i)
        .collect()
}

/// Anything actively watched, plus partially-watched movies regardless of status.
pub fn continue_watching(media: &[MediaRecord]) -> Vec<usize> {
    media
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            m.status == WatchStatus::Watching
                || (m.media_type == MediaType::Movie && m.progress > 0 && m.progress < 100)
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(media_type: MediaType, status: WatchStatus) -> MediaRecord {
        MediaRecord {
            id: "tv-1".to_string(),
            media_type,
            title: "Monster".to_string(),
            year: Some("2004".to_string()),
            overview: None,
            poster_path: None,
            status,
            watched_episodes: 0,
            total_episodes: 0,
            progress: 0,
            season: None,
            episode: None,
        }
    }

    #[test]
    fn tv_progress_is_episode_fraction() {
        let mut m = record(MediaType::Tv, WatchStatus::Watching);
        m.watched_episodes = 37;
        m.total_episodes = 74;
        assert_eq!(m.progress_percent(), 50);

        m.watched_episodes = 1;
        m.total_episodes = 3;
        assert_eq!(m.progress_percent(), 33);

        m.watched_episodes = 2;
        assert_eq!(m.progress_percent(), 67);
    }

    #[test]
    fn tv_progress_zero_when_total_unknown() {
        let mut m = record(MediaType::Tv, WatchStatus::Watching);
        m.watched_episodes = 5;
        m.total_episodes = 0;
        assert_eq!(m.progress_percent(), 0);
    }

    #[test]
    fn movie_progress_is_raw_percentage() {
        let mut m = record(MediaType::Movie, WatchStatus::Watching);
        m.progress = 42;
        assert_eq!(m.progress_percent(), 42);
    }

    #[test]
    fn format_status_covers_known_codes() {
        assert_eq!(format_status("to-watch"), "Plan to Watch");
        assert_eq!(format_status("watching"), "Watching");
        assert_eq!(format_status("completed"), "Completed");
        assert_eq!(format_status("dropped"), "Dropped");
    }

    #[test]
    fn format_status_passes_through_unknown() {
        assert_eq!(format_status("on-hold"), "on-hold");
        assert_eq!(format_status(""), "");
    }

    #[test]
    fn status_options_exclude_dropped_for_movies() {
        assert!(WatchStatus::options_for(MediaType::Tv).contains(&WatchStatus::Dropped));
        assert!(!WatchStatus::options_for(MediaType::Movie).contains(&WatchStatus::Dropped));
    }

    #[test]
    fn filter_cycle_wraps_per_type() {
        assert_eq!(
            WatchStatus::Dropped.next_for(MediaType::Tv),
            WatchStatus::ToWatch
        );
        assert_eq!(
            WatchStatus::Completed.next_for(MediaType::Movie),
            WatchStatus::ToWatch
        );
    }

    #[test]
    fn continue_watching_includes_partial_movies() {
        let mut tv = record(MediaType::Tv, WatchStatus::Watching);
        tv.id = "tv-2".to_string();
        let mut paused_movie = record(MediaType::Movie, WatchStatus::ToWatch);
        paused_movie.id = "movie-3".to_string();
        paused_movie.progress = 60;
        let mut done_movie = record(MediaType::Movie, WatchStatus::Completed);
        done_movie.id = "movie-4".to_string();
        done_movie.progress = 100;
        let planned = record(MediaType::Tv, WatchStatus::ToWatch);

        let media = vec![tv, paused_movie, done_movie, planned];
        assert_eq!(continue_watching(&media), vec![0, 1]);
    }

    #[test]
    fn subset_predicates_split_by_type_and_status() {
        let media = vec![
            record(MediaType::Tv, WatchStatus::Watching),
            record(MediaType::Movie, WatchStatus::Watching),
            record(MediaType::Tv, WatchStatus::Completed),
        ];
        assert_eq!(tv_by_status(&media, WatchStatus::Watching), vec![0]);
        assert_eq!(movies_by_status(&media, WatchStatus::Watching), vec![1]);
        assert_eq!(tv_by_status(&media, WatchStatus::Dropped), Vec::<usize>::new());
    }

    #[test]
    fn status_serializes_as_kebab_case() {
        let json = serde_json::to_string(&WatchStatus::ToWatch).unwrap();
        assert_eq!(json, "\"to-watch\"");
        let parsed: WatchStatus = serde_json::from_str("\"dropped\"").unwrap();
        assert_eq!(parsed, WatchStatus::Dropped);
    }

    #[test]
    fn record_deserializes_backend_row() {
        let row = r#"{
            "id": "tv-603",
            "username": "ana",
            "type": "tv",
            "title": "Monster",
            "year": "2004",
            "overview": null,
            "poster_path": null,
            "status": "watching",
            "watched_episodes": 12,
            "total_episodes": 74,
            "progress": 0,
            "season": 1,
            "episode": 13
        }"#;
        let m: MediaRecord = serde_json::from_str(row).unwrap();
        assert_eq!(m.media_type, MediaType::Tv);
        assert_eq!(m.status, WatchStatus::Watching);
        assert_eq!(m.season, Some(1));
        assert_eq!(m.progress_percent(), 16);
    }

    #[test]
    fn activity_timestamp_formats_or_passes_through() {
        let act = Activity {
            action: ActivityAction::Add,
            media_type: Some("tv".to_string()),
            message: "Added tv 'Monster' to watchlist".to_string(),
            timestamp: "2026-08-01 09:30:00".to_string(),
        };
        assert_eq!(act.formatted_timestamp(), "Aug  1, 2026 09:30");

        let odd = Activity {
            timestamp: "yesterday".to_string(),
            ..act
        };
        assert_eq!(odd.formatted_timestamp(), "yesterday");
    }
}
