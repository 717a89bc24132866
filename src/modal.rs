use crate::catalog::SearchResult;
use crate::media::{MediaPayload, MediaRecord, MediaType, WatchStatus};

/// Form fields reachable in the media modal. Which ones are visible depends
/// on the media type and the selected status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalField {
    Status,
    Watched,
    Season,
    Episode,
    Progress,
}

/// Editable form state behind the add/edit modal. Numeric text inputs stay
/// strings until save, where they are coerced with the documented defaults.
#[derive(Debug, Clone)]
pub struct MediaDraft {
    pub id: String,
    pub media_type: MediaType,
    pub title: String,
    pub year: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub total_episodes: u32,
    pub status: WatchStatus,
    pub watched_input: String,
    pub season_input: String,
    pub episode_input: String,
    pub progress: u32,
    pub focus: ModalField,
}

impl MediaDraft {
    /// New-record draft seeded from a catalog result: episode tracking and
    /// progress start from scratch, status defaults to plan-to-watch.
    pub fn from_search(result: &SearchResult) -> Self {
        Self {
            id: result.id.clone(),
            media_type: result.media_type,
            title: result.title.clone(),
            year: result.year.clone(),
            overview: result.overview.clone(),
            poster_path: result.poster_path.clone(),
            total_episodes: 0,
            status: WatchStatus::ToWatch,
            watched_input: "0".to_string(),
            season_input: "1".to_string(),
            episode_input: "1".to_string(),
            progress: 0,
            focus: ModalField::Status,
        }
    }

    /// Edit draft carrying the stored record's current values.
    pub fn from_record(record: &MediaRecord) -> Self {
        Self {
            id: record.id.clone(),
            media_type: record.media_type,
            title: record.title.clone(),
            year: record.year.clone().unwrap_or_default(),
            overview: record.overview.clone(),
            poster_path: record.poster_path.clone(),
            total_episodes: record.total_episodes,
            status: record.status,
            watched_input: record.watched_episodes.to_string(),
            season_input: record.season.unwrap_or(1).to_string(),
            episode_input: record.episode.unwrap_or(1).to_string(),
            progress: record.progress,
            focus: ModalField::Status,
        }
    }

    pub fn status_options(&self) -> &'static [WatchStatus] {
        WatchStatus::options_for(self.media_type)
    }

    /// Change the selected status, applying the completion rules: a completed
    /// TV show jumps to its known episode total, a completed movie to 100%.
    pub fn set_status(&mut self, status: WatchStatus) {
        self.status = status;
        match self.media_type {
            MediaType::Tv => {
                if status == WatchStatus::Completed && self.total_episodes > 0 {
                    self.watched_input = self.total_episodes.to_string();
                }
            }
            MediaType::Movie => {
                if status == WatchStatus::Completed {
                    self.progress = 100;
                }
            }
        }
        if !self.fields().contains(&self.focus) {
            self.focus = ModalField::Status;
        }
    }

    pub fn cycle_status(&mut self) {
        self.set_status(self.status.next_for(self.media_type));
    }

    pub fn cycle_status_back(&mut self) {
        self.set_status(self.status.prev_for(self.media_type));
    }

    /// Episode-tracking inputs only apply to a TV show currently being watched.
    pub fn episode_inputs_visible(&self) -> bool {
        self.media_type == MediaType::Tv && self.status == WatchStatus::Watching
    }

    /// Fields currently reachable with Tab, in visual order.
    pub fn fields(&self) -> Vec<ModalField> {
        let mut fields = vec![ModalField::Status];
        match self.media_type {
            MediaType::Tv => {
                if self.episode_inputs_visible() {
                    fields.extend([ModalField::Watched, ModalField::Season, ModalField::Episode]);
                }
            }
            MediaType::Movie => fields.push(ModalField::Progress),
        }
        fields
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + 1) % fields.len()];
    }

    pub fn adjust_progress(&mut self, delta: i32) {
        let value = self.progress as i32 + delta;
        self.progress = value.clamp(0, 100) as u32;
    }

    /// Serialize the form. Unparsable or empty numeric inputs fall back to 0
    /// (watched) and 1 (season/episode); movie records zero the episode
    /// semantics and carry no season/episode at all.
    pub fn build_payload(&self, username: &str, poster_path: Option<String>) -> MediaPayload {
        let is_tv = self.media_type == MediaType::Tv;

        MediaPayload {
            id: self.id.clone(),
            username: username.to_string(),
            media_type: self.media_type,
            title: self.title.clone(),
            year: self.year.clone(),
            overview: self.overview.clone().unwrap_or_default(),
            poster_path,
            status: self.status,
            watched_episodes: if is_tv {
                self.watched_input.trim().parse().unwrap_or(0)
            } else {
                0
            },
            total_episodes: self.total_episodes,
            progress: if is_tv { 0 } else { self.progress },
            season: is_tv.then(|| self.season_input.trim().parse().unwrap_or(1)),
            episode: is_tv.then(|| self.episode_input.trim().parse().unwrap_or(1)),
        }
    }
}

/// The three mutually-exclusive modal states. Add and edit both hold a live
/// draft; everything else in the app sees the modal as a single value.
#[derive(Debug, Clone, Default)]
pub enum ModalState {
    #[default]
    Closed,
    AddPending(MediaDraft),
    EditPending(MediaDraft),
}

impl ModalState {
    pub fn open_add(result: &SearchResult) -> Self {
        ModalState::AddPending(MediaDraft::from_search(result))
    }

    pub fn open_edit(record: &MediaRecord) -> Self {
        ModalState::EditPending(MediaDraft::from_record(record))
    }

    /// Discard any in-progress edits.
    pub fn close(&mut self) {
        *self = ModalState::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, ModalState::EditPending(_))
    }

    pub fn draft(&self) -> Option<&MediaDraft> {
        match self {
            ModalState::Closed => None,
            ModalState::AddPending(draft) | ModalState::EditPending(draft) => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut MediaDraft> {
        match self {
            ModalState::Closed => None,
            ModalState::AddPending(draft) | ModalState::EditPending(draft) => Some(draft),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tv_result() -> SearchResult {
        SearchResult {
            id: "tv-603".to_string(),
            tmdb_id: 603,
            media_type: MediaType::Tv,
            title: "Monster".to_string(),
            year: "2004".to_string(),
            overview: Some("A surgeon hunts a former patient.".to_string()),
            poster_path: Some("https://image.tmdb.org/t/p/w500/m.jpg".to_string()),
        }
    }

    fn movie_result() -> SearchResult {
        SearchResult {
            id: "movie-438631".to_string(),
            tmdb_id: 438631,
            media_type: MediaType::Movie,
            title: "Dune".to_string(),
            year: "2021".to_string(),
            overview: None,
            poster_path: None,
        }
    }

    fn tv_record() -> MediaRecord {
        MediaRecord {
            id: "tv-603".to_string(),
            media_type: MediaType::Tv,
            title: "Monster".to_string(),
            year: Some("2004".to_string()),
            overview: None,
            poster_path: Some("https://image.tmdb.org/t/p/w500/m.jpg".to_string()),
            status: WatchStatus::Watching,
            watched_episodes: 12,
            total_episodes: 74,
            progress: 0,
            season: Some(2),
            episode: Some(3),
        }
    }

    #[test]
    fn add_tv_resets_tracking_fields() {
        let state = ModalState::open_add(&tv_result());
        let draft = state.draft().unwrap();

        assert_eq!(draft.status, WatchStatus::ToWatch);
        assert_eq!(draft.watched_input, "0");
        assert_eq!(draft.season_input, "1");
        assert_eq!(draft.episode_input, "1");
        assert!(draft.status_options().contains(&WatchStatus::Dropped));
        assert!(!state.is_edit());
    }

    #[test]
    fn add_movie_resets_progress_and_hides_dropped() {
        let state = ModalState::open_add(&movie_result());
        let draft = state.draft().unwrap();

        assert_eq!(draft.progress, 0);
        assert_eq!(draft.status, WatchStatus::ToWatch);
        assert!(!draft.status_options().contains(&WatchStatus::Dropped));
    }

    #[test]
    fn edit_keeps_stored_values() {
        let state = ModalState::open_edit(&tv_record());
        let draft = state.draft().unwrap();

        assert_eq!(draft.status, WatchStatus::Watching);
        assert_eq!(draft.watched_input, "12");
        assert_eq!(draft.season_input, "2");
        assert_eq!(draft.episode_input, "3");
        assert!(state.is_edit());
    }

    #[test]
    fn completing_tv_fills_watched_from_known_total() {
        let mut draft = MediaDraft::from_record(&tv_record());
        draft.set_status(WatchStatus::Completed);
        assert_eq!(draft.watched_input, "74");
    }

    #[test]
    fn completing_tv_with_unknown_total_leaves_watched() {
        let mut draft = MediaDraft::from_search(&tv_result());
        draft.watched_input = "5".to_string();
        draft.set_status(WatchStatus::Completed);
        assert_eq!(draft.watched_input, "5");
    }

    #[test]
    fn completing_movie_forces_full_progress() {
        let mut draft = MediaDraft::from_search(&movie_result());
        draft.progress = 37;
        draft.set_status(WatchStatus::Completed);
        assert_eq!(draft.progress, 100);
    }

    #[test]
    fn episode_inputs_follow_watching_status() {
        let mut draft = MediaDraft::from_search(&tv_result());
        assert!(!draft.episode_inputs_visible());

        draft.set_status(WatchStatus::Watching);
        assert!(draft.episode_inputs_visible());
        assert!(draft.fields().contains(&ModalField::Watched));

        draft.focus = ModalField::Episode;
        draft.set_status(WatchStatus::Dropped);
        assert!(!draft.episode_inputs_visible());
        // Focus falls back once its field disappears
        assert_eq!(draft.focus, ModalField::Status);
    }

    #[test]
    fn payload_defaults_for_empty_inputs() {
        let mut draft = MediaDraft::from_search(&tv_result());
        draft.watched_input.clear();
        draft.season_input.clear();
        draft.episode_input = "not a number".to_string();

        let payload = draft.build_payload("ana", None);
        assert_eq!(payload.watched_episodes, 0);
        assert_eq!(payload.season, Some(1));
        assert_eq!(payload.episode, Some(1));
        assert_eq!(payload.progress, 0);
    }

    #[test]
    fn movie_payload_zeroes_episode_semantics() {
        let mut draft = MediaDraft::from_search(&movie_result());
        draft.progress = 55;
        draft.set_status(WatchStatus::Watching);

        let payload = draft.build_payload("ana", Some("poster".to_string()));
        assert_eq!(payload.watched_episodes, 0);
        assert_eq!(payload.season, None);
        assert_eq!(payload.episode, None);
        assert_eq!(payload.progress, 55);
        assert_eq!(payload.poster_path.as_deref(), Some("poster"));
    }

    #[test]
    fn progress_adjustment_clamps() {
        let mut draft = MediaDraft::from_search(&movie_result());
        draft.adjust_progress(-10);
        assert_eq!(draft.progress, 0);
        draft.adjust_progress(250);
        assert_eq!(draft.progress, 100);
    }

    #[test]
    fn close_discards_draft() {
        let mut state = ModalState::open_edit(&tv_record());
        state.draft_mut().unwrap().watched_input = "70".to_string();
        state.close();
        assert!(!state.is_open());
        assert!(state.draft().is_none());
    }
}
