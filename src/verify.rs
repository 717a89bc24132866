use std::future::Future;

use tokio::sync::oneshot;
use tracing::debug;

/// A pending manual confirmation: the candidate poster and a single-shot
/// reply channel back into the awaiting save. Consuming the prompt either
/// way guarantees the caller is never left hanging.
#[derive(Debug)]
pub struct PosterPrompt {
    pub title: String,
    pub image_url: String,
    reply: oneshot::Sender<Option<String>>,
}

impl PosterPrompt {
    /// Accept the displayed image; the save proceeds with exactly this URL.
    pub fn confirm(self) {
        let url = self.image_url;
        let _ = self.reply.send(Some(url));
    }

    /// Dismiss without confirming; the awaiting save aborts.
    pub fn dismiss(self) {
        let _ = self.reply.send(None);
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PosterResolution {
    /// Verified (automatically or manually); persist this URL.
    Approved(String),
    /// The confirmation dialog was dismissed; do not persist anything.
    Cancelled,
}

/// Two-stage poster gate. The automated verdict decides alone when positive;
/// otherwise a `PosterPrompt` is handed to the UI and the call suspends on
/// the user's single confirm/dismiss decision.
pub async fn resolve_poster<F>(
    ai_approved: impl Future<Output = bool>,
    title: &str,
    candidate: String,
    request_confirmation: F,
) -> PosterResolution
where
    F: FnOnce(PosterPrompt),
{
    if ai_approved.await {
        return PosterResolution::Approved(candidate);
    }

    debug!(title = %title, "Poster needs manual confirmation");

    let (reply, decision) = oneshot::channel();
    request_confirmation(PosterPrompt {
        title: title.to_string(),
        image_url: candidate,
        reply,
    });

    match decision.await {
        Ok(Some(url)) => PosterResolution::Approved(url),
        // Dismissed, or the prompt was dropped without an answer
        Ok(None) | Err(_) => PosterResolution::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTER: &str = "https://image.tmdb.org/t/p/w500/m.jpg";

    #[tokio::test]
    async fn approved_verdict_skips_confirmation() {
        let resolution = resolve_poster(async { true }, "Monster", POSTER.to_string(), |_| {
            panic!("confirmation requested despite approval");
        })
        .await;

        assert_eq!(resolution, PosterResolution::Approved(POSTER.to_string()));
    }

    #[tokio::test]
    async fn rejection_routes_through_confirmation() {
        let resolution = resolve_poster(async { false }, "Monster", POSTER.to_string(), |prompt| {
            assert_eq!(prompt.title, "Monster");
            assert_eq!(prompt.image_url, POSTER);
            prompt.confirm();
        })
        .await;

        // The final URL is exactly what the prompt displayed
        assert_eq!(resolution, PosterResolution::Approved(POSTER.to_string()));
    }

    #[tokio::test]
    async fn dismissal_cancels_the_save() {
        let resolution = resolve_poster(async { false }, "Monster", POSTER.to_string(), |prompt| {
            prompt.dismiss();
        })
        .await;

        assert_eq!(resolution, PosterResolution::Cancelled);
    }

    #[tokio::test]
    async fn dropped_prompt_counts_as_cancelled() {
        let resolution =
            resolve_poster(async { false }, "Monster", POSTER.to_string(), drop).await;

        assert_eq!(resolution, PosterResolution::Cancelled);
    }
}
