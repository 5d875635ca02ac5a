//! Handlers for the `/assistant` resource: project-recommendation chat,
//! history, and message ratings.
//!
//! Chat embeds the user's message and every approved project abstract in
//! one request to the embedding sidecar, ranks the abstracts by cosine
//! similarity, and answers with the closest listings. Both sides of the
//! exchange are stored so the history endpoint can replay it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use projecthub_assistant::rank_by_similarity;
use projecthub_core::error::CoreError;
use projecthub_core::types::DbId;
use projecthub_db::models::assistant::{
    AssistantMessage, ChatRequest, MessageRating, RateMessage, SENDER_ASSISTANT, SENDER_USER,
};
use projecthub_db::repositories::{AssistantRepo, ProjectRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::input::clean_required;
use crate::middleware::auth::AuthUser;
use crate::middleware::rate_limit::{self, OP_ASSISTANT_CHAT};
use crate::query::PaginationParams;
use crate::state::AppState;

/// How many project suggestions a chat reply carries.
const TOP_K: usize = 5;

/// One suggested project in a [`ChatResponse`].
#[derive(Debug, Serialize)]
pub struct ProjectSuggestion {
    pub project_id: DbId,
    pub title: String,
    pub score: f32,
}

/// Response body for `POST /assistant/chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub user_message: AssistantMessage,
    pub assistant_message: AssistantMessage,
    pub suggestions: Vec<ProjectSuggestion>,
}

/// POST /api/v1/assistant/chat
pub async fn chat(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    rate_limit::enforce(&state, auth_user.user_id, OP_ASSISTANT_CHAT).await?;
    input.validate()?;
    let message = clean_required(&input.message, "message")?;

    let user_message =
        AssistantRepo::insert_message(&state.pool, auth_user.user_id, SENDER_USER, &message)
            .await?;

    let summaries = ProjectRepo::list_approved_summaries(&state.pool).await?;
    let suggestions = if summaries.is_empty() {
        Vec::new()
    } else {
        // One request: the query first, then every abstract.
        let mut texts = Vec::with_capacity(summaries.len() + 1);
        texts.push(message.clone());
        texts.extend(
            summaries
                .iter()
                .map(|(_, title, abstract_text)| format!("{title}. {abstract_text}")),
        );
        let embeddings = state.embedding.embed(&texts).await?;

        let (query, candidates) = embeddings.split_first().ok_or_else(|| {
            AppError::InternalError("Embedding service returned no vectors".into())
        })?;
        select_suggestions(&summaries, query, candidates)?
    };

    let reply = compose_reply(&suggestions);
    let assistant_message =
        AssistantRepo::insert_message(&state.pool, auth_user.user_id, SENDER_ASSISTANT, &reply)
            .await?;

    Ok(Json(ChatResponse {
        user_message,
        assistant_message,
        suggestions,
    }))
}

/// GET /api/v1/assistant/history
pub async fn history(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Vec<AssistantMessage>>> {
    let messages = AssistantRepo::list_by_user(
        &state.pool,
        auth_user.user_id,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;
    Ok(Json(messages))
}

/// POST /api/v1/assistant/messages/{id}/rating
///
/// Rate one of the assistant's replies from the caller's own history.
/// A second rating for the same message conflicts.
pub async fn rate_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RateMessage>,
) -> AppResult<(StatusCode, Json<MessageRating>)> {
    input.validate()?;

    let message = AssistantRepo::find_message(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "message",
            id,
        }))?;
    if message.user_id != auth_user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only rate messages from your own conversation".into(),
        )));
    }
    if message.sender != SENDER_ASSISTANT {
        return Err(AppError::Core(CoreError::Validation(
            "Only assistant replies can be rated".into(),
        )));
    }

    let rating =
        AssistantRepo::rate_message(&state.pool, id, auth_user.user_id, input.rating).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rank candidate abstracts against the query and pair the winning
/// indices back to their projects.
///
/// The sidecar must return exactly one vector per candidate text;
/// anything else means the ranked indices no longer line up with
/// `summaries`, so the response is rejected instead of pairing the
/// wrong projects.
fn select_suggestions(
    summaries: &[(DbId, String, String)],
    query: &[f32],
    candidates: &[Vec<f32>],
) -> Result<Vec<ProjectSuggestion>, AppError> {
    if candidates.len() != summaries.len() {
        return Err(AppError::InternalError(format!(
            "Embedding service returned {} candidate vectors for {} projects",
            candidates.len(),
            summaries.len()
        )));
    }
    Ok(rank_by_similarity(query, candidates, TOP_K)
        .into_iter()
        .map(|(idx, score)| ProjectSuggestion {
            project_id: summaries[idx].0,
            title: summaries[idx].1.clone(),
            score,
        })
        .collect())
}

fn compose_reply(suggestions: &[ProjectSuggestion]) -> String {
    if suggestions.is_empty() {
        return "I could not find any approved projects matching your interests yet. \
                Try describing the topics or technologies you enjoy."
            .to_string();
    }

    let mut reply = String::from("Based on your interests, these projects look like good fits:\n");
    for (i, s) in suggestions.iter().enumerate() {
        reply.push_str(&format!("{}. {} (project #{})\n", i + 1, s.title, s.project_id));
    }
    reply.push_str("Open a listing for the full abstract, or bookmark the ones you like.");
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_suggestions_compose_fallback_reply() {
        let reply = compose_reply(&[]);
        assert!(reply.contains("could not find"));
    }

    #[test]
    fn test_reply_lists_each_suggestion() {
        let suggestions = vec![
            ProjectSuggestion {
                project_id: 3,
                title: "Campus Navigation App".into(),
                score: 0.91,
            },
            ProjectSuggestion {
                project_id: 8,
                title: "Exam Scheduler".into(),
                score: 0.77,
            },
        ];
        let reply = compose_reply(&suggestions);
        assert!(reply.contains("1. Campus Navigation App (project #3)"));
        assert!(reply.contains("2. Exam Scheduler (project #8)"));
    }

    #[test]
    fn test_suggestions_pair_ranked_indices_to_their_projects() {
        let summaries = vec![
            (3, "Campus Navigation App".to_string(), "Indoor maps".to_string()),
            (8, "Exam Scheduler".to_string(), "Timetabling".to_string()),
        ];
        let query = [1.0, 0.0];
        let candidates = vec![vec![0.0, 1.0], vec![1.0, 0.0]];

        let suggestions = select_suggestions(&summaries, &query, &candidates).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].project_id, 8);
        assert_eq!(suggestions[1].project_id, 3);
    }

    #[test]
    fn test_surplus_candidate_vectors_are_rejected() {
        let summaries = vec![(3, "Campus Navigation App".to_string(), "Indoor maps".to_string())];
        let query = [1.0, 0.0];
        // Three vectors for a single project. Indexing by rank position
        // would reach past the summaries.
        let candidates = vec![vec![0.5, 0.5], vec![1.0, 0.0], vec![0.0, 1.0]];

        let err = select_suggestions(&summaries, &query, &candidates).unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
