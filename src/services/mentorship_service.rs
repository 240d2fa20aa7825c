use futures::stream::{self, StreamExt};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::api::metrics;
use crate::config::MatchingSettings;
use crate::models::{
    AdviceAuthor, AlumniFilter, CareerAdvice, CareerAdviceFilter, CareerAdviceResponse,
    CreateCareerAdviceRequest, CreateMentorshipRequest, MentorMatch, Mentorship,
    MentorshipResponse, MentorshipStatus, User,
};
use crate::repositories::{CareerAdviceRepository, MentorshipRepository, MENTORSHIP_EXISTS};
use crate::services::ai_service::{AdviceAnalysis, AiError, AiMatcher, MatchAnalysis};
use crate::services::auth_service::AuthService;
use crate::utils::error::AppError;
use crate::utils::{parse_object_id, INVALID_USER_ID};

const TOP_MATCHES: usize = 5;

pub struct MentorshipService {
    mentorships: Arc<dyn MentorshipRepository>,
    advice: Arc<dyn CareerAdviceRepository>,
    auth: Arc<AuthService>,
    ai: AiMatcher,
    matching: MatchingSettings,
}

impl MentorshipService {
    pub fn new(
        mentorships: Arc<dyn MentorshipRepository>,
        advice: Arc<dyn CareerAdviceRepository>,
        auth: Arc<AuthService>,
        ai: AiMatcher,
        matching: MatchingSettings,
    ) -> Self {
        Self {
            mentorships,
            advice,
            auth,
            ai,
            matching,
        }
    }

    /// Runs a match analysis under the configured per-call timeout.
    async fn analyze_match(
        &self,
        student: &User,
        alumni: &User,
        goals: &str,
    ) -> Result<MatchAnalysis, AiError> {
        let timeout = self.matching.call_timeout;
        tokio::time::timeout(timeout, self.ai.analyze_mentorship_match(student, alumni, goals))
            .await
            .map_err(|_| AiError::Timeout(timeout))?
    }

    pub async fn create_mentorship_request(
        &self,
        student_id: &str,
        request: CreateMentorshipRequest,
    ) -> Result<MentorshipResponse, AppError> {
        let student_oid = parse_object_id(student_id, INVALID_USER_ID)?;
        let alumni_oid = parse_object_id(&request.alumni_id, INVALID_USER_ID)?;
        if student_oid == alumni_oid {
            return Err(AppError::bad_request("Cannot request mentorship from yourself"));
        }

        let student = self.auth.require_user(student_id).await?;
        let alumni = self.auth.require_user(&request.alumni_id).await?;

        if self
            .mentorships
            .find_open(&student_oid, &alumni_oid)
            .await?
            .is_some()
        {
            return Err(AppError::bad_request(MENTORSHIP_EXISTS));
        }

        let analysis = match self.analyze_match(&student, &alumni, &request.goals).await {
            Ok(analysis) => analysis,
            Err(e) => {
                log::warn!("⚠️  Match analysis failed, storing request without a score: {}", e);
                metrics::increment_ai_failure_count();
                MatchAnalysis::default()
            }
        };

        // The insert is still the authority: a request created since the check above loses here.
        let mentorship = self
            .mentorships
            .insert(Mentorship::new_request(
                student_oid,
                alumni_oid,
                &request.goals,
                analysis.score,
                analysis.reason,
            ))
            .await?;

        log::info!(
            "🤝 Mentorship requested: student {} -> alumni {} (score {:?})",
            student_oid,
            alumni_oid,
            mentorship.match_score
        );
        Ok(mentorship.into())
    }

    /// Scores every alumnus against the student and returns the best five.
    /// A failed or timed out analysis is flagged rather than failing the call.
    pub async fn find_mentor_matches(&self, student_id: &str) -> Result<Vec<MentorMatch>, AppError> {
        let student = self.auth.require_user(student_id).await?;
        let candidates: Vec<User> = self
            .auth
            .find_alumni_records(&AlumniFilter::default())
            .await?
            .into_iter()
            .filter(|alumnus| alumnus.id != student.id)
            .collect();

        log::info!(
            "🔎 Matching student {} against {} alumni (concurrency {})",
            student_id,
            candidates.len(),
            self.matching.max_concurrency
        );

        let student = &student;
        let mut matches: Vec<MentorMatch> = stream::iter(candidates)
            .map(|alumnus| async move {
                let outcome = self.analyze_match(student, &alumnus, "").await;
                match outcome {
                    Ok(analysis) => MentorMatch {
                        alumni: alumnus.into(),
                        match_score: analysis.score,
                        match_reason: analysis.reason,
                        analysis_failed: false,
                    },
                    Err(e) => {
                        log::warn!("⚠️  Match analysis failed for alumni {}: {}", alumnus.id_hex(), e);
                        metrics::increment_ai_failure_count();
                        MentorMatch {
                            alumni: alumnus.into(),
                            match_score: None,
                            match_reason: None,
                            analysis_failed: true,
                        }
                    }
                }
            })
            .buffer_unordered(self.matching.max_concurrency.max(1))
            .collect()
            .await;

        // None sorts below any score, so unscored candidates end up last.
        matches.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| a.alumni.name.cmp(&b.alumni.name))
        });
        matches.truncate(TOP_MATCHES);
        Ok(matches)
    }

    pub async fn create_career_advice(
        &self,
        alumni_id: &str,
        request: CreateCareerAdviceRequest,
    ) -> Result<CareerAdviceResponse, AppError> {
        request.validate()?;
        let author = self.auth.require_user(alumni_id).await?;
        if !author.is_alumni() {
            return Err(AppError::forbidden("Only alumni can post career advice"));
        }
        let author_id = author
            .id
            .ok_or_else(|| AppError::internal("Stored user has no _id"))?;

        let timeout = self.matching.call_timeout;
        let analysis =
            match tokio::time::timeout(timeout, self.ai.analyze_career_advice(&request.content))
                .await
            {
                Ok(Ok(analysis)) => analysis,
                Ok(Err(e)) => {
                    log::warn!("⚠️  Career advice analysis failed: {}", e);
                    metrics::increment_ai_failure_count();
                    AdviceAnalysis::default()
                }
                Err(_) => {
                    log::warn!("⚠️  Career advice analysis timed out after {:?}", timeout);
                    metrics::increment_ai_failure_count();
                    AdviceAnalysis::default()
                }
            };

        let now = BsonDateTime::now();
        let advice = self
            .advice
            .insert(CareerAdvice {
                id: None,
                alumni_id: author_id,
                title: request.title,
                content: request.content,
                ai_generated_summary: analysis.summary,
                tags: analysis.tags,
                likes: 0,
                liked_by: vec![],
                created_at: now,
                updated_at: now,
            })
            .await?;

        log::info!("📝 Career advice posted by {}: {}", alumni_id, advice.title);
        Ok(CareerAdviceResponse::new(advice, Some(AdviceAuthor::from(&author))))
    }

    pub async fn get_career_advice(
        &self,
        filter: &CareerAdviceFilter,
    ) -> Result<Vec<CareerAdviceResponse>, AppError> {
        let posts = self.advice.find(filter).await?;

        let mut author_ids: Vec<ObjectId> = posts.iter().map(|p| p.alumni_id).collect();
        author_ids.sort();
        author_ids.dedup();

        let authors: HashMap<ObjectId, AdviceAuthor> = self
            .auth
            .find_users(&author_ids)
            .await?
            .iter()
            .filter_map(|user| user.id.map(|id| (id, AdviceAuthor::from(user))))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.alumni_id).cloned();
                CareerAdviceResponse::new(post, author)
            })
            .collect())
    }

    /// Idempotent: liking twice leaves a single entry in `likedBy`.
    pub async fn like_career_advice(
        &self,
        advice_id: &str,
        user_id: &str,
    ) -> Result<CareerAdviceResponse, AppError> {
        let advice_oid = parse_object_id(advice_id, "Invalid career advice ID format")?;
        let user_oid = parse_object_id(user_id, INVALID_USER_ID)?;

        let advice = self
            .advice
            .like(&advice_oid, &user_oid)
            .await?
            .ok_or_else(|| AppError::not_found("Career advice not found"))?;

        let author = self
            .auth
            .find_users(&[advice.alumni_id])
            .await?
            .first()
            .map(AdviceAuthor::from);
        Ok(CareerAdviceResponse::new(advice, author))
    }

    pub async fn update_mentorship_status(
        &self,
        mentorship_id: &str,
        new_status: MentorshipStatus,
        user_id: &str,
    ) -> Result<MentorshipResponse, AppError> {
        let id = parse_object_id(mentorship_id, "Invalid mentorship ID format")?;
        let user_oid = parse_object_id(user_id, INVALID_USER_ID)?;

        let mentorship = self
            .mentorships
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found("Mentorship not found"))?;

        if !mentorship.involves(&user_oid) {
            return Err(AppError::forbidden("Unauthorized to update this mentorship"));
        }

        let current = mentorship.status;
        if !current.can_transition_to(new_status) {
            log::warn!(
                "⚠️  Rejected transition {} -> {} on mentorship {}",
                current,
                new_status,
                mentorship_id
            );
            return Err(AppError::bad_request("Invalid status transition"));
        }

        // Conditional on the status read above; a concurrent change wins.
        let updated = self
            .mentorships
            .update_status(&id, current, new_status)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid status transition"))?;

        log::info!("🔄 Mentorship {} moved {} -> {}", mentorship_id, current, new_status);
        Ok(updated.into())
    }

    pub async fn list_mentorships_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<MentorshipResponse>, AppError> {
        let user_oid = parse_object_id(user_id, INVALID_USER_ID)?;
        let mentorships = self.mentorships.find_for_user(&user_oid).await?;
        Ok(mentorships.into_iter().map(MentorshipResponse::from).collect())
    }
}
