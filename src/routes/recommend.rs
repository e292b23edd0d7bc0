use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{RecommendError, SharedRecommender};
use crate::models::{FeedbackRequest, RecommendRequest, FeedbackResponse, RecommendResponse, HealthResponse, ErrorResponse, FeedbackStatus};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: SharedRecommender,
}

/// Configure versioned routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/feedback", web::post().to(record_feedback))
        .route("/recommend", web::post().to(recommend))
        .route("/stats", web::get().to(stats));
}

/// Original unversioned paths used by the browser client
pub fn configure_legacy(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/addvideo", web::post().to(record_feedback))
        .route("/recommend", web::post().to(recommend));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let trained = state.recommender.is_trained().await;

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        trained,
        timestamp: chrono::Utc::now(),
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn error_response(err: RecommendError) -> HttpResponse {
    match err {
        RecommendError::InvalidInput(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid input".to_string(),
            message,
            status_code: 400,
        }),
        RecommendError::Persistence(e) => {
            tracing::error!("Failed to persist feedback: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to persist feedback".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
        RecommendError::Task(e) => {
            tracing::error!("Feedback task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record feedback".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Record feedback endpoint
///
/// POST /api/v1/feedback (also POST /addvideo)
///
/// Request body:
/// ```json
/// {
///   "title": "string",
///   "liked": 0
/// }
/// ```
async fn record_feedback(
    state: web::Data<AppState>,
    req: web::Json<FeedbackRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for feedback request: {:?}", errors);
        return validation_failed(errors);
    }

    match state.recommender.record_feedback(&req.title, req.is_liked()).await {
        Ok((status, total_examples)) => {
            let message = match status {
                FeedbackStatus::Inserted => "Video added successfully.",
                FeedbackStatus::Updated => "Video updated successfully.",
                FeedbackStatus::Unchanged => "Video already exists with the same liked status.",
            };

            HttpResponse::Ok().json(FeedbackResponse {
                message: message.to_string(),
                status,
                total_examples,
            })
        }
        Err(e) => error_response(e),
    }
}

/// Recommendation endpoint
///
/// POST /api/v1/recommend (also POST /recommend)
///
/// Request body:
/// ```json
/// {
///   "title": "string"
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match state.recommender.classify(&req.title).await {
        Ok(verdict) => {
            tracing::debug!(
                "Liked: {}, Disliked: {}",
                verdict.scores.liked_score,
                verdict.scores.disliked_score
            );

            HttpResponse::Ok().json(RecommendResponse {
                title: req.into_inner().title,
                recommend: u8::from(verdict.recommend),
            })
        }
        Err(e) => error_response(e),
    }
}

/// Corpus and model statistics
///
/// GET /api/v1/stats
async fn stats(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.recommender.stats().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DecisionPolicy, Recommender, Tokenizer};
    use crate::models::{CorpusStats, LabeledExample};
    use crate::services::{MemoryStore, StoreError, TrainingStore, UpsertOutcome};
    use actix_web::{test, App};

    /// Store that holds a corpus but refuses every write
    struct ReadOnlyStore {
        examples: Vec<LabeledExample>,
    }

    impl TrainingStore for ReadOnlyStore {
        fn examples(&self) -> &[LabeledExample] {
            &self.examples
        }

        fn upsert(&mut self, _example: LabeledExample) -> Result<UpsertOutcome, StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "snapshot is read-only",
            )))
        }
    }

    fn state_with(store: impl TrainingStore + 'static) -> AppState {
        let recommender = Recommender::new(
            Box::new(store),
            Tokenizer::default(),
            DecisionPolicy::default(),
        );
        AppState {
            recommender: SharedRecommender::new(recommender),
        }
    }

    fn app_state() -> AppState {
        state_with(MemoryStore::default())
    }

    #[actix_web::test]
    async fn test_feedback_then_recommend() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/feedback")
            .set_json(serde_json::json!({ "title": "Rust tutorial", "liked": 1 }))
            .to_request();
        let resp: FeedbackResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, FeedbackStatus::Inserted);
        assert_eq!(resp.total_examples, 1);

        let req = test::TestRequest::post()
            .uri("/api/v1/recommend")
            .set_json(serde_json::json!({ "title": "Anything" }))
            .to_request();
        let resp: RecommendResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.title, "Anything");
        assert_eq!(resp.recommend, 1);
    }

    #[actix_web::test]
    async fn test_legacy_paths() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure_legacy),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/addvideo")
            .set_json(serde_json::json!({ "title": "Cooking", "liked": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_invalid_feedback_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await;

        for body in [
            serde_json::json!({ "title": "", "liked": 1 }),
            serde_json::json!({ "title": "Rust", "liked": 2 }),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/v1/feedback")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn test_persistence_failure_returns_500() {
        let store = ReadOnlyStore {
            examples: vec![
                LabeledExample::new("Rust tutorial", true),
                LabeledExample::new("Celebrity gossip", false),
            ],
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(store)))
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/stats").to_request();
        let before: CorpusStats = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/feedback")
            .set_json(serde_json::json!({ "title": "Cooking show", "liked": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.status_code, 500);
        assert_eq!(body.error, "Failed to persist feedback");
        assert!(body.message.contains("snapshot is read-only"));

        let req = test::TestRequest::get().uri("/api/v1/stats").to_request();
        let after: CorpusStats = test::call_and_read_body_json(&app, req).await;
        assert_eq!(after, before);
        assert_eq!(after.total_examples, 2);
        assert_eq!(after.liked_documents, 1);
        assert_eq!(after.disliked_documents, 1);
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "healthy");
        assert!(!resp.trained);
    }
}
