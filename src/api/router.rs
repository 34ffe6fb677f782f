//! Triage API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. CORS is permissive so the form
//! front-end can call from any local origin.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the triage API router.
pub fn triage_api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/symptoms", get(endpoints::symptoms::list))
        .route("/predict", post(endpoints::predict::predict))
        .with_state(ctx);

    Router::new().nest("/api", routes).layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::engine::enrich::{NOT_AVAILABLE, NO_DESCRIPTION};
    use crate::engine::types::{SelectionPolicy, UnknownSymptomPolicy};
    use crate::model::{ConditionModel, MockModel, ModelError};
    use crate::reference::ReferenceData;

    fn test_ctx(model: MockModel, policy: SelectionPolicy) -> ApiContext {
        ApiContext::new(
            Arc::new(ReferenceData::load_test()),
            Arc::new(model),
            policy,
        )
    }

    fn permissive_policy() -> SelectionPolicy {
        SelectionPolicy {
            min_symptoms: 1,
            max_symptoms: 17,
            unknown_symptoms: UnknownSymptomPolicy::Ignore,
        }
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn predict_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/predict")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 65536)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_response_shape() {
        let app = triage_api_router(test_ctx(
            MockModel::with_probabilities(vec![0.2, 0.3, 0.5]),
            SelectionPolicy::default(),
        ));

        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["symptoms"], 6);
        assert_eq!(json["conditions"], 3);
        assert!(!json["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn symptoms_response_is_sorted_and_carries_policy() {
        let app = triage_api_router(test_ctx(
            MockModel::with_probabilities(vec![0.2, 0.3, 0.5]),
            SelectionPolicy::default(),
        ));

        let response = app.oneshot(get_request("/api/symptoms")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let symptoms: Vec<&str> = json["symptoms"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        let mut sorted = symptoms.clone();
        sorted.sort();
        assert_eq!(symptoms, sorted);
        assert!(symptoms.contains(&"itching"));
        assert_eq!(json["min_symptoms"], 3);
        assert_eq!(json["max_symptoms"], 17);
    }

    #[tokio::test]
    async fn predict_single_response_shape() {
        // Label 2 = Malaria wins.
        let app = triage_api_router(test_ctx(
            MockModel::with_probabilities(vec![0.1, 0.2, 0.7]),
            permissive_policy(),
        ));

        let response = app
            .oneshot(predict_request(
                r#"{"symptoms": ["highfever", "chills", "vomiting"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["prediction"]["condition"], "Malaria");
        assert!(json["prediction"]["description"]
            .as_str()
            .unwrap()
            .contains("mosquito-borne"));
        assert_eq!(json["prediction"]["precautions"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn predict_ranked_response_shape() {
        let app = triage_api_router(test_ctx(
            MockModel::with_probabilities(vec![0.25, 0.6, 0.15]),
            permissive_policy(),
        ));

        let response = app
            .oneshot(predict_request(r#"{"symptoms": ["itching"], "top_k": 5}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let predictions = json["predictions"].as_array().unwrap();
        assert_eq!(predictions.len(), 3); // min(K, known conditions)
        assert_eq!(predictions[0]["condition"], "Common Cold");
        assert_eq!(predictions[0]["description"], NO_DESCRIPTION);
        assert_eq!(predictions[0]["precautions"][0], NOT_AVAILABLE);
        let p0 = predictions[0]["probability"].as_f64().unwrap();
        let p1 = predictions[1]["probability"].as_f64().unwrap();
        assert!(p0 >= p1);
    }

    #[tokio::test]
    async fn predict_rejects_out_of_policy_count() {
        let app = triage_api_router(test_ctx(
            MockModel::with_probabilities(vec![0.2, 0.3, 0.5]),
            SelectionPolicy::default(), // min 3
        ));

        let response = app
            .oneshot(predict_request(r#"{"symptoms": ["itching", "chills"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("at least 3"));
    }

    #[tokio::test]
    async fn predict_strict_mode_rejects_unknown_symptom() {
        let strict = SelectionPolicy {
            min_symptoms: 1,
            max_symptoms: 17,
            unknown_symptoms: UnknownSymptomPolicy::Reject,
        };
        let app = triage_api_router(test_ctx(
            MockModel::with_probabilities(vec![0.2, 0.3, 0.5]),
            strict,
        ));

        let response = app
            .oneshot(predict_request(r#"{"symptoms": ["itching", "flying"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert!(json["error"]["message"].as_str().unwrap().contains("flying"));
    }

    #[tokio::test]
    async fn predict_rejects_zero_top_k() {
        let app = triage_api_router(test_ctx(
            MockModel::with_probabilities(vec![0.2, 0.3, 0.5]),
            permissive_policy(),
        ));

        let response = app
            .oneshot(predict_request(r#"{"symptoms": ["itching"], "top_k": 0}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn model_failure_surfaces_as_masked_500() {
        struct FailingModel;
        impl ConditionModel for FailingModel {
            fn predict(&self, _: &[f32]) -> Result<usize, ModelError> {
                Err(ModelError::Inference("backend gone".to_string()))
            }
            fn predict_proba(&self, _: &[f32]) -> Result<Vec<f32>, ModelError> {
                Err(ModelError::Inference("backend gone".to_string()))
            }
            fn label_count(&self) -> usize {
                3
            }
        }

        let ctx = ApiContext::new(
            Arc::new(ReferenceData::load_test()),
            Arc::new(FailingModel),
            permissive_policy(),
        );
        let app = triage_api_router(ctx);

        let response = app
            .oneshot(predict_request(r#"{"symptoms": ["itching"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "INTERNAL");
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let app = triage_api_router(test_ctx(
            MockModel::with_probabilities(vec![0.2, 0.3, 0.5]),
            SelectionPolicy::default(),
        ));

        let response = app.oneshot(get_request("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn predict_with_derived_model_round_trips() {
        let reference = Arc::new(ReferenceData::load_test());
        let ctx = ApiContext::new(
            reference.clone(),
            Arc::new(MockModel::derived(reference.label_count())),
            permissive_policy(),
        );
        let app = triage_api_router(ctx);

        let response = app
            .oneshot(predict_request(
                r#"{"symptoms": ["Itching", "CHILLS", "high_fever"], "top_k": 3}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let predictions = json["predictions"].as_array().unwrap();
        assert_eq!(predictions.len(), 3);
        for p in predictions {
            let probability = p["probability"].as_f64().unwrap();
            assert!((0.0..=1.0).contains(&probability));
        }
    }
}
