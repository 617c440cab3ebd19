pub mod health;
pub mod tools;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::scoring::handlers as scoring;
use crate::session::handlers as sessions;
use crate::state::AppState;
use crate::storage::editing;
use crate::storage::handlers as resumes;

/// PDF uploads only; JSON routes keep axum's default limit.
const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tools", get(tools::handle_list_tools))
        // Résumé API
        .route(
            "/api/v1/resumes",
            post(resumes::handle_store_resume).get(resumes::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/import-pdf",
            post(resumes::handle_import_pdf).layer(DefaultBodyLimit::max(MAX_PDF_BYTES)),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        .route("/api/v1/resumes/:id/export", get(resumes::handle_export_text))
        .route(
            "/api/v1/resumes/:id/json-resume",
            get(editing::handle_export_json_resume),
        )
        .route("/api/v1/resumes/:id/basics", patch(editing::handle_update_basics))
        .route("/api/v1/resumes/:id/target", put(editing::handle_set_target))
        .route("/api/v1/resumes/:id/work", post(editing::handle_add_work))
        .route(
            "/api/v1/resumes/:id/work/:entry",
            patch(editing::handle_update_work),
        )
        .route("/api/v1/resumes/:id/education", post(editing::handle_add_education))
        .route("/api/v1/resumes/:id/skills", post(editing::handle_add_skill))
        .route("/api/v1/resumes/:id/projects", post(editing::handle_add_project))
        .route(
            "/api/v1/resumes/:id/certificates",
            post(editing::handle_add_certificate),
        )
        .route("/api/v1/resumes/:id/languages", post(editing::handle_add_language))
        .route("/api/v1/resumes/:id/interests", post(editing::handle_add_interest))
        .route(
            "/api/v1/resumes/:id/entries/:entry",
            delete(editing::handle_delete_entry),
        )
        // Job analysis and scoring
        .route("/api/v1/jobs/analyze", post(scoring::handle_analyze_job))
        .route("/api/v1/score", post(scoring::handle_score))
        .route(
            "/api/v1/score/missing-keywords",
            post(scoring::handle_missing_keywords),
        )
        // Optimization sessions
        .route("/api/v1/sessions", post(sessions::handle_start_session))
        .route("/api/v1/sessions/:id", get(sessions::handle_session_summary))
        .route(
            "/api/v1/sessions/:id/next",
            get(sessions::handle_next_optimization),
        )
        .route(
            "/api/v1/sessions/:id/summary/options",
            post(sessions::handle_generate_summary_options),
        )
        .route(
            "/api/v1/sessions/:id/units/:unit/options",
            post(sessions::handle_generate_options),
        )
        .route(
            "/api/v1/sessions/:id/units/:unit/regenerate",
            post(sessions::handle_regenerate_options),
        )
        .route(
            "/api/v1/sessions/:id/units/:unit/accept",
            post(sessions::handle_accept),
        )
        .route(
            "/api/v1/sessions/:id/units/:unit/reject",
            post(sessions::handle_reject),
        )
        .route(
            "/api/v1/sessions/:id/finalize",
            post(sessions::handle_finalize),
        )
        .route("/api/v1/sessions/:id/abandon", post(sessions::handle_abandon))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::storage::MemoryResumeStore;

    const JD: &str = "Senior Backend Engineer. Requirements: distributed systems, Kubernetes, Rust. \
        Nice to have: Terraform.";

    fn resume() -> Value {
        json!({
            "basics": {
                "name": "Ada Lovelace",
                "label": "Backend Engineer",
                "email": "ada@example.com",
                "summary": "Backend engineer who builds reliable payment services in Rust for teams across three continents."
            },
            "work": [{
                "name": "Acme",
                "position": "Backend Engineer",
                "startDate": "2020-01",
                "highlights": [
                    "Worked on backend systems",
                    "Reduced p99 latency by 40% by batching ledger writes in Rust"
                ]
            }],
            "education": [{ "institution": "State University", "studyType": "B.S.", "area": "Computer Science" }],
            "skills": [{ "name": "Languages", "keywords": ["Rust", "Go"] }]
        })
    }

    fn app() -> (Router, Arc<MemoryResumeStore>) {
        let store = Arc::new(MemoryResumeStore::new());
        let state = AppState::for_tests(store.clone());
        (build_router(state), store)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn store_resume(app: &Router) -> String {
        let (status, body) = send(app, Method::POST, "/api/v1/resumes", Some(resume())).await;
        assert_eq!(status, StatusCode::CREATED);
        body["resume_id"].as_str().unwrap().to_string()
    }

    /// Id of the content unit whose text starts with `prefix`.
    fn unit_id(units: &Value, prefix: &str) -> u64 {
        units
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["text"].as_str().unwrap().starts_with(prefix))
            .unwrap()["unit_id"]
            .as_u64()
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_tools() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(&app, Method::GET, "/api/v1/tools", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        for name in [
            "score_resume",
            "start_interactive_optimization",
            "finalize_optimization",
            "add_work_experience",
            "export_json_resume",
        ] {
            assert!(names.contains(&name));
        }
    }

    #[tokio::test]
    async fn test_store_get_list_export() {
        let (app, _) = app();
        let id = store_resume(&app).await;

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/resumes/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume"]["basics"]["name"], "Ada Lovelace");
        assert_eq!(body["content_units"].as_array().unwrap().len(), 3);

        let (_, body) = send(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/resumes/{id}/export?template=classic"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_str().unwrap().starts_with("ADA LOVELACE"));

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/resumes/{id}/export?template=fancy"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/resumes/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, Method::GET, &format!("/api/v1/resumes/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_store_rejects_malformed_resume() {
        let (app, store) = app();
        let mut bad = resume();
        bad["basics"]["name"] = json!("");
        let (status, body) = send(&app, Method::POST, "/api/v1/resumes", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_score_is_pure_and_reports_gaps() {
        let (app, store) = app();
        let id = store_resume(&app).await;
        let request = json!({ "resume_id": id, "job_description": JD });

        let (status, first) = send(&app, Method::POST, "/api/v1/score", Some(request.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let (_, second) = send(&app, Method::POST, "/api/v1/score", Some(request)).await;
        assert_eq!(first, second);
        assert!(first["report"]["missing_keywords"]
            .as_array()
            .unwrap()
            .iter()
            .any(|k| k == "kubernetes"));
        assert_eq!(store.save_count(), 1);

        let (status, gaps) = send(
            &app,
            Method::POST,
            "/api/v1/score/missing-keywords",
            Some(json!({ "resume": resume(), "job_description": JD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(gaps["matched"].as_array().unwrap().iter().any(|k| k == "rust"));
        assert!(gaps["missing_preferred"]
            .as_array()
            .unwrap()
            .iter()
            .any(|k| k == "terraform"));
    }

    #[tokio::test]
    async fn test_score_rejects_empty_job_and_bad_weights() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/score",
            Some(json!({ "resume": resume(), "job_description": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/score",
            Some(json!({
                "resume": resume(),
                "job_description": JD,
                "options": { "weights": { "keyword_coverage": -1.0 } }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_job() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/analyze",
            Some(json!({ "job_description": JD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fingerprint"].as_str().unwrap().len(), 16);
        assert!(!body["job"]["keywords"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_flow_persists_on_finalize() {
        let (app, store) = app();
        let id = store_resume(&app).await;

        let (status, started) = send(
            &app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({ "resume_id": id, "job_description": JD })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let session = started["session_id"].as_str().unwrap().to_string();
        let weak = unit_id(&started["summary"]["units"], "Worked on");
        assert_eq!(started["next"]["unit"]["id"].as_u64(), Some(weak));

        let (status, options) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{weak}/options"),
            Some(json!({ "count": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(options["candidates"].as_array().unwrap().len(), 3);

        let (status, accepted) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{weak}/accept"),
            Some(json!({ "candidate": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(accepted["accepted_text"], options["candidates"][0]["text"]);

        let (status, finalized) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/finalize"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(finalized["persisted"]["version"], 2);
        assert!(finalized["report"]["overall"].as_f64() > finalized["baseline"]["overall"].as_f64());
        assert_eq!(store.save_count(), 2);

        let (_, stored) = send(&app, Method::GET, &format!("/api/v1/resumes/{id}"), None).await;
        assert_eq!(
            stored["resume"]["meta"]["score_history"].as_array().unwrap().len(),
            1
        );

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/finalize"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_STATE");
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn test_abandon_never_writes() {
        let (app, store) = app();
        let id = store_resume(&app).await;
        let (_, started) = send(
            &app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({ "resume_id": id, "job_description": JD })),
        )
        .await;
        let session = started["session_id"].as_str().unwrap().to_string();
        let weak = unit_id(&started["summary"]["units"], "Worked on");
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{weak}/options"),
            None,
        )
        .await;
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{weak}/accept"),
            Some(json!({ "candidate": 0 })),
        )
        .await;

        let (status, summary) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/abandon"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["status"], "abandoned");
        assert_eq!(store.save_count(), 1);

        let (_, stored) = send(&app, Method::GET, &format!("/api/v1/resumes/{id}"), None).await;
        assert_eq!(
            stored["resume"]["work"][0]["highlights"][0]["text"],
            "Worked on backend systems"
        );

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/finalize"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_inline_resume_session_is_not_persisted() {
        let (app, store) = app();
        let (_, started) = send(
            &app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({ "resume": resume(), "job_description": JD })),
        )
        .await;
        let session = started["session_id"].as_str().unwrap().to_string();
        let (status, finalized) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/finalize"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(finalized["persisted"].is_null());
        assert_eq!(finalized["json_resume"]["basics"]["name"], "Ada Lovelace");
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_session_error_codes() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (_, started) = send(
            &app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({ "resume": resume(), "job_description": JD })),
        )
        .await;
        let session = started["session_id"].as_str().unwrap().to_string();
        let weak = unit_id(&started["summary"]["units"], "Worked on");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{weak}/regenerate"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_STATE");

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{weak}/options"),
            Some(json!({ "count": 50 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{weak}/options"),
            None,
        )
        .await;
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{weak}/accept"),
            Some(json!({ "candidate": "Something never offered" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_SELECTION");
    }

    #[tokio::test]
    async fn test_summary_options_and_reject_regenerate() {
        let (app, _) = app();
        let (_, started) = send(
            &app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({ "resume": resume(), "job_description": JD })),
        )
        .await;
        let session = started["session_id"].as_str().unwrap().to_string();

        let (status, options) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/summary/options"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let summary_id = options["unit_id"].as_u64().unwrap();
        let first: Vec<Value> = options["candidates"].as_array().unwrap().clone();

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{summary_id}/reject"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "rejected");

        let (status, again) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{session}/units/{summary_id}/regenerate"),
            Some(json!({ "feedback": "more keywords" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again["round"], 2);
        for candidate in again["candidates"].as_array().unwrap() {
            assert!(first.iter().all(|c| c["text"] != candidate["text"]));
        }
    }

    #[tokio::test]
    async fn test_section_edits_create_versions() {
        let (app, store) = app();
        let id = store_resume(&app).await;
        let base = format!("/api/v1/resumes/{id}");

        let (status, added) = send(
            &app,
            Method::POST,
            &format!("{base}/work"),
            Some(json!({
                "company": "Globex",
                "position": "Platform Engineer",
                "start_date": "2022-02",
                "highlights": ["Migrated 40 services to Kubernetes"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(added["version"], 2);
        let work = added["entry_id"].as_u64().unwrap();
        assert!(unit_id(&added["content_units"], "Migrated 40") > work);

        let (status, patched) = send(
            &app,
            Method::PATCH,
            &format!("{base}/work/{work}"),
            Some(json!({ "end_date": "2024-06", "highlights": ["Ran the Terraform rollout"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let units = patched["content_units"].as_array().unwrap();
        assert!(units.iter().all(|u| u["text"] != "Migrated 40 services to Kubernetes"));

        let (status, skill) = send(
            &app,
            Method::POST,
            &format!("{base}/skills"),
            Some(json!({ "category": "languages", "keywords": ["rust", "Python"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        for (section, body) in [
            ("education", json!({ "institution": "Tech Institute", "study_type": "M.S." })),
            ("projects", json!({ "name": "ledgerd", "highlights": ["Wrote a ledger in Rust"] })),
            ("certificates", json!({ "name": "CKA", "issuer": "CNCF" })),
            ("languages", json!({ "language": "French", "fluency": "Professional" })),
            ("interests", json!({ "name": "Chess" })),
        ] {
            let (status, _) = send(&app, Method::POST, &format!("{base}/{section}"), Some(body)).await;
            assert_eq!(status, StatusCode::CREATED, "{section}");
        }

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("{base}/basics"),
            Some(json!({ "phone": "555-0100", "city": "London" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, target) = send(
            &app,
            Method::PUT,
            &format!("{base}/target"),
            Some(json!({ "industry": "fintech", "target_roles": ["Staff Engineer"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(target["version"], 11);
        assert_eq!(store.save_count(), 11);

        let (_, stored) = send(&app, Method::GET, &base, None).await;
        let doc = &stored["resume"];
        assert_eq!(doc["skills"].as_array().unwrap().len(), 1);
        assert_eq!(doc["skills"][0]["id"], skill["entry_id"]);
        assert_eq!(doc["skills"][0]["keywords"], json!(["Rust", "Go", "Python"]));
        assert_eq!(doc["work"][1]["end_date"], "2024-06");
        assert_eq!(doc["basics"]["location"]["city"], "London");
        assert_eq!(doc["meta"]["industry"], "fintech");
        assert_eq!(doc["meta"]["target_roles"], json!(["Staff Engineer"]));

        let (status, exported) = send(&app, Method::GET, &format!("{base}/json-resume"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(exported["work"][1]["endDate"], "2024-06");
        assert_eq!(exported["interests"][0]["name"], "Chess");
        assert_eq!(exported["languages"][0]["language"], "French");
        assert!(exported["work"][0].get("id").is_none());
    }

    #[tokio::test]
    async fn test_delete_entry_and_rejected_edits() {
        let (app, store) = app();
        let id = store_resume(&app).await;
        let base = format!("/api/v1/resumes/{id}");
        let (_, stored) = send(&app, Method::GET, &base, None).await;
        let weak = unit_id(&stored["content_units"], "Worked on");
        let education = stored["resume"]["education"][0]["id"].as_u64().unwrap();

        let (status, body) = send(&app, Method::DELETE, &format!("{base}/entries/{weak}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content_units"].as_array().unwrap().len(), 2);
        let (status, _) = send(&app, Method::DELETE, &format!("{base}/entries/{education}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(store.save_count(), 3);

        let (status, body) = send(&app, Method::DELETE, &format!("{base}/entries/{weak}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("{base}/work"),
            Some(json!({ "company": "Initech", "position": "Engineer", "start_date": "last spring" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("{base}/basics"),
            Some(json!({ "name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(store.save_count(), 3);

        let (_, stored) = send(&app, Method::GET, &base, None).await;
        assert!(stored["resume"]["education"].as_array().unwrap().is_empty());
        assert_eq!(stored["resume"]["basics"]["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_next_with_skip_current() {
        let (app, _) = app();
        let (_, started) = send(
            &app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({ "resume": resume(), "job_description": JD })),
        )
        .await;
        let session = started["session_id"].as_str().unwrap().to_string();
        let top = started["next"]["unit"]["id"].clone();

        let (status, skipped) = send(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{session}/next?skip_current=true"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(skipped["skipped"], top);
        assert!(skipped["next"]["unit"]["id"].is_u64());
        assert_ne!(skipped["next"]["unit"]["id"], top);

        let (_, plain) = send(&app, Method::GET, &format!("/api/v1/sessions/{session}/next"), None).await;
        assert_eq!(plain["next"]["unit"]["id"], top);
        assert!(plain["skipped"].is_null());
    }
}
