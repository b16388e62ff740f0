use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};

use fieldserve_client::{ApiClient, ClientConfig, ClientError};
use fieldserve_core::{CustomerId, DomainError, JobId, Money, ProductId, Quantity};
use fieldserve_events::{DataEvent, ViewKey, invalidated_views};
use fieldserve_jobs::{
    JobDraft, JobFilter, JobMaterial, JobStatus, PaymentDraft, PaymentType, StatusChangeRequest,
};
use fieldserve_stock::{StockMovementDraft, StockMovementType};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Serve a mock backend on an ephemeral port.
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig::new(&self.base_url)).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn job_json(id: i64, customer_id: i64, status: u8) -> Value {
    json!({
        "id": id,
        "customerId": customer_id,
        "jobNumber": format!("JOB-2026-{id:04}"),
        "title": "Warehouse cameras",
        "address": "Sanayi Cad. 4, Istanbul",
        "scheduledDate": "2026-02-01T09:00:00Z",
        "status": status,
        "totalAmount": 10000,
        "discountAmount": 1500,
        "finalAmount": 8500,
        "isActive": true,
        "createdAt": "2026-01-05T09:00:00Z",
        "updatedAt": "2026-01-05T09:00:00Z"
    })
}

fn payment_json(id: i64, job_id: i64, amount: f64, is_paid: bool) -> Value {
    json!({
        "id": id,
        "jobId": job_id,
        "amount": amount,
        "paymentType": 1,
        "paymentDate": "2026-02-02T09:00:00Z",
        "isPaid": is_paid,
        "createdAt": "2026-02-02T09:00:00Z"
    })
}

fn valid_job_draft(customer_id: i64) -> JobDraft {
    let mut draft = JobDraft::new(
        CustomerId::new(customer_id),
        "Warehouse cameras",
        "Sanayi Cad. 4, Istanbul",
        Utc::now(),
    );
    draft.total_amount = Money::from_major(10_000);
    draft
}

#[tokio::test]
async fn every_request_carries_a_fresh_correlation_id() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_in_handler = Arc::clone(&seen);

    let app = Router::new().route(
        "/jobs",
        get(move |headers: HeaderMap| {
            let seen = Arc::clone(&seen_in_handler);
            async move {
                let id = headers
                    .get("X-Request-Id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                seen.lock().unwrap().push(id);
                Json(json!([]))
            }
        }),
    );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();

    client.jobs(&JobFilter::default()).await.unwrap();
    client.jobs(&JobFilter::default()).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    for id in seen.iter() {
        uuid::Uuid::parse_str(id).expect("correlation id should be a uuid");
    }
    assert_ne!(seen[0], seen[1]);
}

#[tokio::test]
async fn job_detail_decodes_into_typed_domain_values() {
    let mut detail = job_json(7, 9, 7);
    detail["payments"] = json!([payment_json(1, 7, 4000.0, true)]);
    detail["materials"] = json!([]);

    let app = Router::new().route("/jobs/7", get(move || async move { Json(detail) }));
    let srv = TestServer::spawn(app).await;
    let client = srv.client();

    let snapshot = client.job_snapshot(JobId::new(7)).await.unwrap();

    assert_eq!(snapshot.job.status, JobStatus::InProgress);
    assert_eq!(snapshot.job.final_amount, Money::from_major(8_500));
    assert_eq!(snapshot.payments.len(), 1);
    assert_eq!(snapshot.payments[0].amount, Money::from_major(4_000));
    assert!(snapshot.payments[0].is_paid);
    assert!(snapshot.materials.is_empty());
    assert!(snapshot.expenses.is_empty());
}

#[tokio::test]
async fn list_filters_become_query_parameters() {
    let captured: Arc<Mutex<HashMap<String, String>>> = Arc::new(Mutex::new(HashMap::new()));
    let captured_in_handler = Arc::clone(&captured);

    let app = Router::new().route(
        "/jobs",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let captured = Arc::clone(&captured_in_handler);
            async move {
                *captured.lock().unwrap() = params;
                Json(json!([]))
            }
        }),
    );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();

    let filter = JobFilter {
        customer_id: Some(CustomerId::new(9)),
        status: Some(JobStatus::InstallationCompleted),
        is_paid: Some(true),
        ..JobFilter::default()
    };
    client.jobs(&filter).await.unwrap();

    let params = captured.lock().unwrap();
    assert_eq!(params.get("customerId"), Some(&"9".to_string()));
    assert_eq!(params.get("status"), Some(&"8".to_string()));
    assert_eq!(params.get("isPaid"), Some(&"true".to_string()));
}

#[tokio::test]
async fn invalid_drafts_are_refused_before_the_wire() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in_handler = Arc::clone(&hits);

    let app = Router::new().route(
        "/jobs",
        post(move || {
            let hits = Arc::clone(&hits_in_handler);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(job_json(1, 1, 1))
            }
        }),
    );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();

    let mut draft = valid_job_draft(1);
    draft.title = "  ".to_string();

    match client.create_job(&draft).await.unwrap_err() {
        ClientError::Domain(DomainError::Validation(msg)) if msg.contains("title") => {}
        other => panic!("Expected local validation error, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn illegal_status_moves_never_reach_the_wire() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in_handler = Arc::clone(&hits);

    let app = Router::new().route(
        "/jobs/7/status",
        patch(move || {
            let hits = Arc::clone(&hits_in_handler);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(job_json(7, 9, 7))
            }
        }),
    );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();

    // Completed is terminal; leaving it requires an explicit reopen.
    let request = StatusChangeRequest::to(JobStatus::InProgress, Utc::now());
    match client
        .change_job_status(JobId::new(7), JobStatus::Completed, &request)
        .await
        .unwrap_err()
    {
        ClientError::Domain(DomainError::InvalidTransition { from, to }) => {
            assert_eq!(from, "completed");
            assert_eq!(to, "in progress");
        }
        other => panic!("Expected InvalidTransition, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn status_changes_announce_the_views_to_refresh() {
    let app = Router::new().route(
        "/jobs/7/status",
        patch(move || async move { Json(job_json(7, 9, 7)) }),
    );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();
    let events = client.events();

    let request = StatusChangeRequest::to(JobStatus::InProgress, Utc::now());
    client
        .change_job_status(JobId::new(7), JobStatus::MaterialPreparing, &request)
        .await
        .unwrap();

    let event = events.try_recv().unwrap();
    match &event {
        DataEvent::JobStatusChanged {
            job_id,
            customer_id,
            ..
        } => {
            assert_eq!(*job_id, JobId::new(7));
            assert_eq!(*customer_id, CustomerId::new(9));
        }
        other => panic!("Expected JobStatusChanged, got {other:?}"),
    }

    let views = invalidated_views(&event);
    assert!(views.contains(&ViewKey::Job(JobId::new(7))));
    assert!(views.contains(&ViewKey::JobList));
    assert!(views.contains(&ViewKey::ReceivableSummary(CustomerId::new(9))));
}

#[tokio::test]
async fn payment_mutations_carry_the_owning_customer() {
    let app = Router::new().route(
        "/jobs/7/payments",
        post(move || async move { Json(payment_json(31, 7, 4000.0, false)) }),
    );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();
    let events = client.events();

    let draft = PaymentDraft::new(Money::from_major(4_000), PaymentType::Cash, Utc::now());
    let payment = client
        .add_job_payment(JobId::new(7), CustomerId::new(9), &draft)
        .await
        .unwrap();
    assert_eq!(payment.amount, Money::from_major(4_000));

    match events.try_recv().unwrap() {
        DataEvent::PaymentAdded { customer_id, .. } => {
            assert_eq!(customer_id, CustomerId::new(9));
        }
        other => panic!("Expected PaymentAdded, got {other:?}"),
    }
}

#[tokio::test]
async fn backend_statuses_map_to_typed_errors() {
    let app = Router::new()
        .route("/jobs/1", get(|| async { StatusCode::UNAUTHORIZED }))
        .route("/jobs/2", get(|| async { StatusCode::FORBIDDEN }))
        .route("/jobs/3", get(|| async { StatusCode::NOT_FOUND }))
        .route("/jobs/4", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/jobs",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "errors": { "title": ["already in use"] } })),
                )
            }),
        )
        .route(
            "/jobs/5",
            delete(|| async { (StatusCode::CONFLICT, "job has linked records") }),
        );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();

    assert!(matches!(
        client.job(JobId::new(1)).await.unwrap_err(),
        ClientError::SessionExpired
    ));
    assert!(matches!(
        client.job(JobId::new(2)).await.unwrap_err(),
        ClientError::Forbidden
    ));
    assert!(matches!(
        client.job(JobId::new(3)).await.unwrap_err(),
        ClientError::NotFound
    ));
    assert!(matches!(
        client.job(JobId::new(4)).await.unwrap_err(),
        ClientError::Server { status: 500 }
    ));

    match client.create_job(&valid_job_draft(1)).await.unwrap_err() {
        ClientError::Validation { errors } => {
            assert_eq!(errors["title"], vec!["already in use".to_string()]);
        }
        other => panic!("Expected Validation, got {other:?}"),
    }

    match client
        .delete_job(JobId::new(5), CustomerId::new(1))
        .await
        .unwrap_err()
    {
        ClientError::Request { status: 409, message } => {
            assert!(message.contains("linked records"));
        }
        other => panic!("Expected Request(409), got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_submissions_lose_the_gate() {
    let release = Arc::new(tokio::sync::Semaphore::new(0));
    let release_in_handler = Arc::clone(&release);

    let app = Router::new().route(
        "/jobs",
        post(move || {
            let release = Arc::clone(&release_in_handler);
            async move {
                // Hold the first submission open until the test releases it.
                let _permit = release.acquire().await.unwrap();
                Json(job_json(1, 1, 1))
            }
        }),
    );
    let srv = TestServer::spawn(app).await;
    let client = Arc::new(srv.client());

    let draft = valid_job_draft(1);
    let first = tokio::spawn({
        let client = Arc::clone(&client);
        let draft = draft.clone();
        async move { client.create_job(&draft).await }
    });
    let second = tokio::spawn({
        let client = Arc::clone(&client);
        let draft = draft.clone();
        async move { client.create_job(&draft).await }
    });

    // Let both submissions race the gate, then let the winner finish.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    release.add_permits(2);

    let outcomes = [first.await.unwrap(), second.await.unwrap()];
    let accepted = outcomes.iter().filter(|r| r.is_ok()).count();
    let refused = outcomes
        .iter()
        .filter(|r| matches!(r, Err(ClientError::DuplicateSubmission(_))))
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(refused, 1);
}

#[tokio::test]
async fn stale_responses_are_discarded_not_applied() {
    let app = Router::new().route("/jobs", get(|| async { Json(json!([])) }));
    let srv = TestServer::spawn(app).await;
    let client = srv.client();
    let filter = JobFilter::default();

    let fresh = client
        .fetch_view(ViewKey::JobList, || client.jobs(&filter))
        .await
        .unwrap();
    assert!(fresh.is_some());

    let stale = client
        .fetch_view(ViewKey::JobList, || async {
            // A newer refresh starts while this fetch is in flight.
            client.tracker().begin(ViewKey::JobList);
            client.jobs(&filter).await
        })
        .await
        .unwrap();
    assert!(stale.is_none());
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Bind a port and immediately free it again so nothing listens there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(ClientConfig::new(format!("http://{addr}"))).unwrap();
    match client.jobs(&JobFilter::default()).await.unwrap_err() {
        ClientError::Network(_) => {}
        other => panic!("Expected Network, got {other:?}"),
    }
}

#[tokio::test]
async fn stock_overdraw_is_refused_locally() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in_handler = Arc::clone(&hits);

    let app = Router::new().route(
        "/stockmovement",
        post(move || {
            let hits = Arc::clone(&hits_in_handler);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({}))
            }
        }),
    );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();

    let draft = StockMovementDraft::new(
        ProductId::new(11),
        StockMovementType::StockOut,
        Quantity::new(50),
    );
    match client
        .record_stock_movement(&draft, Quantity::new(10))
        .await
        .unwrap_err()
    {
        ClientError::Domain(DomainError::InvariantViolation(msg)) => {
            assert!(msg.contains("stock cannot go negative"));
        }
        other => panic!("Expected InvariantViolation, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn material_deduction_posts_a_job_linked_stock_out() {
    let captured: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let captured_in_handler = Arc::clone(&captured);

    let app = Router::new().route(
        "/stockmovement",
        post(move |Json(body): Json<Value>| {
            let captured = Arc::clone(&captured_in_handler);
            async move {
                *captured.lock().unwrap() = Some(body);
                Json(json!({
                    "id": 91,
                    "productId": 11,
                    "movementType": 2,
                    "quantity": 7,
                    "previousStock": 20,
                    "newStock": 13,
                    "jobId": 5,
                    "createdAt": "2026-02-10T09:00:00Z"
                }))
            }
        }),
    );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();
    let events = client.events();

    let material = JobMaterial {
        id: fieldserve_core::JobMaterialId::new(3),
        job_id: JobId::new(5),
        product_id: ProductId::new(11),
        product: None,
        planned_quantity: Quantity::new(5),
        used_quantity: Quantity::new(7),
        unit_price: Money::from_major(100),
        total_price: Money::from_major(700),
        is_extra: false,
        notes: None,
        created_at: Utc::now(),
    };

    let movement = client
        .record_material_deduction(
            JobStatus::InstallationCompleted,
            &material,
            Quantity::new(20),
        )
        .await
        .unwrap();
    assert_eq!(movement.delta(), -7);

    let body = captured.lock().unwrap().clone().unwrap();
    assert_eq!(body["movementType"], 2);
    assert_eq!(body["quantity"], 7);
    assert_eq!(body["productId"], 11);
    assert_eq!(body["jobId"], 5);

    assert!(matches!(
        events.try_recv().unwrap(),
        DataEvent::StockMovementRecorded { product_id, .. } if product_id == ProductId::new(11)
    ));
}

#[tokio::test]
async fn receivable_summaries_ride_the_active_only_flag() {
    let captured: Arc<Mutex<HashMap<String, String>>> = Arc::new(Mutex::new(HashMap::new()));
    let captured_in_handler = Arc::clone(&captured);

    let app = Router::new().route(
        "/customer/receivable-summaries",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let captured = Arc::clone(&captured_in_handler);
            async move {
                *captured.lock().unwrap() = params;
                Json(json!([{
                    "customerId": 9,
                    "customerName": "Deniz Aydin",
                    "companyName": "Acme Depo A.S.",
                    "totalJobs": 3,
                    "activeJobs": 1,
                    "totalBilled": 25000,
                    "totalPaid": 19000,
                    "outstandingBalance": 6000,
                    "aging": {
                        "current": 6000,
                        "days30To60": 0,
                        "days60To90": 0,
                        "over90Days": 0
                    }
                }]))
            }
        }),
    );
    let srv = TestServer::spawn(app).await;
    let client = srv.client();

    let summaries = client.receivable_summaries(true).await.unwrap();

    assert_eq!(
        captured.lock().unwrap().get("activeOnly"),
        Some(&"true".to_string())
    );
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.customer_id, CustomerId::new(9));
    assert_eq!(summary.outstanding_balance, Money::from_major(6_000));
    assert_eq!(summary.aging.current, Money::from_major(6_000));
    assert_eq!(summary.aging.total(), summary.outstanding_balance);
}
