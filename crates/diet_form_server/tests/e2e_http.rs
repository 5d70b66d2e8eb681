use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use diet_form_server::{AppState, SUBMISSION_ID_HEADER, router};
use diet_plan_client::{DietError, DietInput, DietPlan, DietPlanClient, Goal, Sex};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

#[derive(Default)]
struct LocalMockClient {
    received: Mutex<Vec<DietInput>>,
    fail_with: Option<u16>,
}

#[async_trait::async_trait]
impl DietPlanClient for LocalMockClient {
    async fn submit_diet(&self, input: &DietInput) -> Result<DietPlan, DietError> {
        self.received.lock().unwrap().push(input.clone());
        match self.fail_with {
            Some(status) => Err(DietError::Api {
                status,
                body: "backend down".into(),
            }),
            None => Ok(json!({ "nome": input.name, "refeicoes": [] })),
        }
    }
}

async fn spawn_app(client: Arc<LocalMockClient>) -> SocketAddr {
    let state = Arc::new(AppState::new(client, None));
    let app = router(state, Duration::from_secs(5));

    // bind to ephemeral port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.ok();
    });
    addr
}

fn ana() -> Value {
    json!({
        "nome": "Ana",
        "idade": 27,
        "altura_cm": 165,
        "peso_kg": 60,
        "sexo": "feminino",
        "nivel_atividade": "sedentario",
        "objetivo": "perda_de_peso"
    })
}

#[tokio::test]
async fn e2e_form_page_and_health() {
    let addr = spawn_app(Arc::new(LocalMockClient::default())).await;
    let http = Client::new();

    let res = http.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ok");

    let res = http.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let body = res.text().await.unwrap();
    assert!(body.contains("Calcule sua Dieta"));
    assert!(body.contains(r#"name="nivel_atividade""#));
}

#[tokio::test]
async fn e2e_metrics_absent_without_recorder() {
    let addr = spawn_app(Arc::new(LocalMockClient::default())).await;
    let res = Client::new()
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn e2e_valid_json_submission_reaches_backend() {
    let client = Arc::new(LocalMockClient::default());
    let addr = spawn_app(client.clone()).await;

    let res = Client::new()
        .post(format!("http://{addr}/api/diet"))
        .json(&ana())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(SUBMISSION_ID_HEADER));
    let plan: Value = res.json().await.unwrap();
    assert_eq!(plan["nome"], "Ana");

    let received = client.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].sex, Sex::Female);
    assert_eq!(received[0].goal, Goal::WeightLoss);
}

#[tokio::test]
async fn e2e_invalid_submission_returns_field_errors() {
    let client = Arc::new(LocalMockClient::default());
    let addr = spawn_app(client.clone()).await;

    let mut body = ana();
    body["nome"] = json!("A");
    body["idade"] = json!(-5);
    let res = Client::new()
        .post(format!("http://{addr}/api/diet"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload: Value = res.json().await.unwrap();
    let errors = payload["errors"].as_object().expect("errors object");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors["nome"]["kind"], "invalid");
    assert_eq!(errors["idade"]["kind"], "invalid");
    assert!(client.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn e2e_urlencoded_form_is_coerced() {
    let client = Arc::new(LocalMockClient::default());
    let addr = spawn_app(client.clone()).await;

    let res = Client::new()
        .post(format!("http://{addr}/diet"))
        .form(&[
            ("nome", "Bruno"),
            ("idade", "31"),
            ("altura_cm", "178.5"),
            ("peso_kg", "80"),
            ("sexo", "masculino"),
            ("nivel_atividade", "4X_semana"),
            ("objetivo", "hipertrofia"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let received = client.received.lock().unwrap();
    assert_eq!(received[0].age, 31);
    assert_eq!(received[0].height_cm, 178.5);
}

#[tokio::test]
async fn e2e_empty_form_fields_are_required() {
    let addr = spawn_app(Arc::new(LocalMockClient::default())).await;

    let res = Client::new()
        .post(format!("http://{addr}/diet"))
        .form(&[("nome", ""), ("idade", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload: Value = res.json().await.unwrap();
    let errors = payload["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 7);
    assert_eq!(errors["idade"]["message"], "Preencha sua idade");
    assert!(errors.values().all(|e| e["kind"] == "required"));
}

#[tokio::test]
async fn e2e_backend_failure_is_bad_gateway() {
    let client = Arc::new(LocalMockClient {
        fail_with: Some(500),
        ..Default::default()
    });
    let addr = spawn_app(client).await;

    let res = Client::new()
        .post(format!("http://{addr}/api/diet"))
        .json(&ana())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let payload: Value = res.json().await.unwrap();
    assert!(payload["error"].as_str().unwrap().contains("backend down"));
}

#[tokio::test]
async fn e2e_validate_endpoint_never_submits() {
    let client = Arc::new(LocalMockClient::default());
    let addr = spawn_app(client.clone()).await;
    let http = Client::new();

    let res = http
        .post(format!("http://{addr}/validate"))
        .json(&ana())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let input: DietInput = res.json().await.unwrap();
    assert_eq!(input.age, 27);

    let mut body = ana();
    body["objetivo"] = json!("bulking");
    let res = http
        .post(format!("http://{addr}/validate"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(client.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn e2e_schema_lists_wire_fields() {
    let addr = spawn_app(Arc::new(LocalMockClient::default())).await;
    let schema: Value = Client::new()
        .get(format!("http://{addr}/schema"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(schema["properties"]["nivel_atividade"].is_object());
}
