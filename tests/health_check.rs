use actix_web::{test, web, App};
use checkin_server::{api, AppState, Settings};
use chrono::DateTime;

#[actix_web::test]
async fn test_health_check() {
    let config = Settings::new_for_test(Default::default()).expect("Failed to load test config");
    let state = AppState::new(config).await.expect("Failed to build state");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "healthy");
    assert!(DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
}
