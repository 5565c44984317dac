use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, RPC_PATH};
use serde_json::{json, Value};
use tower::ServiceExt;

const MACURL: &str = "http://localhost:8000/rpc";

fn common_flags() -> Value {
    json!({
        "clean": false,
        "calfocus": false,
        "impersonate": false,
        "maccharset": "UTF-8",
        "lang": "en_US",
        "locale": "en_US"
    })
}

/// Build the form POST the real client sends.
fn rpc_request(mut inp: Value, session: &str) -> Request<String> {
    let flags = common_flags();
    if let (Some(obj), Some(flags)) = (inp.as_object_mut(), flags.as_object()) {
        for (k, v) in flags {
            obj.entry(k.clone()).or_insert_with(|| v.clone());
        }
        if !session.is_empty() {
            obj.insert("sessionid".to_string(), json!(session));
        }
    }
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("requestobj", &json!({ "inpObj": inp }).to_string())
        .append_pair("functionname", "executerequest")
        .append_pair("macurl", MACURL)
        .append_pair("sessionid", session)
        .finish();
    Request::builder()
        .method("POST")
        .uri(RPC_PATH)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body)
        .unwrap()
}

async fn call(app: &Router, inp: Value, session: &str) -> Value {
    let resp = app.clone().oneshot(rpc_request(inp, session)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router) -> String {
    let body = call(
        app,
        json!({"operation": "login", "username": "demo", "password": "demo", "includeScreenLayouts": false}),
        "",
    )
    .await;
    assert_eq!(body["ok"], true);
    body["sessionid"].as_str().unwrap().to_string()
}

fn save(day: &str, hours: &str, key: &str) -> Value {
    json!({
        "operation": "savetimesheetentry",
        "theDate": day,
        "InstanceKey": key,
        "Fields": {
            "JobNumber": "1095123",
            "TaskName": "9202",
            "DailyDescription": "",
            "NumberOf": hours,
            "EntryText": "CS-1",
            "EntryDate": day
        },
        "reopenIfSubmitted": false
    })
}

// --- login ---

#[tokio::test]
async fn login_returns_employee_details() {
    let app = app();
    let body = call(
        &app,
        json!({"operation": "login", "username": "demo", "password": "demo"}),
        "",
    )
    .await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["EmployeeName"], "Demo User");
    assert_eq!(body["EmployeeNumber"], "1001");
    assert!(body["sessionid"].as_str().unwrap().starts_with("session-"));
}

#[tokio::test]
async fn login_with_bad_password_fails() {
    let app = app();
    let body = call(
        &app,
        json!({"operation": "login", "username": "demo", "password": "nope"}),
        "",
    )
    .await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["Message"], "Invalid username or password");
}

// --- envelope checks ---

#[tokio::test]
async fn missing_common_flag_is_rejected() {
    let app = app();
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("requestobj", r#"{"inpObj":{"operation":"login"}}"#)
        .append_pair("functionname", "executerequest")
        .append_pair("macurl", MACURL)
        .append_pair("sessionid", "")
        .finish();
    let req = Request::builder()
        .method("POST")
        .uri(RPC_PATH)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body)
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["Message"], "Missing clean");
}

#[tokio::test]
async fn unknown_session_is_expired_with_lowercase_message() {
    let app = app();
    let body = call(&app, json!({"operation": "gettimesheetperiods"}), "bogus").await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Session expired");
    assert!(body.get("Message").is_none());
}

// --- save / period / delete ---

#[tokio::test]
async fn save_requires_quoted_hours() {
    let app = app();
    let session = login(&app).await;
    let body = call(&app, save("2018.02.05", "5.5", ""), &session).await;
    assert_eq!(body["ok"], false);
    assert!(body["Message"].as_str().unwrap().contains("quoted"));
}

#[tokio::test]
async fn saved_line_shows_up_in_period() {
    let app = app();
    let session = login(&app).await;
    let saved = call(&app, save("2018.02.06", "'5.5'", ""), &session).await;
    assert_eq!(saved["ok"], true);
    let key = saved["InstanceKey"].as_str().unwrap().to_string();

    let updated = call(&app, save("2018.02.07", "'2'", &key), &session).await;
    assert_eq!(updated["InstanceKey"], key);

    let period = call(
        &app,
        json!({"operation": "getperiod", "startDate": "2018.02.05", "endDate": "2018.02.11"}),
        &session,
    )
    .await;
    assert_eq!(period["ok"], true);
    let lines = period["Lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    let daily = lines[0]["Fields"]["dailyFields"].as_array().unwrap();
    assert_eq!(daily.len(), 7);
    assert_eq!(daily[0]["NumberOf"], "0.00");
    assert_eq!(daily[1]["NumberOf"], "5.50");
    assert_eq!(daily[2]["NumberOf"], "2.00");
    assert_eq!(lines[0]["Fields"]["CustomerNameVar"], "Acme");
    assert_eq!(period["DailyTotals"][1]["NumberOf"], "5.50");
}

#[tokio::test]
async fn delete_twice_fails_the_second_time() {
    let app = app();
    let session = login(&app).await;
    let saved = call(&app, save("2018.02.05", "'1'", ""), &session).await;
    let key = saved["InstanceKey"].as_str().unwrap().to_string();
    let delete = json!({
        "operation": "deletetimesheetentry",
        "InstanceKey": key,
        "theDate": "2018.02.09",
        "reopenIfSubmitted": false
    });

    let first = call(&app, delete.clone(), &session).await;
    assert_eq!(first["ok"], true);

    let second = call(&app, delete, &session).await;
    assert_eq!(second["ok"], false);
    assert_eq!(second["Message"], format!("Line {key} does not exist"));
}

#[tokio::test]
async fn delete_outside_line_week_fails() {
    let app = app();
    let session = login(&app).await;
    let saved = call(&app, save("2018.02.05", "'1'", ""), &session).await;
    let body = call(
        &app,
        json!({
            "operation": "deletetimesheetentry",
            "InstanceKey": saved["InstanceKey"],
            "theDate": "2018.02.12"
        }),
        &session,
    )
    .await;
    assert_eq!(body["ok"], false);
}

// --- search / periods / totals ---

#[tokio::test]
async fn task_search_lists_project_tasks() {
    let app = app();
    let session = login(&app).await;
    let body = call(
        &app,
        json!({
            "operation": "search",
            "SearchName": "TaskSearch",
            "Fields": [
                {"Name": "SearchText", "Value": ""},
                {"Name": "JobNumber", "Value": "1095123"}
            ]
        }),
        &session,
    )
    .await;
    let records = body["Records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["InstanceKey"], "9202");
}

#[tokio::test]
async fn periods_and_totals_follow_saved_lines() {
    let app = app();
    let session = login(&app).await;
    call(&app, save("2018.02.08", "'7.5'", ""), &session).await;

    let periods = call(&app, json!({"operation": "gettimesheetperiods"}), &session).await;
    assert_eq!(
        periods["Periods"],
        json!([{"StartDate": "2018.02.05", "EndDate": "2018.02.11", "Submitted": false}])
    );

    let totals = call(
        &app,
        json!({"operation": "gettimesheettotals", "fromDate": "2018.02.08", "toDate": "2018.02.09"}),
        &session,
    )
    .await;
    assert_eq!(
        totals["Totals"],
        json!([
            {"TheDate": "2018.02.08", "NumberOf": "7.50"},
            {"TheDate": "2018.02.09", "NumberOf": "0.00"}
        ])
    );
}
