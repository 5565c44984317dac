//! In-memory stand-in for the Maconomy RPC endpoint.
//!
//! Speaks the same wire format as the vendor: a form-encoded POST whose
//! `requestobj` field is `{"inpObj": {...}}`, answered with `{"ok": ...}`.
//! Failures come back with HTTP 200 and `ok: false`, like the real thing.
//! Session expiry is reported with a lower-case `message` key and every other
//! failure with `Message`, so clients have to handle both.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    sync::Arc,
};

use axum::{extract::State, routing::post, Form, Json, Router};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const RPC_PATH: &str = "/rpc";
pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo";

const DATE_FORMAT: &str = "%Y.%m.%d";
const COMMON_FLAGS: [&str; 6] = ["clean", "calfocus", "impersonate", "maccharset", "lang", "locale"];

/// (project number, name, customer)
const PROJECTS: &[(&str, &str, &str)] = &[
    ("1095123", "Internal tooling", "Acme"),
    ("2001001", "Customer portal", "Globex"),
];

/// (project number, task, description)
const TASKS: &[(&str, &str, &str)] = &[
    ("1095123", "9202", "Development"),
    ("1095123", "9203", "Meetings"),
    ("2001001", "100", "Support"),
];

#[derive(Debug, Deserialize)]
pub struct RpcForm {
    pub requestobj: String,
    pub functionname: String,
    pub macurl: String,
    #[serde(default)]
    pub sessionid: String,
}

#[derive(Clone, Debug)]
pub struct Line {
    pub key: String,
    pub week_start: NaiveDate,
    pub project_id: String,
    pub task: String,
    pub entry_text: String,
    pub days: BTreeMap<NaiveDate, Day>,
}

#[derive(Clone, Debug, Default)]
pub struct Day {
    pub hours: String,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct Store {
    sessions: HashSet<String>,
    lines: BTreeMap<String, Line>,
    next_id: u64,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new().route(RPC_PATH, post(execute)).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn execute(State(db): State<Db>, Form(form): Form<RpcForm>) -> Json<Value> {
    let mut store = db.write().await;
    Json(store.dispatch(&form).unwrap_or_else(|error| error))
}

impl Store {
    fn dispatch(&mut self, form: &RpcForm) -> Result<Value, Value> {
        if form.functionname != "executerequest" {
            return Err(fail(format!("Unknown function {}", form.functionname)));
        }
        if form.macurl.is_empty() {
            return Err(fail("macurl is required"));
        }
        let request: Value = serde_json::from_str(&form.requestobj)
            .map_err(|e| fail(format!("Malformed requestobj: {e}")))?;
        let inp = &request["inpObj"];
        if let Some(flag) = COMMON_FLAGS.iter().find(|flag| inp.get(**flag).is_none()) {
            return Err(fail(format!("Missing {flag}")));
        }

        let operation = text(inp, "operation");
        if operation == "login" {
            return self.login(inp);
        }

        let session = text(inp, "sessionid");
        if session != form.sessionid || !self.sessions.contains(&session) {
            return Err(json!({"ok": false, "message": "Session expired"}));
        }

        match operation.as_str() {
            "getperiod" => self.period(inp),
            "savetimesheetentry" => self.save(inp),
            "deletetimesheetentry" => self.delete(inp),
            "search" => search(inp),
            "gettimesheetperiods" => Ok(self.periods()),
            "gettimesheettotals" => self.totals(inp),
            other => Err(fail(format!("Unknown operation {other}"))),
        }
    }

    fn login(&mut self, inp: &Value) -> Result<Value, Value> {
        if text(inp, "username") != DEMO_USERNAME || text(inp, "password") != DEMO_PASSWORD {
            return Err(fail("Invalid username or password"));
        }
        self.next_id += 1;
        let session = format!("session-{}", self.next_id);
        self.sessions.insert(session.clone());
        Ok(json!({
            "ok": true,
            "sessionid": session,
            "EmployeeName": "Demo User",
            "EmployeeNumber": "1001",
            "Company": "Demo Company"
        }))
    }

    fn save(&mut self, inp: &Value) -> Result<Value, Value> {
        let date = wire_date(inp, "theDate")?;
        let fields = &inp["Fields"];
        if wire_date(fields, "EntryDate")? != date {
            return Err(fail("EntryDate does not match theDate"));
        }
        let hours = unquote_hours(&text(fields, "NumberOf"))?;

        let mut key = text(inp, "InstanceKey");
        if key.is_empty() {
            self.next_id += 1;
            key = format!("line-{}", self.next_id);
            self.lines.insert(
                key.clone(),
                Line {
                    key: key.clone(),
                    week_start: week_start(date),
                    project_id: text(fields, "JobNumber"),
                    task: text(fields, "TaskName"),
                    entry_text: text(fields, "EntryText"),
                    days: BTreeMap::new(),
                },
            );
        }

        let line = self
            .lines
            .get_mut(&key)
            .ok_or_else(|| fail(format!("Line {key} does not exist")))?;
        if line.week_start != week_start(date) {
            return Err(fail("Date is outside the line's week"));
        }
        line.days.insert(
            date,
            Day {
                hours,
                description: text(fields, "DailyDescription"),
            },
        );
        Ok(json!({"ok": true, "InstanceKey": key}))
    }

    fn delete(&mut self, inp: &Value) -> Result<Value, Value> {
        let key = text(inp, "InstanceKey");
        let date = wire_date(inp, "theDate")?;
        match self.lines.get(&key) {
            Some(line) if line.week_start == week_start(date) => {
                self.lines.remove(&key);
                Ok(json!({"ok": true}))
            }
            Some(_) => Err(fail("Date is outside the line's week")),
            None => Err(fail(format!("Line {key} does not exist"))),
        }
    }

    fn period(&self, inp: &Value) -> Result<Value, Value> {
        let days = day_range(wire_date(inp, "startDate")?, wire_date(inp, "endDate")?)?;
        let weeks: BTreeSet<NaiveDate> = days.iter().map(|d| week_start(*d)).collect();

        let lines: Vec<Value> = self
            .lines
            .values()
            .filter(|line| weeks.contains(&line.week_start))
            .map(|line| {
                let daily: Vec<Value> = days
                    .iter()
                    .map(|d| {
                        let day = line.days.get(d).cloned().unwrap_or_default();
                        let hours = if day.hours.is_empty() { "0.00".to_string() } else { day.hours };
                        json!({
                            "TheDate": d.format(DATE_FORMAT).to_string(),
                            "DailyDescription": day.description,
                            "NumberOf": hours,
                        })
                    })
                    .collect();
                json!({
                    "InstanceKey": line.key,
                    "DisplayName": format!("{} / {}", line.project_id, line.task),
                    "Fields": {
                        "JobNumber": line.project_id,
                        "TaskName": line.task,
                        "TaskDescriptionVar": task_description(&line.project_id, &line.task),
                        "EntryText": line.entry_text,
                        "CustomerNameVar": customer(&line.project_id),
                        "dailyFields": daily,
                    }
                })
            })
            .collect();

        Ok(json!({
            "ok": true,
            "StartDate": days[0].format(DATE_FORMAT).to_string(),
            "EndDate": days[days.len() - 1].format(DATE_FORMAT).to_string(),
            "Submitted": false,
            "Lines": lines,
            "DailyTotals": self.daily_totals(&days),
        }))
    }

    fn periods(&self) -> Value {
        let weeks: BTreeSet<NaiveDate> = self.lines.values().map(|line| line.week_start).collect();
        let periods: Vec<Value> = weeks
            .into_iter()
            .map(|start| {
                json!({
                    "StartDate": start.format(DATE_FORMAT).to_string(),
                    "EndDate": (start + Duration::days(6)).format(DATE_FORMAT).to_string(),
                    "Submitted": false,
                })
            })
            .collect();
        json!({"ok": true, "Periods": periods})
    }

    fn totals(&self, inp: &Value) -> Result<Value, Value> {
        let days = day_range(wire_date(inp, "fromDate")?, wire_date(inp, "toDate")?)?;
        Ok(json!({"ok": true, "Totals": self.daily_totals(&days)}))
    }

    fn daily_totals(&self, days: &[NaiveDate]) -> Vec<Value> {
        days.iter()
            .map(|d| {
                let total: f64 = self
                    .lines
                    .values()
                    .filter_map(|line| line.days.get(d))
                    .filter_map(|day| day.hours.parse::<f64>().ok())
                    .sum();
                json!({
                    "TheDate": d.format(DATE_FORMAT).to_string(),
                    "NumberOf": format!("{total:.2}"),
                })
            })
            .collect()
    }
}

fn search(inp: &Value) -> Result<Value, Value> {
    let filters = inp["Fields"].as_array().cloned().unwrap_or_default();
    let filter = |name: &str| {
        filters
            .iter()
            .find(|f| f["Name"] == name)
            .map(|f| text(f, "Value"))
            .unwrap_or_default()
    };
    let needle = filter("SearchText").to_lowercase();
    let matches = |key: &str, name: &str| {
        needle.is_empty() || key.contains(&needle) || name.to_lowercase().contains(&needle)
    };

    let records: Vec<Value> = match text(inp, "SearchName").as_str() {
        "RecentlyUsedJobsSearch" => PROJECTS
            .iter()
            .filter(|(id, name, _)| matches(id, name))
            .map(|(id, name, _)| json!({"Key": id, "DisplayName": name}))
            .collect(),
        "TaskSearch" => {
            let project = filter("JobNumber");
            if project.is_empty() {
                return Err(fail("JobNumber is required"));
            }
            TASKS
                .iter()
                .filter(|(job, task, desc)| *job == project && matches(task, desc))
                .map(|(_, task, desc)| json!({"InstanceKey": task, "DisplayName": desc}))
                .collect()
        }
        other => return Err(fail(format!("Unknown search {other}"))),
    };
    Ok(json!({"ok": true, "Records": records}))
}

fn fail(message: impl Into<String>) -> Value {
    json!({"ok": false, "Message": message.into()})
}

fn text(bag: &Value, key: &str) -> String {
    bag[key].as_str().unwrap_or_default().to_string()
}

fn wire_date(bag: &Value, key: &str) -> Result<NaiveDate, Value> {
    let raw = text(bag, key);
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|_| fail(format!("Invalid {key}: '{raw}', expected YYYY.MM.DD")))
}

/// The vendor wants hours as a quoted literal such as `'5.5'`.
fn unquote_hours(raw: &str) -> Result<String, Value> {
    let inner = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or_else(|| fail(format!("NumberOf must be a quoted literal, got {raw}")))?;
    let hours: f64 = inner
        .parse()
        .map_err(|_| fail(format!("NumberOf is not a number: {inner}")))?;
    Ok(format!("{hours:.2}"))
}

fn day_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, Value> {
    if end < start {
        return Err(fail("End date is before start date"));
    }
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn customer(project_id: &str) -> &'static str {
    PROJECTS
        .iter()
        .find(|(id, _, _)| *id == project_id)
        .map(|(_, _, customer)| *customer)
        .unwrap_or_default()
}

fn task_description(project_id: &str, task: &str) -> &'static str {
    TASKS
        .iter()
        .find(|(job, t, _)| *job == project_id && *t == task)
        .map(|(_, _, desc)| *desc)
        .unwrap_or_default()
}
