//! Request body builders for the API tests.

use serde_json::{json, Value};

pub fn login_body(code: &str, password: &str) -> Value {
    json!({ "code": code, "password": password })
}

pub fn habit_body(name: &str) -> Value {
    json!({ "name": name })
}

pub fn habit_body_full(name: &str, emoji: &str, color: &str) -> Value {
    json!({ "name": name, "emoji": emoji, "color": color })
}

pub fn toggle_body(habit_id: i64, day: u32, month: u32, year: i32) -> Value {
    json!({ "habitId": habit_id, "day": day, "month": month, "year": year })
}

pub fn create_user_body(code: &str, username: &str, password: &str) -> Value {
    json!({ "code": code, "username": username, "password": password })
}
