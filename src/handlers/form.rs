//! Request bodies shared by the HTML and JSON handlers.

use std::fmt;

use axum::{
    extract::{FromRequest, Query, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{messages, ApiError, WebError};

/// Body accepted as either JSON or form-urlencoded, picked by `Content-Type`.
/// On `GET` the form variant reads the query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Input<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Input<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
                tracing::debug!("Rejected JSON body: {}", e);
                ApiError::bad_request(messages::INVALID_FORM)
            })?;
            Ok(Input(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state).await.map_err(|e| {
                tracing::debug!("Rejected form body: {}", e);
                ApiError::bad_request(messages::INVALID_FORM)
            })?;
            Ok(Input(value))
        }
    }
}

/// HTML form fields read from both the query string and a urlencoded body.
/// A key present in the body wins over the same key in the query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormValues<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for FormValues<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(req.uri()).map_err(|e| {
            tracing::debug!("Rejected query string: {}", e);
            invalid_form()
        })?;

        let body = if has_content_type(&req, "application/x-www-form-urlencoded") {
            let Form(body) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| {
                    tracing::debug!("Rejected form body: {}", e);
                    invalid_form()
                })?;
            body
        } else {
            Vec::new()
        };

        let mut fields = Map::new();
        for (key, value) in body.into_iter().chain(query) {
            fields.entry(key).or_insert(Value::String(value));
        }

        serde_json::from_value(Value::Object(fields))
            .map(FormValues)
            .map_err(|e| {
                tracing::debug!("Rejected form fields: {}", e);
                invalid_form()
            })
    }
}

fn invalid_form() -> WebError {
    WebError::status(StatusCode::BAD_REQUEST, messages::INVALID_FORM)
}

fn is_json(req: &Request) -> bool {
    has_content_type(req, "application/json")
}

fn has_content_type(req: &Request, expected: &str) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().starts_with(expected))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "done_flag")]
    pub done: bool,
}

/// Id as typed by the client; parsed by `auth::parse_task_id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskIdForm {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "done_flag")]
    pub done: bool,
}

/// Checkbox semantics for the `done` field.
pub fn is_truthy(value: &str) -> bool {
    matches!(value, "on" | "true")
}

/// `true` for the strings `"on"`/`"true"` and JSON `true`. Anything else,
/// including other types, is `false` rather than an error.
fn done_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct DoneFlag;

    impl<'de> Visitor<'de> for DoneFlag {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a checkbox value")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            Ok(is_truthy(v))
        }

        fn visit_i64<E: de::Error>(self, _: i64) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_u64<E: de::Error>(self, _: u64) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_f64<E: de::Error>(self, _: f64) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<bool, D2::Error> {
            d.deserialize_any(DoneFlag)
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<bool, A::Error> {
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            Ok(false)
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<bool, A::Error> {
            while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
            Ok(false)
        }
    }

    deserializer.deserialize_any(DoneFlag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http};

    fn json_task(body: &str) -> TaskForm {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn done_accepts_checkbox_strings() {
        assert!(json_task(r#"{"title":"a","done":"on"}"#).done);
        assert!(json_task(r#"{"title":"a","done":"true"}"#).done);
        assert!(json_task(r#"{"title":"a","done":true}"#).done);
    }

    #[test]
    fn done_is_false_for_everything_else() {
        for body in [
            r#"{"title":"a"}"#,
            r#"{"title":"a","done":"false"}"#,
            r#"{"title":"a","done":"TRUE"}"#,
            r#"{"title":"a","done":""}"#,
            r#"{"title":"a","done":false}"#,
            r#"{"title":"a","done":1}"#,
            r#"{"title":"a","done":null}"#,
            r#"{"title":"a","done":[true]}"#,
        ] {
            assert!(!json_task(body).done, "{} should not be done", body);
        }
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let task = json_task("{}");
        assert_eq!(task.title, "");
        assert!(!task.done);
    }

    async fn extract<T: DeserializeOwned>(req: http::Request<Body>) -> Result<T, ApiError> {
        Input::<T>::from_request(req, &()).await.map(|Input(value)| value)
    }

    #[tokio::test]
    async fn input_reads_form_bodies() {
        let req = http::Request::post("/api/tasks")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=Buy+milk&done=on"))
            .unwrap();

        let form: TaskForm = extract(req).await.unwrap();
        assert_eq!(form.title, "Buy milk");
        assert!(form.done);
    }

    #[tokio::test]
    async fn input_reads_json_bodies() {
        let req = http::Request::post("/api/tasks")
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::from(r#"{"title":"Buy milk","done":"false"}"#))
            .unwrap();

        let form: TaskForm = extract(req).await.unwrap();
        assert_eq!(form.title, "Buy milk");
        assert!(!form.done);
    }

    #[tokio::test]
    async fn input_rejects_broken_json() {
        let req = http::Request::post("/api/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let err = extract::<CredentialsForm>(req).await.unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Formulario inválido");
    }

    #[tokio::test]
    async fn input_reads_the_query_string_on_get() {
        let req = http::Request::get("/delete?id=12")
            .body(Body::empty())
            .unwrap();

        let form: TaskIdForm = extract(req).await.unwrap();
        assert_eq!(form.id, "12");
    }

    async fn form_values<T: DeserializeOwned>(req: http::Request<Body>) -> T {
        let FormValues(value) = FormValues::<T>::from_request(req, &()).await.unwrap();
        value
    }

    #[tokio::test]
    async fn form_values_read_the_query_without_a_body() {
        let req = http::Request::post("/delete?id=7").body(Body::empty()).unwrap();

        let form: TaskIdForm = form_values(req).await;
        assert_eq!(form.id, "7");
    }

    #[tokio::test]
    async fn form_values_prefer_the_body() {
        let req = http::Request::post("/update?id=1&title=old")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("id=2&done=on"))
            .unwrap();

        let form: UpdateTaskForm = form_values(req).await;
        assert_eq!(form.id, "2");
        assert_eq!(form.title, "old");
        assert!(form.done);
    }

    #[tokio::test]
    async fn form_values_ignore_other_body_types() {
        let req = http::Request::post("/delete?id=3")
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from("id=4"))
            .unwrap();

        let form: TaskIdForm = form_values(req).await;
        assert_eq!(form.id, "3");
    }
}
