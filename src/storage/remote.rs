use std::rc::Rc;

use super::{
    AppError, AuthApi, Contact, ContactApi, Credentials, NewContact, Registration, TokenProvider,
};
use log::debug;
use reqwest::blocking::{self, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://agenda-api.somee.com/api";

/// HTTP client for the agenda API. Every request carries the session's
/// bearer token when one is available.
pub struct RemoteApi {
    base_url: Url,
    client: blocking::Client,
    tokens: Rc<dyn TokenProvider>,
}

impl RemoteApi {
    pub fn new(base_url: &str, tokens: Rc<dyn TokenProvider>) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url)?;

        // `Url::join` drops the last path segment unless it ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = blocking::Client::builder()
            .user_agent(concat!("rusty-agenda/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            client,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let response = self.authorize(request).send()?;
        debug!("{} {}", response.status(), response.url());

        // Convert non-success status into a `reqwest::Error` which maps to `AppError::Api`
        Ok(response.error_for_status()?)
    }
}

impl ContactApi for RemoteApi {
    fn fetch_all(&self) -> Result<Vec<Contact>, AppError> {
        let url = self.endpoint("contacts")?;
        let response = self.send(self.client.get(url))?;

        Ok(serde_json::from_str(&response.text()?)?)
    }

    fn fetch_one(&self, id: &str) -> Result<Contact, AppError> {
        let url = self.endpoint(&format!("contacts/{}", id))?;
        let response = self.send(self.client.get(url))?;

        Ok(serde_json::from_str(&response.text()?)?)
    }

    fn create(&self, contact: &NewContact) -> Result<Contact, AppError> {
        let url = self.endpoint("contacts")?;
        let response = self.send(self.client.post(url).json(contact))?;

        Ok(serde_json::from_str(&response.text()?)?)
    }

    fn update(&self, contact: &Contact) -> Result<Option<Contact>, AppError> {
        let url = self.endpoint(&format!("contacts/{}", contact.id))?;
        let response = self.send(self.client.put(url).json(contact))?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        if response.content_length() == Some(0) || !is_json {
            debug!("update of contact {} returned no JSON body", contact.id);
            return Ok(None);
        }

        let body = response.text()?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    fn toggle_favorite(&self, id: &str) -> Result<(), AppError> {
        let url = self.endpoint(&format!("contacts/{}/favorite", id))?;
        self.send(self.client.post(url))?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), AppError> {
        let url = self.endpoint(&format!("contacts/{}", id))?;
        self.send(self.client.delete(url))?;
        Ok(())
    }
}

impl AuthApi for RemoteApi {
    fn authenticate(&self, credentials: &Credentials) -> Result<String, AppError> {
        let url = self.endpoint("authentication/authenticate")?;
        let response = self
            .client
            .post(url)
            .json(credentials)
            .send()?
            .error_for_status()?;

        let token = response.text()?.trim().trim_matches('"').to_string();
        if token.is_empty() {
            return Err(AppError::InvalidToken("empty token in response".to_string()));
        }
        Ok(token)
    }

    fn register(&self, registration: &Registration) -> Result<(), AppError> {
        let url = self.endpoint("Users")?;
        let response = self.client.post(url).json(registration).send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(AppError::api(
            status.as_u16(),
            registration_error_message(status.as_u16(), &body),
        ))
    }
}

/// Prefers the server's own `message`, then its raw text, then a message
/// chosen by status code when the body is not JSON.
pub fn registration_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => match status {
            409 => "This email is already registered".to_string(),
            400 => "Invalid data, please check the information".to_string(),
            500 => "Server error, try again later".to_string(),
            _ => format!("Registration failed ({})", status),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, mock, server_url};

    fn api_with_token(token: Option<&str>) -> RemoteApi {
        let tokens: Rc<dyn TokenProvider> = Rc::new(token.map(str::to_string));
        RemoteApi::new(&server_url(), tokens).unwrap()
    }

    #[test]
    fn base_url_keeps_its_path() -> Result<(), AppError> {
        let api = RemoteApi::new("https://agenda.example/api", Rc::new(None::<String>))?;

        assert_eq!(
            api.endpoint("contacts/3")?.as_str(),
            "https://agenda.example/api/contacts/3"
        );
        Ok(())
    }

    #[test]
    fn fetch_all_sends_bearer_token() {
        let m = mock("GET", "/contacts")
            .match_header("authorization", "Bearer abc.def.ghi")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"firstName":"Ana"},{"id":2,"firstName":"Bob","isFavorite":true}]"#)
            .create();

        let contacts = api_with_token(Some("abc.def.ghi")).fetch_all().unwrap();

        m.assert();
        assert_eq!(contacts.len(), 2);
        assert!(contacts[1].is_favorite);
    }

    #[test]
    fn no_token_sends_no_authorization_header() {
        let m = mock("GET", "/contacts/41")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"id":41,"firstName":"Eve"}"#)
            .create();

        let contact = api_with_token(None).fetch_one("41").unwrap();

        m.assert();
        assert_eq!(contact.first_name, "Eve");
    }

    #[test]
    fn non_success_status_is_api_error() {
        let _m = mock("GET", "/contacts/404").with_status(404).create();

        let err = api_with_token(Some("t")).fetch_one("404").unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn update_without_json_body_is_none() {
        let _m = mock("PUT", "/contacts/12")
            .with_status(204)
            .create();

        let contact = NewContact::new("Bob2", "5550000").with_id(12);
        assert_eq!(api_with_token(Some("t")).update(&contact).unwrap(), None);
    }

    #[test]
    fn update_with_json_body_returns_server_copy() {
        let _m = mock("PUT", "/contacts/13")
            .match_body(Matcher::PartialJsonString(r#"{"id":13,"firstName":"Bob2"}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body(r#"{"id":13,"firstName":"Bob2","company":"ACME"}"#)
            .create();

        let contact = NewContact::new("Bob2", "5550000").with_id(13);
        let updated = api_with_token(Some("t")).update(&contact).unwrap().unwrap();

        assert_eq!(updated.company, "ACME");
    }

    #[test]
    fn authenticate_returns_body_as_token() {
        let _m = mock("POST", "/authentication/authenticate")
            .match_body(Matcher::Json(serde_json::json!({
                "email": "ana@example.com",
                "password": "secret"
            })))
            .with_status(200)
            .with_body("header.payload.signature")
            .create();

        let token = api_with_token(None)
            .authenticate(&Credentials {
                email: "ana@example.com".to_string(),
                password: "secret".to_string(),
            })
            .unwrap();

        assert_eq!(token, "header.payload.signature");
    }

    #[test]
    fn registration_messages() {
        assert_eq!(
            registration_error_message(400, r#"{"message":"Password too short"}"#),
            "Password too short"
        );
        assert_eq!(
            registration_error_message(400, r#"{"errors":[]}"#),
            r#"{"errors":[]}"#
        );
        assert_eq!(
            registration_error_message(409, "Conflict"),
            "This email is already registered"
        );
        assert_eq!(
            registration_error_message(418, "teapot"),
            "Registration failed (418)"
        );
    }
}
