use async_trait::async_trait;
use chrono::Utc;
use drowsy_dashboard_shared::{
    auth::Session,
    firestore::{document_url, Document, DocumentPath},
    identity::{
        parse_error_body, refresh_form, IdentityEndpoints, IdentityProvider, RefreshResponse,
        SignInRequest, SignInResponse,
    },
    status::StatusSnapshot,
    sync::{SettingsStore, StatusSource},
    DashboardError, Result,
};
use gloo::net::http::{Request, RequestBuilder, Response};
use url::Url;

fn network(error: gloo::net::Error) -> DashboardError {
    DashboardError::Network(error.to_string())
}

async fn body_of(response: Response) -> Result<String> {
    response.text().await.map_err(network)
}

#[derive(Debug, PartialEq)]
pub struct HttpStatusSource {
    status_url: Url,
}

impl HttpStatusSource {
    pub fn new(status_url: Url) -> Self {
        Self { status_url }
    }
}

#[async_trait(?Send)]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<StatusSnapshot> {
        let response = Request::get(self.status_url.as_str())
            .send()
            .await
            .map_err(network)?;
        if !response.ok() {
            return Err(DashboardError::HttpStatus(response.status()));
        }
        StatusSnapshot::parse(&body_of(response).await?)
    }
}

/// Firestore REST client, optionally acting on behalf of a signed in user.
#[derive(Debug, PartialEq)]
pub struct FirestoreStore {
    endpoint: Url,
    project_id: String,
    id_token: Option<String>,
}

impl FirestoreStore {
    pub fn anonymous(endpoint: Url, project_id: String) -> Self {
        Self {
            endpoint,
            project_id,
            id_token: None,
        }
    }

    pub fn authorized(endpoint: Url, project_id: String, session: &Session) -> Self {
        Self {
            endpoint,
            project_id,
            id_token: Some(session.id_token.clone()),
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.id_token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }
}

#[async_trait(?Send)]
impl SettingsStore for FirestoreStore {
    async fn load(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let url = document_url(&self.endpoint, &self.project_id, path)?;
        let response = self
            .authorize(Request::get(url.as_str()))
            .send()
            .await
            .map_err(network)?;
        match response.status() {
            404 => Ok(None),
            _ if response.ok() => Ok(Some(serde_json::from_str(&body_of(response).await?)?)),
            status => Err(DashboardError::HttpStatus(status)),
        }
    }

    async fn replace(&self, path: &DocumentPath, document: &Document) -> Result<()> {
        // PATCH without an update mask overwrites every field of the document
        let url = document_url(&self.endpoint, &self.project_id, path)?;
        let response = self
            .authorize(Request::patch(url.as_str()))
            .json(document)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        if !response.ok() {
            return Err(DashboardError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub struct IdentityToolkit {
    endpoints: IdentityEndpoints,
}

impl IdentityToolkit {
    pub fn new(endpoints: IdentityEndpoints) -> Self {
        Self { endpoints }
    }
}

#[async_trait(?Send)]
impl IdentityProvider for IdentityToolkit {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let response = Request::post(self.endpoints.sign_in_url()?.as_str())
            .json(&SignInRequest::new(email, password))
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let status = response.status();
        let ok = response.ok();
        let body = body_of(response).await?;
        if !ok {
            return Err(parse_error_body(status, &body));
        }
        serde_json::from_str::<SignInResponse>(&body)?.into_session(Utc::now())
    }

    async fn refresh(&self, session: &Session) -> Result<Session> {
        let response = Request::post(self.endpoints.refresh_url()?.as_str())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(refresh_form(&session.refresh_token))
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let status = response.status();
        let ok = response.ok();
        let body = body_of(response).await?;
        if !ok {
            return Err(parse_error_body(status, &body));
        }
        serde_json::from_str::<RefreshResponse>(&body)?.into_session(session, Utc::now())
    }
}
