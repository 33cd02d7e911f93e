use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        fields, ActionData, CategoryPageView, CategorySummary, LoginRequest, LoginResponse,
        PizzaPageView, Subject, SUBJECT_FIELD,
    },
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::ClientError,
    picker::PizzaPicker,
    surface::{FormSurface, FormValues, Settled, SurfaceObserver},
};

pub const PAGE_ADMIN_PATH: &str = "/admin/pages";
pub const LAB_PIZZA_PATH: &str = "/admin/lab/pizza";

/// The category popover of the page admin modal: one `name` input and the
/// hidden `_subject` discriminator.
pub fn page_category_surface<O: SurfaceObserver>(observer: O) -> FormSurface<O> {
    FormSurface::new(vec![fields::NAME], observer)
        .with_hidden(SUBJECT_FIELD, Subject::PageCategory.as_str())
}

/// HTTP client for the admin pages. Holds the session cookie between calls
/// and replaces it whenever the server refreshes the session.
pub struct AdminClient {
    http: Client,
    base: Url,
    session: Option<String>,
}

impl AdminClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            base: Url::parse(server_url)?,
            session: None,
        })
    }

    /// `name=value` pair of the current session cookie.
    pub fn session_cookie(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub async fn login(&mut self, did: &str) -> Result<i64, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/login")?)
            .json(&LoginRequest {
                did: did.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = self.read(response).await?;
        info!(user_id = body.user_id, "logged in");
        Ok(body.user_id)
    }

    pub async fn load_pizza_page(&mut self) -> Result<PizzaPageView, ClientError> {
        self.get(LAB_PIZZA_PATH).await
    }

    pub async fn load_categories(&mut self) -> Result<CategoryPageView, ClientError> {
        self.get(PAGE_ADMIN_PATH).await
    }

    /// Sends the picker's radio value, then reloads the page so the picker
    /// reflects the stored selection.
    pub async fn submit_pizza_selection(
        &mut self,
        picker: &mut PizzaPicker,
    ) -> Result<(), ClientError> {
        let values = picker.form_values()?;
        let response = self.post_form(LAB_PIZZA_PATH, &values).await?;
        let _: ActionData = self.read(response).await?;

        let view = self.load_pizza_page().await?;
        picker.apply_view(&view);
        Ok(())
    }

    /// Submits the category popover. The surface is always settled, closing
    /// on success and keeping inline errors on failure.
    pub async fn create_category<O: SurfaceObserver>(
        &mut self,
        surface: &mut FormSurface<O>,
        values: FormValues,
    ) -> Result<Option<CategorySummary>, ClientError> {
        let payload = surface.submit(values)?;

        let response = match self.post_form(PAGE_ADMIN_PATH, &payload).await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "category submission failed");
                surface.submission_settled(err.settled());
                return Err(err);
            }
        };
        self.remember_session(&response);

        if !response.status().is_success() {
            let err = api_error(response).await;
            debug!(error = %err, "category submission rejected");
            surface.submission_settled(err.settled());
            return Err(err);
        }

        // Stored once the server answers 2xx, whatever the body.
        surface.submission_settled(Settled::Success);
        let data: ActionData = response.json().await?;
        Ok(data.category)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&mut self, path: &str) -> Result<T, ClientError> {
        let mut request = self.http.get(self.endpoint(path)?);
        if let Some(cookie) = &self.session {
            request = request.header(header::COOKIE, cookie);
        }
        let response = request.send().await?;
        self.read(response).await
    }

    async fn post_form(&self, path: &str, values: &FormValues) -> Result<Response, ClientError> {
        let mut request = self.http.post(self.endpoint(path)?).form(values);
        if let Some(cookie) = &self.session {
            request = request.header(header::COOKIE, cookie);
        }
        Ok(request.send().await?)
    }

    async fn read<T: DeserializeOwned>(&mut self, response: Response) -> Result<T, ClientError> {
        self.remember_session(&response);

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    fn remember_session(&mut self, response: &Response) {
        let cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .map(str::trim)
            .find(|pair| pair.contains('='));
        if let Some(cookie) = cookie {
            self.session = Some(cookie.to_string());
        }
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => return ClientError::Http(err),
    };
    let error = serde_json::from_str::<ApiError>(&text).unwrap_or_else(|_| {
        warn!(status, "server answered without an error body");
        ApiError::new(ErrorCode::Internal, text)
    });
    ClientError::Api { status, error }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
