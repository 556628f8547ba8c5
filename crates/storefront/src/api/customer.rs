//! Customer authentication and profile service.

use secrecy::SecretString;
use tracing::instrument;

use super::types::{Customer, LoginCredentials, ProfileUpdate};
use super::{decode, ApiClient, ApiError};

/// A successful login: the bearer token plus whatever customer object the
/// backend included alongside it.
#[derive(Debug)]
pub struct LoginSession {
    /// Bearer token for subsequent requests.
    pub token: SecretString,
    /// Customer object, when the login response carried one.
    pub customer: Option<Customer>,
}

/// Client for the customer login and profile endpoints.
///
/// These are write/auth paths: there is no demo fallback. A login response
/// without an extractable token is an explicit error even when the request
/// itself succeeded.
pub struct CustomerService {
    client: ApiClient,
    login_path: String,
    profile_path: String,
}

impl CustomerService {
    pub(crate) fn new(client: ApiClient, login_path: String, profile_path: String) -> Self {
        Self {
            client,
            login_path,
            profile_path,
        }
    }

    /// Log a customer in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails, or a decode error when
    /// the response carries no token under any accepted field name.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSession, ApiError> {
        let body = self.client.post(&self.login_path, credentials).await?;
        let token = decode::token(&body)?;

        Ok(LoginSession {
            token: SecretString::from(token),
            customer: decode::customer(&body),
        })
    }

    /// Fetch the customer profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails or no customer object can
    /// be decoded.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Customer, ApiError> {
        let body = self.client.get(&self.profile_path).await?;
        Ok(decode::customer_or_body(&body)?)
    }

    /// Update the customer profile.
    ///
    /// Plain field updates go as a JSON `PUT`. When a profile image is
    /// attached the update goes as a multipart `POST` carrying a
    /// `_method=PUT` override marker, matching the backend's upload
    /// convention.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails or no customer object can
    /// be decoded from the response.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Customer, ApiError> {
        let body = if let Some(image) = &update.profile_image {
            let mut form = reqwest::multipart::Form::new();
            for (name, value) in [
                ("name", &update.name),
                ("email", &update.email),
                ("phone", &update.phone),
                ("address", &update.address),
            ] {
                if let Some(value) = value {
                    form = form.text(name, value.clone());
                }
            }

            let part = reqwest::multipart::Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part("profile_image", part).text("_method", "PUT");

            self.client.post_multipart(&self.profile_path, form).await?
        } else {
            self.client.put(&self.profile_path, update).await?
        };

        Ok(decode::customer_or_body(&body)?)
    }
}
