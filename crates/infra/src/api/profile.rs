//! The signed-in user's profile

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bullboard_domain::constants::paths;
use bullboard_domain::{ApiError, PhotoUpload, ProfileUpdate, UserProfile};
use tracing::{debug, instrument};

use super::client::ApiClient;

/// Profile endpoints
#[derive(Clone)]
pub struct ProfileApi {
    client: ApiClient,
}

impl ProfileApi {
    /// Profile endpoints over `client`
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<UserProfile, ApiError> {
        self.client.get(paths::PROFILE).await
    }

    /// Change the fields set in `update`; unset fields are left alone.
    ///
    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip_all)]
    pub async fn update(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.client.put(paths::PROFILE, update).await
    }

    /// Upload a profile photo. The image travels base64-encoded in a JSON
    /// body.
    ///
    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn upload_photo(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<UserProfile, ApiError> {
        let upload = PhotoUpload {
            image_base64: STANDARD.encode(image),
            content_type: content_type.to_string(),
        };
        let profile: UserProfile = self.client.post(paths::PROFILE_PHOTO, &upload).await?;

        debug!(has_photo = profile.photo_url.is_some(), "Profile photo uploaded");
        Ok(profile)
    }
}
