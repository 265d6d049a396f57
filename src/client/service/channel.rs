use dioxus_logger::tracing;

use crate::{client::service::EntityService, error::Error, model::Channel};

pub type ChannelService = EntityService<Channel>;

impl EntityService<Channel> {
    /// Channels open on `day`, a lowercase weekday label such as `monday`.
    ///
    /// # Returns
    /// - `Ok(Vec<Channel>)` - Channels from `GET api/channels/day/{day}`
    /// - `Err(Error)` - The request failed or the body was not a list of channels
    pub async fn find_by_open_day(&self, day: &str) -> Result<Vec<Channel>, Error> {
        tracing::debug!("Request to get channels open on {}", day);

        self.find_all_at(&format!("day/{}", day)).await
    }
}
