use dioxus_logger::tracing;

use crate::{client::service::EntityService, error::Error, model::CostFactor};

pub type CostFactorService = EntityService<CostFactor>;

impl EntityService<CostFactor> {
    /// Cost factors that apply to the style with ID `style_id`.
    ///
    /// # Returns
    /// - `Ok(Vec<CostFactor>)` - Cost factors from `GET api/cost-factors/style/{id}`
    /// - `Err(Error)` - The request failed or the body was not a list of cost factors
    pub async fn find_by_style(&self, style_id: i64) -> Result<Vec<CostFactor>, Error> {
        tracing::debug!("Request to get cost factors for style {}", style_id);

        self.find_all_at(&format!("style/{}", style_id)).await
    }
}
