//! Tests for CostFactorService::find_by_style.

use quanlyso::model::CostFactor;
use quanlyso_test_utils::prelude::*;

/// Tests fetching the cost factors of a style.
///
/// Expected: Ok with the cost factors referencing that style
#[tokio::test]
async fn finds_cost_factors_by_style() -> Result<(), TestError> {
    let mut test = TestSetup::new().await?;
    let cost_factors = vec![
        factory::mock_cost_factor(1, 3),
        factory::mock_cost_factor(2, 3),
    ];
    let endpoint = test
        .api()
        .create_cost_factors_by_style_endpoint(3, &cost_factors, 1);

    let result = test.ctx.service::<CostFactor>().find_by_style(3).await?;

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|cf| cf.styles_id == Some(3)));
    endpoint.assert();

    Ok(())
}

/// Tests fetching the cost factors of an unknown style.
///
/// Expected: Err(Api) with status 404
#[tokio::test]
async fn unknown_style_is_not_found() -> Result<(), TestError> {
    let mut test = TestSetup::new().await?;
    let endpoint =
        test.api()
            .create_error_endpoint("GET", "/api/cost-factors/style/9", 404, "", 1);

    let result = test.ctx.service::<CostFactor>().find_by_style(9).await;

    assert!(result.unwrap_err().is_not_found());
    endpoint.assert();

    Ok(())
}
