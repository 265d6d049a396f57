//! Tests for ToolComponent.

use chrono::NaiveDate;
use mockito::Matcher;
use quanlyso::{
    client::component::ToolComponent,
    model::{Channel, EntityKind},
};
use quanlyso_test_utils::{constant::TEST_ACCOUNT_ID, prelude::*};
use serde_json::json;

fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 6, 17).unwrap()
}

/// Registers the factor, style and types list endpoints.
fn reference_endpoints(test: &mut TestSetup, expected_requests: usize) -> Vec<mockito::Mock> {
    vec![
        test.api().create_list_endpoint(
            EntityKind::Factor,
            &[factory::mock_factor(1, "Gia")],
            None,
            expected_requests,
        ),
        test.api().create_list_endpoint(
            EntityKind::Style,
            &[factory::mock_style(1, "Da"), factory::mock_style(2, "Xien")],
            None,
            expected_requests,
        ),
        test.api().create_list_endpoint(
            EntityKind::Types,
            &[factory::mock_types(1, "Mua")],
            None,
            expected_requests,
        ),
    ]
}

/// Tests opening the tool.
///
/// Verifies that the four lookup lists are loaded for the weekday of today and the
/// transaction starts with one line item for the signed-in account.
///
/// Expected: every list filled, one blank line item, clientsId of the account
#[tokio::test]
async fn init_loads_lookups_for_weekday() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let channels = vec![factory::mock_channel(1, "Mien Bac", "saturday")];
    let channel_endpoint = test
        .api()
        .create_channels_by_day_endpoint("saturday", &channels, 1);
    let endpoints = reference_endpoints(&mut test, 1);

    let mut tool = ToolComponent::new(&test.ctx);
    tool.init(saturday()).await;

    assert_eq!(tool.day(), Some("saturday"));
    assert_eq!(tool.channels(), channels.as_slice());
    assert_eq!(tool.factors().len(), 1);
    assert_eq!(tool.styles().len(), 2);
    assert_eq!(tool.types().len(), 1);
    assert_eq!(tool.transactions().clients_id, Some(TEST_ACCOUNT_ID));
    assert_eq!(tool.lines().count(), 1);
    assert!(test.ctx.alerts.is_empty());
    channel_endpoint.assert();
    endpoints.iter().for_each(|endpoint| endpoint.assert());

    Ok(())
}

/// Tests changing the open date.
///
/// Verifies that the day-filtered channel query is sent again for the new weekday and its
/// result replaces the previous channels.
///
/// Expected: monday channels only
#[tokio::test]
async fn open_date_change_requeries_channels() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let saturday_endpoint = test.api().create_channels_by_day_endpoint(
        "saturday",
        &[factory::mock_channel(1, "Mien Bac", "saturday")],
        1,
    );
    let monday_endpoint = test.api().create_channels_by_day_endpoint(
        "monday",
        &[factory::mock_channel(2, "Mien Nam", "monday")],
        1,
    );
    let endpoints = reference_endpoints(&mut test, 2);

    let mut tool = ToolComponent::new(&test.ctx);
    tool.init(saturday()).await;
    let monday = NaiveDate::from_ymd_opt(2017, 6, 19).unwrap();
    tool.set_open_date(monday.and_hms_opt(0, 0, 0).unwrap().and_utc());
    tool.on_open_date_change().await;

    assert_eq!(tool.day(), Some("monday"));
    let ids: Vec<Option<i64>> = tool.channels().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![Some(2)]);
    saturday_endpoint.assert();
    monday_endpoint.assert();
    endpoints.iter().for_each(|endpoint| endpoint.assert());

    Ok(())
}

/// Tests one failing lookup.
///
/// Verifies that the failed list stays empty and is alerted while the others load.
///
/// Expected: styles empty, one alert
#[tokio::test]
async fn failed_lookup_leaves_others() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let channel_endpoint =
        test.api()
            .create_channels_by_day_endpoint::<Channel>("saturday", &[], 1);
    let factor_endpoint = test.api().create_list_endpoint(
        EntityKind::Factor,
        &[factory::mock_factor(1, "Gia")],
        None,
        1,
    );
    let style_endpoint = test
        .api()
        .create_error_endpoint("GET", "/api/styles", 500, "Styles unavailable", 1);
    let types_endpoint = test.api().create_list_endpoint(
        EntityKind::Types,
        &[factory::mock_types(1, "Mua")],
        None,
        1,
    );

    let mut tool = ToolComponent::new(&test.ctx);
    tool.init(saturday()).await;

    assert!(tool.styles().is_empty());
    assert_eq!(tool.factors().len(), 1);
    assert_eq!(tool.types().len(), 1);
    let alerts = test.ctx.alerts.drain();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "Styles unavailable");
    channel_endpoint.assert();
    factor_endpoint.assert();
    style_endpoint.assert();
    types_endpoint.assert();

    Ok(())
}

/// Tests submitting a transaction with two line items.
///
/// Verifies that the whole aggregate is posted, a transactions change event fires and the
/// in-progress flag is cleared.
///
/// Expected: Ok with the created transaction and one `transactionsListModification` event
#[tokio::test]
async fn submit_posts_aggregate_and_publishes() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let created = factory::mock_transactions(11, TEST_ACCOUNT_ID, 2);
    let endpoint = test
        .server
        .mock("POST", "/api/transactions")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "clientsId": TEST_ACCOUNT_ID })),
            Matcher::Regex(r#""transactionDetailsDTOs":\[\{[^{}]*\},\{[^{}]*\}\]"#.to_string()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&created)?)
        .create();
    let mut subscription = test.ctx.bus.subscribe(EntityKind::Transactions);

    let mut tool = ToolComponent::new(&test.ctx);
    let first = tool.lines().next().map(|(key, _)| key).unwrap();
    tool.line_mut(first).unwrap().amount = Some(10.0);
    let second = tool.add_record();
    tool.line_mut(second).unwrap().amount = Some(20.0);
    let result = tool.check().await?;

    assert_eq!(result.and_then(|t| t.id), Some(11));
    assert!(!tool.is_process());
    let event = subscription.try_recv().unwrap();
    assert_eq!(event.name(), "transactionsListModification");
    assert_eq!(event.content, "OK");
    assert!(test.ctx.alerts.is_empty());
    endpoint.assert();

    Ok(())
}

/// Tests a rejected submission whose error body is not JSON.
///
/// Verifies that the raw error text is alerted, no event fires and the in-progress flag
/// is cleared.
///
/// Expected: Err, one alert with the raw text
#[tokio::test]
async fn submit_error_alerts_raw_text() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let endpoint = test.api().create_error_endpoint(
        "POST",
        "/api/transactions",
        500,
        "Transaction could not be stored",
        1,
    );
    let mut subscription = test.ctx.bus.subscribe(EntityKind::Transactions);

    let mut tool = ToolComponent::new(&test.ctx);
    let result = tool.check().await;

    assert!(result.is_err());
    assert!(!tool.is_process());
    assert!(subscription.try_recv().is_none());
    let alerts = test.ctx.alerts.drain();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "Transaction could not be stored");
    endpoint.assert();

    Ok(())
}

/// Tests opening the tool with nobody signed in.
///
/// Expected: the new transaction has no client
#[tokio::test]
async fn anonymous_tool_has_no_client() -> Result<(), TestError> {
    let test = TestSetup::new().await?;

    let tool = ToolComponent::new(&test.ctx);

    assert!(tool.transactions().clients_id.is_none());
    assert_eq!(tool.lines().count(), 1);

    Ok(())
}
