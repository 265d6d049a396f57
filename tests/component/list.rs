//! Tests for EntityList.

use std::collections::BTreeMap;

use quanlyso::{
    client::{
        component::{EntityList, ListState},
        event::{ChangeEvent, Operation},
        pagination::PagingParams,
        router::Router,
    },
    model::{Channel, CostFactor, EntityKind},
};
use quanlyso_test_utils::prelude::*;

/// Tests initializing a list.
///
/// Verifies that the records are loaded, the user resolved from cache and the list
/// subscribed to its entity kind.
///
/// Expected: Populated list with one subscription
#[tokio::test]
async fn init_loads_and_subscribes() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let channels = vec![factory::mock_channel(1, "Mien Bac", "monday")];
    let endpoint = test
        .api()
        .create_list_endpoint(EntityKind::Channel, &channels, None, 1);

    let mut list = EntityList::<Channel>::new(&test.ctx);
    list.init().await;

    assert_eq!(list.state(), ListState::Populated);
    assert_eq!(list.records(), channels.as_slice());
    assert!(list.account().is_some());
    assert_eq!(test.ctx.bus.subscriber_count(EntityKind::Channel), 1);
    endpoint.assert();

    Ok(())
}

/// Tests refreshing on change events.
///
/// Verifies that every change event of the list's kind triggers exactly one reload.
///
/// Expected: one initial load plus one reload per event
#[tokio::test]
async fn reloads_once_per_event() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let channels = vec![factory::mock_channel(1, "Mien Bac", "monday")];
    let endpoint = test
        .api()
        .create_list_endpoint(EntityKind::Channel, &channels, None, 3);

    let mut list = EntityList::<Channel>::new(&test.ctx);
    list.init().await;
    test.ctx
        .bus
        .publish(ChangeEvent::new(EntityKind::Channel, Operation::Created, Some(2)));
    test.ctx
        .bus
        .publish(ChangeEvent::new(EntityKind::Channel, Operation::Deleted, Some(1)));

    assert_eq!(list.process_events().await, 2);
    assert_eq!(list.process_events().await, 0);
    assert_eq!(list.load_count(), 3);
    endpoint.assert();

    Ok(())
}

/// Tests events of another entity kind.
///
/// Expected: no reload
#[tokio::test]
async fn ignores_other_kinds() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let endpoint = test
        .api()
        .create_list_endpoint::<Channel>(EntityKind::Channel, &[], None, 1);

    let mut list = EntityList::<Channel>::new(&test.ctx);
    list.init().await;
    test.ctx
        .bus
        .publish(ChangeEvent::new(EntityKind::Style, Operation::Updated, Some(1)));

    assert_eq!(list.process_events().await, 0);
    assert_eq!(list.load_count(), 1);
    endpoint.assert();

    Ok(())
}

/// Tests waiting for the next change event.
///
/// Expected: the event is returned after the reload
#[tokio::test]
async fn next_event_reloads() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let endpoint = test
        .api()
        .create_list_endpoint::<Channel>(EntityKind::Channel, &[], None, 2);

    let mut list = EntityList::<Channel>::new(&test.ctx);
    list.init().await;
    test.ctx
        .bus
        .publish(ChangeEvent::new(EntityKind::Channel, Operation::Updated, Some(1)));

    let event = list.next_event().await;

    assert_eq!(event.map(|e| e.name()), Some("channelListModification".to_string()));
    assert_eq!(list.load_count(), 2);
    endpoint.assert();

    Ok(())
}

/// Tests resolving style names of cost factors.
///
/// Verifies that records sharing a style cause a single style lookup.
///
/// Expected: every record carries the style name
#[tokio::test]
async fn resolves_display_names_once() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let cost_factors = vec![
        factory::mock_cost_factor(1, 3),
        factory::mock_cost_factor(2, 3),
    ];
    let list_endpoint =
        test.api()
            .create_list_endpoint(EntityKind::CostFactor, &cost_factors, None, 1);
    let style_endpoint = test.api().create_find_endpoint(
        EntityKind::Style,
        3,
        &factory::mock_style(3, "Da"),
        1,
    );

    let mut list = EntityList::<CostFactor>::new(&test.ctx);
    list.init().await;

    assert!(list
        .records()
        .iter()
        .all(|cf| cf.styles_name.as_deref() == Some("Da")));
    list_endpoint.assert();
    style_endpoint.assert();

    Ok(())
}

/// Tests a failing style lookup.
///
/// Verifies that the list still loads and the failure is alerted.
///
/// Expected: Populated list, empty style name, one alert
#[tokio::test]
async fn tolerates_failed_name_lookup() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let cost_factors = vec![factory::mock_cost_factor(1, 4)];
    let list_endpoint =
        test.api()
            .create_list_endpoint(EntityKind::CostFactor, &cost_factors, None, 1);
    let style_endpoint =
        test.api()
            .create_error_endpoint("GET", "/api/styles/4", 500, "Cannot retrieve styles", 1);

    let mut list = EntityList::<CostFactor>::new(&test.ctx);
    list.init().await;

    assert_eq!(list.state(), ListState::Populated);
    assert_eq!(list.records().len(), 1);
    assert!(list.records()[0].styles_name.is_none());
    let alerts = test.ctx.alerts.drain();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "Cannot retrieve styles");
    list_endpoint.assert();
    style_endpoint.assert();

    Ok(())
}

/// Tests a paged list.
///
/// Verifies that the resolved paging is sent zero-based, the total count is kept and
/// moving to another page requests it.
///
/// Expected: two requests, for pages 0 and 1
#[tokio::test]
async fn loads_pages() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let channels = vec![factory::mock_channel(1, "Mien Bac", "monday")];
    let first = test.api().create_paged_list_endpoint(
        EntityKind::Channel,
        &[("page", "0"), ("size", "20"), ("sort", "id,asc")],
        &channels,
        45,
        1,
        1,
    );
    let second = test.api().create_paged_list_endpoint(
        EntityKind::Channel,
        &[("page", "1"), ("size", "20"), ("sort", "id,asc")],
        &channels,
        45,
        2,
        1,
    );

    let paging = PagingParams::resolve(&BTreeMap::new(), 20);
    let mut list = EntityList::<Channel>::new(&test.ctx).with_paging(paging);
    list.init().await;

    assert_eq!(list.total_items(), Some(45));
    assert_eq!(list.links().get("next"), Some(&1));
    assert_eq!(list.pages().pages, vec![Some(1), Some(2), Some(3)]);

    list.load_page(2).await?;

    assert_eq!(list.paging().map(|p| p.page), Some(2));
    first.assert();
    second.assert();

    Ok(())
}

/// Tests a list whose page size differs from the application default.
///
/// Verifies that the pager counts pages with the size the list requests.
///
/// Expected: 45 records at 10 per page give five pages
#[tokio::test]
async fn pager_follows_list_page_size() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let endpoint = test.api().create_paged_list_endpoint::<Channel>(
        EntityKind::Channel,
        &[("page", "0"), ("size", "10"), ("sort", "id,asc")],
        &[],
        45,
        1,
        1,
    );

    let mut list = EntityList::<Channel>::new(&test.ctx).with_paging(PagingParams::new(10));
    list.init().await;

    assert_eq!(
        list.pages().pages,
        vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
    );
    endpoint.assert();

    Ok(())
}

/// Tests a route asking for a page far past the end.
///
/// Verifies that the pager stops at the last page instead of overflowing.
///
/// Expected: three pages with the last one current
#[tokio::test]
async fn pager_clamps_route_page_past_end() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let endpoint = test.api().create_paged_list_endpoint::<Channel>(
        EntityKind::Channel,
        &[
            ("page", "18446744073709551614"),
            ("size", "20"),
            ("sort", "id,asc"),
        ],
        &[],
        45,
        1,
        1,
    );
    let paging = Router::new(20)
        .recognize("channel?page=18446744073709551615")
        .and_then(|matched| matched.paging)
        .unwrap();

    let mut list = EntityList::<Channel>::new(&test.ctx).with_paging(paging);
    list.init().await;
    let window = list.pages();

    assert_eq!(window.pages, vec![Some(1), Some(2), Some(3)]);
    assert_eq!(window.page, 3);
    endpoint.assert();

    Ok(())
}

/// Tests destroying a list twice.
///
/// Expected: subscription released, later events ignored
#[tokio::test]
async fn destroy_releases_subscription() -> Result<(), TestError> {
    let mut test = TestSetup::with_user().await?;
    let endpoint = test
        .api()
        .create_list_endpoint::<Channel>(EntityKind::Channel, &[], None, 1);

    let mut list = EntityList::<Channel>::new(&test.ctx);
    list.init().await;
    list.destroy();
    list.destroy();
    test.ctx
        .bus
        .publish(ChangeEvent::new(EntityKind::Channel, Operation::Created, None));

    assert_eq!(test.ctx.bus.subscriber_count(EntityKind::Channel), 0);
    assert_eq!(list.process_events().await, 0);
    endpoint.assert();

    Ok(())
}
