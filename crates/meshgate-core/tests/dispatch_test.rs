//! End-to-end dispatch tests: host call in, reply out.
//!
//! Every test drives the public `MeshBridge` surface the way a host would,
//! with raw method names and JSON argument maps.
#![allow(clippy::unwrap_used)]

use meshgate_core::{
    AddressRange, Element, MeshBridge, MeshEvent, MeshNetwork, Model, Node, Provisioner, Reply,
};
use meshgate_core::{MeshAddress, NetworkHandle};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

const NETWORK_ID: &str = "5D2B6E1A-0000-4000-8000-00000000CAFE";

fn provisioner_uuid() -> Uuid {
    Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap()
}

fn node_uuid() -> Uuid {
    Uuid::parse_str("aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee").unwrap()
}

fn home_network() -> MeshNetwork {
    MeshNetwork::new(NETWORK_ID, Some("Home".into()))
        .with_provisioner(
            Provisioner::new(provisioner_uuid(), "phone")
                .with_unicast_range(AddressRange::new(1, 100))
                .with_group_range(AddressRange::new(0xC000, 0xCC9A)),
        )
        .with_node(
            Node::new(node_uuid(), 0x0002)
                .with_element(
                    Element::new(Some("Light".into()), 0x0100)
                        .with_model(Model::new(0x1000).bound_to(0))
                        .with_model(Model::new(0x1002).bound_to(0).bound_to(2)),
                )
                .with_element(Element::new(None, 0x0101).with_model(Model::new(0x1300))),
        )
}

fn setup(network: MeshNetwork) -> (MeshBridge, Arc<NetworkHandle>) {
    let bridge = MeshBridge::default();
    let handle = bridge.register(network);
    (bridge, handle)
}

async fn call(handle: &NetworkHandle, method: &str, args: Option<Value>) -> Reply {
    handle.handle_call(method, args.as_ref()).await
}

async fn body(handle: &NetworkHandle, method: &str, args: Option<Value>) -> Value {
    match call(handle, method, args).await {
        Reply::Success(value) => value,
        other => panic!("{method}: expected success, got {other:?}"),
    }
}

// ── Queries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn network_identity() {
    let (_bridge, handle) = setup(home_network());
    assert_eq!(body(&handle, "getId", None).await, json!(NETWORK_ID));
    assert_eq!(body(&handle, "getMeshNetworkName", None).await, json!("Home"));
    assert_eq!(
        body(&handle, "selectedProvisionerUuid", None).await,
        json!("11111111-2222-4333-8444-555555555555")
    );
}

#[tokio::test]
async fn nodes_project_to_uuid() {
    let (_bridge, handle) = setup(home_network());
    assert_eq!(
        body(&handle, "nodes", None).await,
        json!([{"uuid": "AAAAAAAA-BBBB-4CCC-8DDD-EEEEEEEEEEEE"}])
    );
}

#[tokio::test]
async fn highest_allocatable_address_scans_ranges() {
    let (_bridge, handle) = setup(home_network());
    assert_eq!(body(&handle, "highestAllocatableAddress", None).await, json!(100));
}

#[tokio::test]
async fn bare_network_degrades_to_defaults() {
    let (_bridge, handle) = setup(MeshNetwork::new("bare", None));
    assert_eq!(body(&handle, "highestAllocatableAddress", None).await, json!(0));
    assert_eq!(body(&handle, "getMeshNetworkName", None).await, Value::Null);
    assert_eq!(body(&handle, "selectedProvisionerUuid", None).await, Value::Null);
    assert_eq!(body(&handle, "nodes", None).await, json!([]));
    assert_eq!(body(&handle, "groups", None).await, json!([]));
}

// ── Group lifecycle ─────────────────────────────────────────────────

#[tokio::test]
async fn living_room_scenario() {
    let (_bridge, handle) = setup(home_network());

    let added = body(&handle, "addGroupWithName", Some(json!({"name": "Living Room"}))).await;
    assert_eq!(
        added,
        json!({
            "group": {
                "name": "Living Room",
                "address": 0xC000,
                "addressLabel": null,
                "parentAddress": null,
                "parentAddressLabel": null
            },
            "successfullyAdded": true
        })
    );

    let remove = json!({"groupAddress": 0xC000});
    assert_eq!(body(&handle, "removeGroup", Some(remove.clone())).await, json!(true));
    assert_eq!(body(&handle, "removeGroup", Some(remove)).await, json!(false));
}

#[tokio::test]
async fn added_group_is_listed_at_allocated_address() {
    let (_bridge, handle) = setup(home_network());

    body(&handle, "addGroupWithName", Some(json!({"name": "Hall"}))).await;
    let added = body(&handle, "addGroupWithName", Some(json!({"name": "Kitchen"}))).await;
    let allocated = added["group"]["address"].clone();
    assert_eq!(allocated, json!(0xC001));

    let groups = body(&handle, "groups", None).await;
    let kitchen = groups
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["name"] == "Kitchen")
        .unwrap();
    assert_eq!(kitchen["address"], allocated);
}

#[tokio::test]
async fn listing_groups_is_idempotent() {
    let (_bridge, handle) = setup(home_network());
    body(&handle, "addGroupWithName", Some(json!({"name": "A"}))).await;
    body(&handle, "addGroupWithName", Some(json!({"name": "B"}))).await;

    let first = body(&handle, "groups", None).await;
    let second = body(&handle, "groups", None).await;
    assert_eq!(first, second);
    assert_eq!(first.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn removing_missing_group_keeps_cardinality() {
    let (_bridge, handle) = setup(home_network());
    body(&handle, "addGroupWithName", Some(json!({"name": "A"}))).await;

    let reply = body(&handle, "removeGroup", Some(json!({"groupAddress": 0xC0FF}))).await;
    assert_eq!(reply, json!(false));
    assert_eq!(body(&handle, "groups", None).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn add_group_without_provisioner_replies_false() {
    let (_bridge, handle) = setup(MeshNetwork::new("bare", None));
    let reply = body(&handle, "addGroupWithName", Some(json!({"name": "Kitchen"}))).await;
    assert_eq!(reply, json!({"group": null, "successfullyAdded": false}));
    assert_eq!(body(&handle, "groups", None).await, json!([]));
}

#[tokio::test]
async fn add_group_when_ranges_exhausted_replies_false() {
    let network = MeshNetwork::new("tiny", None).with_provisioner(
        Provisioner::new(provisioner_uuid(), "phone")
            .with_group_range(AddressRange::new(0xC000, 0xC000)),
    );
    let (_bridge, handle) = setup(network);

    let first = body(&handle, "addGroupWithName", Some(json!({"name": "A"}))).await;
    assert_eq!(first["successfullyAdded"], json!(true));
    let second = body(&handle, "addGroupWithName", Some(json!({"name": "B"}))).await;
    assert_eq!(second, json!({"group": null, "successfullyAdded": false}));
}

#[tokio::test]
async fn add_group_falls_back_when_range_leaves_group_space() {
    let network = MeshNetwork::new("edge", None).with_provisioner(
        Provisioner::new(provisioner_uuid(), "phone")
            .with_group_range(AddressRange::new(0xFEFF, 0xFF10))
            .with_group_range(AddressRange::new(0xC000, 0xC0FF)),
    );
    let (_bridge, handle) = setup(network);

    let top = body(&handle, "addGroupWithName", Some(json!({"name": "Top"}))).await;
    assert_eq!(top["group"]["address"], json!(0xC000));

    // the highest dynamic address is taken; nothing past it is offered
    let network = MeshNetwork::from_json(
        &json!({
            "id": "edge-2",
            "provisioners": [{
                "uuid": "11111111-2222-4333-8444-555555555555",
                "allocatedGroupRanges": [
                    {"lowAddress": 0xFEFF, "highAddress": 0xFF10},
                    {"lowAddress": 0xC000, "highAddress": 0xC0FF}
                ]
            }],
            "groups": [{"name": "Taken", "address": {"address": 0xFEFF}}]
        })
        .to_string(),
    )
    .unwrap();
    let (_bridge, handle) = setup(network);

    let added = body(&handle, "addGroupWithName", Some(json!({"name": "K"}))).await;
    assert_eq!(added["successfullyAdded"], json!(true));
    assert_eq!(added["group"]["address"], json!(0xC000));
}

#[tokio::test]
async fn subscribed_group_cannot_be_removed() {
    let address = MeshAddress::new(0xC000);
    let mut network = home_network();
    network.nodes[0].elements[0].models[0]
        .subscriptions
        .push(address);
    let (_bridge, handle) = setup(network);

    body(&handle, "addGroupWithName", Some(json!({"name": "Lights"}))).await;
    let reply = body(&handle, "removeGroup", Some(json!({"groupAddress": 0xC000}))).await;
    assert_eq!(reply, json!(false));
    assert_eq!(body(&handle, "groups", None).await.as_array().unwrap().len(), 1);
}

// ── Element aggregation ─────────────────────────────────────────────

#[tokio::test]
async fn elements_for_group_collects_subscribed_models() {
    let address = MeshAddress::new(0xC000);
    let mut network = home_network();
    let element = &mut network.nodes[0].elements[0];
    element.models[0].subscriptions.push(address);
    element.models[1].subscriptions.push(MeshAddress::new(0xC005));
    element.models[1].subscriptions.push(address);
    let (_bridge, handle) = setup(network);

    body(&handle, "addGroupWithName", Some(json!({"name": "Lights"}))).await;
    let elements = body(&handle, "getElementsForGroup", Some(json!({"address": 0xC000}))).await;
    assert_eq!(
        elements,
        json!([{
            "name": "Light",
            "address": 2,
            "locationDescriptor": 256,
            "models": [
                {"subscribedAddresses": [0xC000], "boundAppKey": [0]},
                {"subscribedAddresses": [0xC005, 0xC000], "boundAppKey": [0, 2]}
            ]
        }])
    );
}

#[tokio::test]
async fn elements_for_unsubscribed_group_is_empty() {
    let (_bridge, handle) = setup(home_network());
    body(&handle, "addGroupWithName", Some(json!({"name": "Empty"}))).await;
    let elements = body(&handle, "getElementsForGroup", Some(json!({"address": 0xC000}))).await;
    assert_eq!(elements, json!([]));
}

#[tokio::test]
async fn elements_for_missing_group_is_false() {
    let (_bridge, handle) = setup(home_network());
    let reply = body(&handle, "getElementsForGroup", Some(json!({"address": 0xC000}))).await;
    assert_eq!(reply, json!(false));
}

// ── Parser boundary ─────────────────────────────────────────────────

#[tokio::test]
async fn unknown_method_is_acknowledged_without_body() {
    let (_bridge, handle) = setup(home_network());
    assert_eq!(call(&handle, "provisionDevice", None).await, Reply::NotImplemented);
    // the dispatcher keeps working afterwards
    assert_eq!(body(&handle, "getId", None).await, json!(NETWORK_ID));
}

#[tokio::test]
async fn malformed_arguments_are_surfaced_without_mutation() {
    let (_bridge, handle) = setup(home_network());

    for (method, args) in [
        ("addGroupWithName", None),
        ("addGroupWithName", Some(json!({}))),
        ("addGroupWithName", Some(json!({"name": ""}))),
        ("removeGroup", Some(json!({"address": 0xC000}))),
        ("removeGroup", Some(json!({"groupAddress": "0xC000"}))),
        ("getElementsForGroup", Some(json!({"address": 65_536}))),
    ] {
        let reply = call(&handle, method, args).await;
        let Reply::Error { code, message } = reply else {
            panic!("{method}: expected error reply, got {reply:?}");
        };
        assert_eq!(code, "MALFORMED_ARGUMENTS");
        assert!(message.contains(method), "{message}");
    }

    assert_eq!(body(&handle, "groups", None).await, json!([]));
}

// ── Events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn mutations_reach_the_subscriber() {
    let (bridge, handle) = setup(home_network());
    let mut events = bridge.subscribe(NETWORK_ID).unwrap();

    body(&handle, "addGroupWithName", Some(json!({"name": "Porch"}))).await;
    body(&handle, "groups", None).await;
    body(&handle, "removeGroup", Some(json!({"groupAddress": 0xC000}))).await;

    let Some(MeshEvent::GroupAdded { group }) = events.recv().await else {
        panic!("expected group added");
    };
    assert_eq!(group.name, "Porch");
    assert_eq!(
        events.recv().await,
        Some(MeshEvent::group_removed(&MeshAddress::new(0xC000)))
    );
    assert_eq!(events.try_recv(), None);
}

#[tokio::test]
async fn cancelled_stream_receives_nothing_more() {
    let (bridge, handle) = setup(home_network());
    let mut events = bridge.subscribe(NETWORK_ID).unwrap();
    bridge.cancel_subscription(NETWORK_ID).unwrap();

    body(&handle, "addGroupWithName", Some(json!({"name": "Porch"}))).await;
    assert_eq!(events.recv().await, None);
}
