//
// SPDX-License-Identifier: MIT
//

use std::net::{IpAddr, Ipv4Addr};

use dvrd::config::{Config, NeighborConfig};
use dvrd::forwarding::RecordingForwardingPlane;
use dvrd::instance::Instance;
use dvrd::neighbor::Metrics;
use dvrd::network::Network;

async fn bind_ephemeral() -> Network {
    Network::bind(0).await.unwrap()
}

fn config(router_id: &str, other_id: &str, other_port: u16) -> Config {
    let mut network_map = std::collections::BTreeMap::new();
    network_map.insert(router_id.to_owned(), "10.0.1.0/24".parse().unwrap());
    network_map.insert(other_id.to_owned(), "10.0.2.0/24".parse().unwrap());

    Config {
        router_id: router_id.to_owned(),
        listen_port: 0,
        network_map,
        neighbors: vec![NeighborConfig {
            id: other_id.to_owned(),
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: other_port,
            metrics: Metrics {
                latency_ms: Some(10.0),
                bandwidth_mbps: Some(100.0),
            },
        }],
    }
}

// Two directly-connected routers exchange periodic advertisements and each
// learns the other's directly-attached destination.
#[tokio::test]
async fn two_neighbors_learn_each_others_routes() {
    let net_a = bind_ephemeral().await;
    let net_b = bind_ephemeral().await;
    let port_a = net_a.local_addr().unwrap().port();
    let port_b = net_b.local_addr().unwrap().port();

    let mut a = Instance::new(
        config("rA", "rB", port_b),
        net_a,
        Box::new(RecordingForwardingPlane::default()),
    );
    let mut b = Instance::new(
        config("rB", "rA", port_a),
        net_b,
        Box::new(RecordingForwardingPlane::default()),
    );

    for _ in 0..3 {
        a.tick().await;
        b.tick().await;
    }

    let route = a.routes().get("rB").expect("rA should have learned rB");
    assert_eq!(route.next_hop, "rB");
    assert!(!route.cost.is_infinite());

    let route = b.routes().get("rA").expect("rB should have learned rA");
    assert_eq!(route.next_hop, "rA");
    assert!(!route.cost.is_infinite());
}

// A datagram from an address with no matching neighbor id is dropped
// entirely: it must not create any route.
#[tokio::test]
async fn updates_from_unconfigured_neighbors_are_ignored() {
    let net_a = bind_ephemeral().await;
    let net_stranger = bind_ephemeral().await;
    let port_a = net_a.local_addr().unwrap().port();

    let mut a = Instance::new(
        config("rA", "rB", 1),
        net_a,
        Box::new(RecordingForwardingPlane::default()),
    );

    let update = dvrd::packet::Update::new("rStranger", {
        let mut table = std::collections::BTreeMap::new();
        table.insert(
            "rEvil".to_owned(),
            dvrd::packet::Rte {
                cost: 1.0,
                next_hop: "rStranger".to_owned(),
            },
        );
        table
    });
    net_stranger
        .send(
            &update.encode(),
            format!("127.0.0.1:{port_a}").parse().unwrap(),
        )
        .await
        .unwrap();

    a.tick().await;

    assert!(a.routes().get("rEvil").is_none());
}
