//! Sessions driven by the async runtime instead of by hand.

use std::time::Duration;

use tokio::{sync::watch, time};

use tilesync_host::{Host, HostConfig};
use tilesync_peer::{Peer, PeerConfig};
use tilesync_shared::{run, transport::Socket, AvatarAsset, World};
use tilesync_test::{init_logging, LocalHub, HOST_CONNECTION};

fn host_config() -> HostConfig {
    HostConfig {
        randomize_world: false,
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn host_and_peer_sync_then_shut_down() {
    init_logging();
    let hub = LocalHub::new();

    let host = Host::new(host_config(), AvatarAsset::default()).into_session_with(World::default());
    let (host_sender, host_receiver) = Box::new(hub.host_socket()).listen(9001).unwrap();

    let peer = Peer::new(PeerConfig::default(), AvatarAsset::default()).into_session();
    let peer_socket = hub.peer_socket();
    let peer_id = peer_socket.connection();
    let (peer_sender, peer_receiver) = Box::new(peer_socket).connect().unwrap();

    let (shutdown, shutdown_receiver) = watch::channel(false);
    let stop = async {
        time::sleep(Duration::from_secs(2)).await;
        shutdown.send(true).unwrap();
    };

    let (host, peer, ()) = tokio::join!(
        run(host, host_sender, host_receiver, shutdown_receiver.clone()),
        run(peer, peer_sender, peer_receiver, shutdown_receiver),
        stop,
    );

    assert!(!host.is_ended());
    assert!(!peer.is_ended());
    assert_eq!(peer.local_avatar(), Some(peer_id));
    assert_eq!(peer.authority().host(), Some(HOST_CONNECTION));
    assert_eq!(peer.world().tilemap(), host.world().tilemap());
    assert_eq!(
        host.world().avatar(peer_id).unwrap().appearance,
        peer.world().avatar(peer_id).unwrap().appearance
    );
}

#[tokio::test(start_paused = true)]
async fn peer_runtime_ends_when_host_drops_it() {
    init_logging();
    let hub = LocalHub::new();
    let _listening = Box::new(hub.host_socket()).listen(9001).unwrap();

    let peer = Peer::new(PeerConfig::default(), AvatarAsset::default()).into_session();
    let peer_socket = hub.peer_socket();
    let peer_id = peer_socket.connection();
    let (sender, receiver) = Box::new(peer_socket).connect().unwrap();
    hub.drop_peer(peer_id);

    let (_shutdown, shutdown_receiver) = watch::channel(false);
    let peer = time::timeout(
        Duration::from_secs(10),
        run(peer, sender, receiver, shutdown_receiver),
    )
    .await
    .expect("peer runtime kept going after losing the host");

    assert!(peer.is_ended());
}
