//! Outbound retry, per-connection abort, lookup failures and transport errors.

use tilesync_shared::{
    transport::{RecvError, SendError},
    AvatarAsset, ChatEvent, GridPos, Message, NotificationEvent, Palette,
};
use tilesync_test::{exchange, host_with_peers, init_logging, Endpoint, LocalHub, TestHost, TestPeer};

#[test]
fn transient_failures_are_retried() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 1);
    let (peer, peer_id) = &mut peers[0];
    peer.session.take_events();

    hub.inject_send_failures(
        Endpoint::Peer(*peer_id),
        [SendError::Transient { code: 11 }, SendError::Transient { code: 12 }],
    );
    assert!(host.session.chat("still there?").unwrap());
    exchange(&mut host, &mut [&mut *peer]);

    assert_eq!(host.retries(), 2);
    let lines: Vec<_> = peer.session.take_events().read::<ChatEvent>().collect();
    assert_eq!(lines, vec![(0, "still there?".to_string())]);
}

#[test]
fn fatal_failure_only_skips_that_connection() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(broken, broken_id), (healthy, _)] = &mut peers[..] else {
        unreachable!();
    };
    broken.session.take_events();
    healthy.session.take_events();
    let abandoned = host.outbound().abandoned();

    hub.inject_send_failures(Endpoint::Peer(*broken_id), [SendError::Fatal { code: 99 }]);
    assert!(host.session.chat("hello all").unwrap());
    exchange(&mut host, &mut [&mut *broken, &mut *healthy]);

    assert_eq!(host.outbound().abandoned(), abandoned + 1);
    assert!(!broken.session.take_events().has::<ChatEvent>());
    let lines: Vec<_> = healthy.session.take_events().read::<ChatEvent>().collect();
    assert_eq!(lines, vec![(0, "hello all".to_string())]);
}

#[test]
fn unknown_avatars_are_dropped_and_counted() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 1);
    let (peer, peer_id) = &mut peers[0];
    peer.session.take_events();

    let context = host.session.context_mut();
    context
        .send_to(
            *peer_id,
            &Message::Chat {
                id: 77,
                text: "ghost".to_string(),
            },
        )
        .unwrap();
    context
        .send_to(
            *peer_id,
            &Message::MoveAvatar {
                id: 78,
                destination: GridPos::new(1, 0),
            },
        )
        .unwrap();
    exchange(&mut host, &mut [&mut *peer]);

    assert_eq!(peer.session.dropped_lookups(), 2);
    assert!(!peer.session.take_events().has::<ChatEvent>());
    // the session carries on
    assert!(peer.session.chat("still fine").unwrap());
}

#[test]
fn receive_errors_become_notifications() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, _peers) = host_with_peers(&hub, 1);
    host.session.take_events();

    hub.inject_receive_error(Endpoint::Host, RecvError { code: -4 });
    host.poll();

    let notes: Vec<_> = host.session.take_events().read::<NotificationEvent>().collect();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].contains("-4"));
}

#[test]
fn garbage_payloads_are_ignored() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, peers) = host_with_peers(&hub, 1);
    let peer_id = peers[0].1;

    host.session.receive_payload(peer_id, &[]);
    host.session.receive_payload(peer_id, &[99, 0, 0, 0]);
    host.session.receive_payload(peer_id, &[12, 0, 0, 0, 1]);

    assert!(host.session.context().outbound().is_empty());
    assert_eq!(host.session.world().avatar_count(), 2);
}

#[test]
fn missing_asset_uses_default_appearance() {
    init_logging();
    let hub = LocalHub::new();
    let mut host = TestHost::flat(&hub);
    let asset = AvatarAsset::load_or_default("no/such/avatar.tsav");
    let (mut peer, peer_id) = TestPeer::join_with(&hub, asset);
    exchange(&mut host, &mut [&mut peer]);

    let expected = AvatarAsset::default().to_appearance(&Palette::default());
    assert_eq!(host.session.world().avatar(peer_id).unwrap().appearance, expected);
}

#[test]
fn full_host_refuses_connections() {
    init_logging();
    let hub = LocalHub::new();
    let mut host = TestHost::start(
        &hub,
        tilesync_host::HostConfig {
            max_connections: 1,
            randomize_world: false,
            ..Default::default()
        },
        Default::default(),
    );
    let (mut first, first_id) = TestPeer::join(&hub);
    let (mut second, second_id) = TestPeer::join(&hub);
    exchange(&mut host, &mut [&mut first, &mut second]);

    assert!(host.session.world().has_avatar(first_id));
    assert!(!host.session.world().has_avatar(second_id));
    assert!(first.is_synced());
    assert!(second.session.is_ended());
}
