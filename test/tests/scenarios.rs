//! End-to-end scenarios: a real host and real peers exchanging messages over
//! the in-memory hub.
use tilesync_host::{random_world_with, HostConfig};
use tilesync_shared::{
    AvatarAsset, Color32, Direction, GridPos, Palette, SessionEvents, ChatEvent, World,
    EXITED_LINE, HOST_AVATAR_ID, TILE_PIXELS,
};
use tilesync_test::{exchange, host_with_peers, init_logging, LocalHub, TestHost, TestPeer};

fn chat_lines(events: &mut SessionEvents) -> Vec<(i32, String)> {
    events.read::<ChatEvent>().collect()
}

/// After the initial sync a peer's tilemap, palette and walls match the host's byte for byte
#[test]
fn initial_sync_mirrors_world() {
    init_logging();
    let hub = LocalHub::new();

    let mut palette = Palette::default();
    palette.set(3, Color32::opaque(10, 20, 30));
    let world = random_world_with(&mut fastrand::Rng::with_seed(11), palette.clone());
    let mut host = TestHost::start(
        &hub,
        HostConfig {
            randomize_world: false,
            ..Default::default()
        },
        world,
    );
    let (mut peer, connection) = TestPeer::join(&hub);

    exchange(&mut host, &mut [&mut peer]);

    let host_world = host.session.world();
    let peer_world = peer.session.world();
    assert_eq!(peer_world.tilemap(), host_world.tilemap());
    assert_eq!(peer_world.palette(), host_world.palette());
    assert_eq!(peer_world.palette(), &palette);
    assert_eq!(peer_world.walls(), host_world.walls());
    for tile in 0..32 {
        assert_eq!(peer_world.tile_bitmap(tile), host_world.tile_bitmap(tile));
    }

    assert!(peer.is_synced());
    assert_eq!(peer.session.local_avatar(), Some(connection));
    assert_eq!(peer_world.avatar_count(), 2);
    // the uploaded appearance reached the host
    assert_eq!(
        host_world.avatar(connection).unwrap().appearance,
        peer_world.avatar(connection).unwrap().appearance
    );
}

/// A handoff read before the host's palette still ends quantized against it
#[test]
fn handoff_appearance_follows_the_host_palette() {
    init_logging();
    let hub = LocalHub::new();

    let red = Color32::opaque(255, 0, 77);
    let mut palette = Palette::default();
    palette.set(9, Color32::opaque(90, 90, 90));
    palette.set(5, red);
    let mut host = TestHost::start(
        &hub,
        HostConfig {
            randomize_world: false,
            ..Default::default()
        },
        World::new(palette.clone()),
    );
    let asset = AvatarAsset::from_pixels(vec![red; TILE_PIXELS]).unwrap();
    let (mut peer, connection) = TestPeer::join_with(&hub, asset.clone());

    exchange(&mut host, &mut [&mut peer]);

    let expected = asset.to_appearance(&palette);
    assert_eq!(expected.get(0, 0), Some(5));
    assert_eq!(host.session.world().avatar(connection).unwrap().appearance, expected);
    assert_eq!(peer.session.world().avatar(connection).unwrap().appearance, expected);
}

/// The host avatar stepping right is mirrored by the peer
#[test]
fn host_move_is_mirrored() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 1);
    let (peer, _) = &mut peers[0];

    let destination = host.session.move_avatar(Direction::Right).unwrap();
    assert_eq!(destination, Some(GridPos::new(1, 0)));
    exchange(&mut host, &mut [&mut *peer]);

    let mirrored = peer.session.world().avatar(HOST_AVATAR_ID).unwrap();
    assert_eq!(mirrored.destination, GridPos::new(1, 0));
    assert_eq!(mirrored.source, GridPos::ORIGIN);
}

/// Two overlapping chunks from the lock holder: the later one wins at the overlap
#[test]
fn overlapping_chunks_take_later_bytes() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(editor, editor_id), (watcher, _)] = &mut peers[..] else {
        unreachable!();
    };

    editor.session.request_lock(5).unwrap();
    exchange(&mut host, &mut [&mut *editor, &mut *watcher]);
    assert_eq!(host.session.locks().owner(5), Some(*editor_id));
    assert_eq!(watcher.session.locks().owner(5), Some(*editor_id));
    assert!(editor.session.is_editing(5));

    assert!(editor.session.send_tile_chunk(5, 0, vec![1; 8]).unwrap());
    assert!(editor.session.send_tile_chunk(5, 4, vec![2; 8]).unwrap());
    exchange(&mut host, &mut [&mut *editor, &mut *watcher]);

    let expected = [1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 0];
    for session_world in [
        host.session.world(),
        editor.session.world(),
        watcher.session.world(),
    ] {
        assert_eq!(&session_world.tile_bitmap(5).unwrap().pixels()[..13], &expected);
    }
}

/// A disconnecting lock holder has every lock released on every participant
#[test]
fn disconnect_releases_locks_everywhere() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(leaver, leaver_id), (stayer, _)] = &mut peers[..] else {
        unreachable!();
    };

    leaver.session.request_lock(3).unwrap();
    leaver.session.request_lock(7).unwrap();
    exchange(&mut host, &mut [&mut *leaver, &mut *stayer]);
    assert_eq!(stayer.session.locks().owner(3), Some(*leaver_id));
    assert_eq!(stayer.session.locks().owner(7), Some(*leaver_id));
    stayer.session.take_events();

    hub.drop_peer(*leaver_id);
    exchange(&mut host, &mut [&mut *leaver, &mut *stayer]);

    assert!(!host.session.locks().is_locked(3));
    assert!(!host.session.locks().is_locked(7));
    assert!(!stayer.session.locks().is_locked(3));
    assert!(!stayer.session.locks().is_locked(7));
    assert!(!stayer.session.world().has_avatar(*leaver_id));

    let mut events = stayer.session.take_events();
    assert_eq!(
        chat_lines(&mut events),
        vec![(*leaver_id, EXITED_LINE.to_string())]
    );
    assert!(leaver.session.is_ended());
}

/// Chat from a peer reaches the host and the other peers, but is not echoed back
#[test]
fn chat_is_relayed_to_others() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(speaker, speaker_id), (listener, _)] = &mut peers[..] else {
        unreachable!();
    };
    speaker.session.take_events();
    listener.session.take_events();

    assert!(speaker.session.chat("hello").unwrap());
    exchange(&mut host, &mut [&mut *speaker, &mut *listener]);

    let line = (*speaker_id, "hello".to_string());
    assert_eq!(host.session.chat_log().last(), Some(&line));
    assert_eq!(chat_lines(&mut listener.session.take_events()), vec![line.clone()]);
    // the speaker logged its own line locally, once
    assert_eq!(chat_lines(&mut speaker.session.take_events()), vec![line]);
}

/// Tile and wall edits made on a peer land on the host and the other peers
#[test]
fn tile_and_wall_edits_propagate() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(editor, _), (watcher, _)] = &mut peers[..] else {
        unreachable!();
    };

    assert!(editor.session.set_tile(40, 9).unwrap());
    assert!(editor.session.set_wall(9, true).unwrap());
    exchange(&mut host, &mut [&mut *editor, &mut *watcher]);

    for world in [host.session.world(), watcher.session.world()] {
        assert_eq!(world.tile(40), Some(9));
        assert!(world.is_wall(9));
    }
}
