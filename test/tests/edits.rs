//! Stroke authorization, self-echo suppression, bitmap saves and host-originated messages.

use tilesync_shared::{Color32, Message, Stroke};
use tilesync_test::{exchange, host_with_peers, init_logging, LocalHub};

#[test]
fn strokes_need_the_lock() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(holder, _), (intruder, intruder_id)] = &mut peers[..] else {
        unreachable!();
    };
    holder.session.request_lock(8).unwrap();
    exchange(&mut host, &mut [&mut *holder, &mut *intruder]);

    // a local stroke without an edit session is refused outright
    let stroke = Stroke::new((0, 0), (31, 0), 9, 1);
    assert!(!intruder.session.stroke(8, stroke).unwrap());

    // a forged one reaching the host is discarded and not relayed
    let forged = Message::TileStroke { tile: 8, stroke }.encode().unwrap();
    host.session.receive_payload(*intruder_id, &forged);
    assert!(host.session.context().outbound().is_empty());
    assert!(host
        .session
        .world()
        .tile_bitmap(8)
        .unwrap()
        .pixels()
        .iter()
        .all(|&pixel| pixel == 0));
}

#[test]
fn authorized_stroke_reaches_everyone() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(holder, _), (watcher, _)] = &mut peers[..] else {
        unreachable!();
    };
    holder.session.request_lock(8).unwrap();
    exchange(&mut host, &mut [&mut *holder, &mut *watcher]);

    let drew = holder
        .session
        .draw_line(8, (0, 2), (5, 2), Color32::opaque(255, 0, 77), 1)
        .unwrap();
    assert!(drew);
    exchange(&mut host, &mut [&mut *holder, &mut *watcher]);

    let row: Vec<u8> = (0..7).map(|x| host.session.world().tile_bitmap(8).unwrap().get(x, 2).unwrap()).collect();
    assert_eq!(row, vec![9, 9, 9, 9, 9, 9, 0]);
    assert_eq!(
        watcher.session.world().tile_bitmap(8),
        host.session.world().tile_bitmap(8)
    );
    assert_eq!(
        holder.session.world().tile_bitmap(8),
        host.session.world().tile_bitmap(8)
    );
}

#[test]
fn chunks_for_a_tile_under_edit_are_dropped() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 1);
    let (peer, peer_id) = &mut peers[0];
    peer.session.request_lock(4).unwrap();
    exchange(&mut host, &mut [&mut *peer]);
    assert!(peer.session.is_editing(4));

    let echo = Message::TileChunk {
        tile: 4,
        offset: 0,
        pixels: vec![7; 16],
    };
    host.session.context_mut().send_to(*peer_id, &echo).unwrap();
    exchange(&mut host, &mut [&mut *peer]);
    assert_eq!(peer.session.world().tile_bitmap(4).unwrap().get(0, 0), Some(0));

    let image = Message::TileImage {
        tile: 4,
        pixels: vec![3; 1024],
    };
    host.session.context_mut().send_to(*peer_id, &image).unwrap();
    exchange(&mut host, &mut [&mut *peer]);
    assert_eq!(peer.session.world().tile_bitmap(4).unwrap().get(0, 0), Some(0));

    // once released, the same chunk applies
    peer.session.release_lock(4).unwrap();
    exchange(&mut host, &mut [&mut *peer]);
    host.session.context_mut().send_to(*peer_id, &echo).unwrap();
    exchange(&mut host, &mut [&mut *peer]);
    assert_eq!(peer.session.world().tile_bitmap(4).unwrap().get(0, 0), Some(7));
}

#[test]
fn saving_a_tile_sends_every_chunk() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(holder, _), (watcher, _)] = &mut peers[..] else {
        unreachable!();
    };
    holder.session.request_lock(10).unwrap();
    exchange(&mut host, &mut [&mut *holder, &mut *watcher]);

    // draw locally without broadcasting, then save the whole tile
    let bitmap = holder
        .session
        .context_mut()
        .world_mut()
        .tile_bitmap_mut(10)
        .unwrap();
    for x in 0..32 {
        bitmap.set(x, x, 11);
    }
    assert!(holder.session.save_tile(10).unwrap());
    // 1024 pixels at 128 per chunk
    assert_eq!(holder.session.context().outbound().len(), 8);
    exchange(&mut host, &mut [&mut *holder, &mut *watcher]);

    assert_eq!(
        watcher.session.world().tile_bitmap(10),
        holder.session.world().tile_bitmap(10)
    );
    assert_eq!(watcher.session.world().tile_bitmap(10).unwrap().get(31, 31), Some(11));
}

#[test]
fn save_then_release_lands_before_the_release() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(holder, _), (watcher, _)] = &mut peers[..] else {
        unreachable!();
    };
    holder.session.request_lock(10).unwrap();
    exchange(&mut host, &mut [&mut *holder, &mut *watcher]);

    let bitmap = holder
        .session
        .context_mut()
        .world_mut()
        .tile_bitmap_mut(10)
        .unwrap();
    for x in 0..32 {
        bitmap.set(x, x, 11);
    }
    // both go out in the same flush
    assert!(holder.session.save_tile(10).unwrap());
    holder.session.release_lock(10).unwrap();
    exchange(&mut host, &mut [&mut *holder, &mut *watcher]);

    assert_eq!(host.session.world().tile_bitmap(10).unwrap().get(31, 31), Some(11));
    assert_eq!(watcher.session.world().tile_bitmap(10).unwrap().get(31, 31), Some(11));
    assert_eq!(
        watcher.session.world().tile_bitmap(10),
        holder.session.world().tile_bitmap(10)
    );
    assert!(!host.session.locks().is_locked(10));
    assert!(!watcher.session.locks().is_locked(10));
    assert!(!holder.session.is_editing(10));
}

#[test]
fn strokes_and_chunks_on_one_tile_apply_in_order() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 2);
    let [(holder, _), (watcher, _)] = &mut peers[..] else {
        unreachable!();
    };
    holder.session.request_lock(6).unwrap();
    exchange(&mut host, &mut [&mut *holder, &mut *watcher]);

    // row 0 filled, a vertical stroke over it, then row 1 filled over the stroke
    assert!(holder.session.send_tile_chunk(6, 0, vec![4; 32]).unwrap());
    assert!(holder
        .session
        .stroke(6, Stroke::new((0, 0), (0, 3), 9, 1))
        .unwrap());
    assert!(holder.session.send_tile_chunk(6, 32, vec![12; 16]).unwrap());
    exchange(&mut host, &mut [&mut *holder, &mut *watcher]);

    let expected = holder.session.world().tile_bitmap(6).unwrap().clone();
    assert_eq!(expected.get(0, 0), Some(9));
    assert_eq!(expected.get(5, 0), Some(4));
    assert_eq!(expected.get(0, 1), Some(12));
    assert_eq!(expected.get(0, 2), Some(9));
    assert_eq!(host.session.world().tile_bitmap(6), Ok(&expected));
    assert_eq!(watcher.session.world().tile_bitmap(6), Ok(&expected));
}

#[test]
fn peers_cannot_send_host_messages() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, peers) = host_with_peers(&hub, 1);
    let peer_id = peers[0].1;
    let before = host.session.world().tilemap().to_vec();

    let forged = Message::Tilemap {
        tiles: vec![5; 1024],
    }
    .encode()
    .unwrap();
    host.session.receive_payload(peer_id, &forged);

    let destroy = Message::DestroyAvatar { id: 0 }.encode().unwrap();
    host.session.receive_payload(peer_id, &destroy);

    assert_eq!(host.session.world().tilemap(), &before[..]);
    assert!(host.session.world().has_avatar(0));
}

#[test]
fn tileset_pages_apply_on_peers() {
    init_logging();
    let hub = LocalHub::new();
    let (mut host, mut peers) = host_with_peers(&hub, 1);
    let (peer, peer_id) = &mut peers[0];

    let mut pixels = vec![1; 1024];
    pixels.extend(vec![2; 1024]);
    let page = Message::Tileset { id: 30, pixels };
    host.session.context_mut().send_to(*peer_id, &page).unwrap();
    exchange(&mut host, &mut [&mut *peer]);

    assert_eq!(peer.session.world().tile_bitmap(30).unwrap().get(5, 5), Some(1));
    assert_eq!(peer.session.world().tile_bitmap(31).unwrap().get(5, 5), Some(2));
}
