use log::{info, warn};
use tokio::{
    sync::{mpsc, watch},
    task::{self, JoinHandle},
    time::{self, MissedTickBehavior},
};

use crate::{
    outbound::{OutboundQueue, OutboundSender, Outgoing, SendProgress},
    session::{Authority, Session},
    transport::{PacketReceiver, PacketSender},
    types::ConnectionId,
};

enum SenderCommand {
    Send(Outgoing),
    Disconnect(ConnectionId),
}

/// Drives `session` until it ends or `shutdown` turns `true`, then hands it back.
///
/// A tick task owns the session and the receive half; a sender task owns the
/// send half. They are joined by a bounded channel, so a slow transport
/// backs up into the tick task rather than growing the queue without limit.
pub async fn run<A: Authority>(
    mut session: Session<A>,
    sender: Box<dyn PacketSender>,
    mut receiver: Box<dyn PacketReceiver>,
    mut shutdown: watch::Receiver<bool>,
) -> Session<A> {
    let capacity = session.config().outbound_capacity.max(1);
    let (commands, command_receiver) = mpsc::channel(capacity);
    let sender_task = spawn_sender(sender, command_receiver);

    let mut ticker = time::interval(session.config().tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    info!("Shutdown handle dropped");
                    break;
                }
            }
        }
        if *shutdown.borrow() {
            info!("Shutdown requested");
            break;
        }

        loop {
            match receiver.receive() {
                Ok(Some(event)) => session.handle_event(event),
                Ok(None) => break,
                Err(error) => {
                    session.notify_receive_error(error);
                    break;
                }
            }
        }

        session.tick();

        let mut forwarded = true;
        for connection in session.take_disconnects() {
            forwarded &= commands
                .send(SenderCommand::Disconnect(connection))
                .await
                .is_ok();
        }
        for outgoing in session.take_outgoing() {
            forwarded &= commands.send(SenderCommand::Send(outgoing)).await.is_ok();
        }
        if !forwarded {
            warn!("Sender task stopped early; outbound messages were lost");
            break;
        }

        if session.is_ended() {
            info!("Session ended");
            break;
        }
    }

    drop(commands);
    if let Err(error) = sender_task.await {
        warn!("Sender task failed: {}", error);
    }
    session
}

fn spawn_sender(
    transport: Box<dyn PacketSender>,
    mut commands: mpsc::Receiver<SenderCommand>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut queue = OutboundQueue::new();
        let mut sender = OutboundSender::new();

        while let Some(command) = commands.recv().await {
            match command {
                SenderCommand::Send(outgoing) => queue.push(outgoing),
                SenderCommand::Disconnect(connection) => {
                    flush(&mut queue, &mut sender, transport.as_ref()).await;
                    transport.disconnect(connection);
                    continue;
                }
            }
            flush(&mut queue, &mut sender, transport.as_ref()).await;
        }

        flush(&mut queue, &mut sender, transport.as_ref()).await;
    })
}

async fn flush(queue: &mut OutboundQueue, sender: &mut OutboundSender, transport: &dyn PacketSender) {
    loop {
        match sender.step(queue, transport) {
            SendProgress::Idle => return,
            SendProgress::Delivered => {}
            SendProgress::Retry { .. } => task::yield_now().await,
        }
    }
}
