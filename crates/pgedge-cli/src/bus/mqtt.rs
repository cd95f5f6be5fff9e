use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::{BrokerConfig, BusError, Publisher};

const KEEP_ALIVE: Duration = Duration::from_secs(30);
const REQUEST_CAPACITY: usize = 64;
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

/// MQTT publisher with a background task driving the event loop.
///
/// QoS 0 has no broker acknowledgement, so a publish counts as delivered
/// once the event loop has written it to the connection. If the connection
/// drops first, the publish fails with the event loop's error.
pub struct MqttPublisher {
    client: AsyncClient,
    driver: JoinHandle<()>,
    delivery: DeliveryTracker,
}

impl MqttPublisher {
    /// Connect with a clean session and wait for the broker's CONNACK, at
    /// most `cfg.connect_timeout`.
    pub async fn connect(cfg: &BrokerConfig) -> Result<Self, BusError> {
        let mut opts = MqttOptions::new(cfg.client_id.clone(), cfg.host.clone(), cfg.port);
        opts.set_clean_session(true);
        opts.set_keep_alive(KEEP_ALIVE);

        let (client, mut eventloop) = AsyncClient::new(opts, REQUEST_CAPACITY);

        let broker = cfg.address();
        debug!(broker = %broker, client_id = %cfg.client_id, "connecting to mqtt broker");
        match tokio::time::timeout(cfg.connect_timeout, wait_for_connack(&mut eventloop)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(BusError::Connect {
                    broker,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(BusError::Connect {
                    broker,
                    reason: format!("no CONNACK within {:?}", cfg.connect_timeout),
                })
            }
        }
        debug!(broker = %broker, "mqtt connection established");

        let (state_tx, state_rx) = watch::channel(DeliveryState::default());
        let driver = tokio::spawn(drive(eventloop, state_tx));
        Ok(Self {
            client,
            driver,
            delivery: DeliveryTracker::new(state_rx),
        })
    }

    /// Flush queued messages, send DISCONNECT and stop the event loop.
    pub async fn disconnect(self) {
        if let Err(e) = self.client.disconnect().await {
            debug!(error = %e, "mqtt disconnect request not delivered");
        }
        if tokio::time::timeout(DRAIN_TIMEOUT, self.driver).await.is_err() {
            debug!("mqtt event loop did not stop in time");
        }
    }
}

impl Publisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        let failed = |reason: String| BusError::Publish {
            topic: topic.to_string(),
            source: reason.into(),
        };

        let target = self.delivery.enqueue();
        if let Err(e) = self
            .client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await
        {
            self.delivery.forget();
            return Err(BusError::Publish {
                topic: topic.to_string(),
                source: Box::new(e),
            });
        }

        self.delivery
            .delivered(target, PUBLISH_TIMEOUT)
            .await
            .map_err(failed)
    }
}

/// What the event loop driver has observed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DeliveryState {
    written: u64,
    lost: Option<String>,
}

/// Pairs each queued publish with the driver's count of written publishes.
///
/// Publishes go out in request order, so the n-th queued publish is
/// delivered once `written >= n`.
#[derive(Debug)]
struct DeliveryTracker {
    queued: AtomicU64,
    state: watch::Receiver<DeliveryState>,
}

impl DeliveryTracker {
    fn new(state: watch::Receiver<DeliveryState>) -> Self {
        Self {
            queued: AtomicU64::new(0),
            state,
        }
    }

    /// Reserve the next sequence number.
    fn enqueue(&self) -> u64 {
        self.queued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Give back a sequence number whose request never reached the loop.
    fn forget(&self) {
        self.queued.fetch_sub(1, Ordering::SeqCst);
    }

    async fn delivered(&self, target: u64, within: Duration) -> Result<(), String> {
        let mut rx = self.state.clone();
        let wait = rx.wait_for(|s| s.written >= target || s.lost.is_some());

        let state = match tokio::time::timeout(within, wait).await {
            Ok(Ok(state)) => state.clone(),
            Ok(Err(_)) => return Err("mqtt event loop stopped before the message was written".into()),
            Err(_) => return Err(format!("message not written within {within:?}")),
        };

        if state.written >= target {
            return Ok(());
        }
        match state.lost {
            Some(reason) => Err(format!("mqtt connection lost: {reason}")),
            None => Err("mqtt event loop stopped before the message was written".into()),
        }
    }
}

async fn wait_for_connack(eventloop: &mut EventLoop) -> Result<(), ConnectionError> {
    loop {
        if let Event::Incoming(Packet::ConnAck(ack)) = eventloop.poll().await? {
            trace!(?ack, "connack");
            return Ok(());
        }
    }
}

async fn drive(mut eventloop: EventLoop, state: watch::Sender<DeliveryState>) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Outgoing(Outgoing::Disconnect)) => break,
            Ok(Event::Outgoing(Outgoing::Publish(pkid))) => {
                trace!(pkid, "publish written");
                state.send_modify(|s| s.written += 1);
            }
            Ok(event) => trace!(?event, "mqtt event"),
            Err(e) => {
                warn!(error = %e, "mqtt connection lost");
                state.send_modify(|s| s.lost = Some(e.to_string()));
                break;
            }
        }
    }
}
