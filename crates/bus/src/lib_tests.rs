use super::*;
use std::time::Duration;

fn fast_config() -> BusConfig {
    BusConfig {
        subscriber_capacity: 4,
        publish_timeout: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn subscriber_receives_published_value() {
    let bus: Bus<u32> = Bus::new(fast_config());
    let mut sub = bus.subscribe();
    bus.publish(7).await;
    assert_eq!(sub.recv().await, Some(7));
}

#[tokio::test]
async fn all_subscribers_receive_the_same_value() {
    let bus: Bus<u32> = Bus::new(fast_config());
    let mut a = bus.subscribe();
    let mut b = bus.subscribe();
    bus.publish(42).await;
    assert_eq!(a.recv().await, Some(42));
    assert_eq!(b.recv().await, Some(42));
}

#[tokio::test]
async fn dropping_a_subscription_unsubscribes_it() {
    let bus: Bus<u32> = Bus::new(fast_config());
    let sub = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 1);
    drop(sub);
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn a_stalled_subscriber_does_not_block_delivery_to_others() {
    let config = BusConfig {
        subscriber_capacity: 1,
        publish_timeout: Duration::from_millis(20),
    };
    let bus: Bus<u32> = Bus::new(config);
    let stalled = bus.subscribe();
    let mut healthy = bus.subscribe();

    // fill the stalled subscriber's channel without ever draining it
    bus.publish(1).await;
    // this publish should time out for `stalled` but still reach `healthy`
    bus.publish(2).await;

    assert_eq!(healthy.recv().await, Some(1));
    assert_eq!(healthy.recv().await, Some(2));
    drop(stalled);
}

#[tokio::test]
async fn publish_after_close_is_a_no_op() {
    let bus: Bus<u32> = Bus::new(fast_config());
    let mut sub = bus.subscribe();
    bus.close();
    bus.publish(99).await;
    assert_eq!(sub.recv().await, None);
}

#[tokio::test]
async fn subscribing_after_close_yields_a_channel_that_never_receives() {
    let bus: Bus<u32> = Bus::new(fast_config());
    bus.close();
    let mut sub = bus.subscribe();
    bus.publish(1).await;
    assert_eq!(sub.recv().await, None);
}
