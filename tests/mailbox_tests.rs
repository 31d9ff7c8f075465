//! Mailbox and observer tests

use tui_scene::bus::{Mailbox, MailboxError, Message, Observer, ObserverManager};

fn msg(topic: &str, content: &str) -> Message {
    Message::new(topic, "test", "", content)
}

#[test]
fn test_ping_scenario() {
    let mut mb = Mailbox::new();
    mb.create_topic("news");
    assert!(mb.subscribe("news", "alice").unwrap());
    assert!(mb.subscribe("news", "bob").unwrap());

    assert_eq!(mb.publish("news", msg("news", "ping")).unwrap(), 2);

    for consumer in ["alice", "bob"] {
        let got = mb.consume("news", consumer).unwrap().unwrap();
        assert_eq!(got.content, "ping");
        assert_eq!(got.topic, "news");
    }

    assert_eq!(
        mb.consume("news", "carol"),
        Err(MailboxError::ConsumerNotFound {
            topic: "news".into(),
            consumer: "carol".into()
        })
    );
    assert!(mb
        .consume("news", "carol")
        .unwrap_err()
        .to_string()
        .contains("not found"));
}

#[test]
fn test_fifo_per_consumer() {
    let mut mb = Mailbox::new();
    mb.create_topic("t");
    mb.subscribe("t", "c").unwrap();
    for i in 0..5 {
        mb.publish("t", msg("t", &i.to_string())).unwrap();
    }
    assert_eq!(mb.pending("t", "c").unwrap(), 5);

    let drained: Vec<String> = std::iter::from_fn(|| mb.consume("t", "c").unwrap())
        .map(|m| m.content)
        .collect();
    assert_eq!(drained, ["0", "1", "2", "3", "4"]);
    assert_eq!(mb.consume("t", "c").unwrap(), None);
}

#[test]
fn test_late_subscriber_gets_no_backlog() {
    let mut mb = Mailbox::new();
    mb.create_topic("t");
    mb.subscribe("t", "early").unwrap();
    mb.publish("t", msg("t", "before")).unwrap();

    assert!(mb.subscribe("t", "late").unwrap());
    assert!(!mb.subscribe("t", "late").unwrap());
    assert_eq!(mb.consume("t", "late").unwrap(), None);

    mb.publish("t", msg("t", "after")).unwrap();
    assert_eq!(mb.consume("t", "late").unwrap().unwrap().content, "after");
    assert_eq!(mb.pending("t", "early").unwrap(), 2);
}

#[test]
fn test_publish_rejects_mismatched_topic() {
    let mut mb = Mailbox::new();
    mb.create_topic("a");
    mb.subscribe("a", "c").unwrap();
    assert!(matches!(
        mb.publish("a", msg("b", "x")),
        Err(MailboxError::TopicMismatch { .. })
    ));
    assert_eq!(mb.pending("a", "c").unwrap(), 0);
}

#[test]
fn test_delete_topic_severs_consumers() {
    let mut mb = Mailbox::new();
    mb.create_topic("t");
    mb.create_topic("u");
    mb.subscribe("t", "c").unwrap();
    mb.subscribe("u", "c").unwrap();
    assert!(mb.is_topic_in_consumer("t", "c"));

    mb.delete_topic("t").unwrap();
    assert!(matches!(
        mb.consume("t", "c"),
        Err(MailboxError::TopicNotFound(_))
    ));
    assert!(!mb.is_topic_in_consumer("t", "c"));
    assert_eq!(mb.consumer_topics("c"), ["u".to_string()]);

    mb.unsubscribe("u", "c").unwrap();
    assert!(mb.consumer_topics("c").is_empty());

    mb.clean();
    assert!(!mb.has_topic("u"));
}

struct Log {
    name: &'static str,
    seen: Vec<String>,
}

impl PartialEq for Log {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Observer<str> for Log {
    fn notify(&mut self, subject: &str, message: &str) {
        self.seen.push(format!("{subject}:{message}"));
    }
}

#[test]
fn test_observers_notified_in_registration_order() {
    let log = |name| Log { name, seen: Vec::new() };

    let mut om = ObserverManager::new();
    assert!(om.register_observer("door", log("b")));
    assert!(om.register_observer("door", log("a")));
    assert!(!om.register_observer("door", log("a")));

    assert_eq!(om.notify_observers("door", "open"), 2);
    let order: Vec<&str> = om.observers("door").iter().map(|o| o.name).collect();
    assert_eq!(order, ["b", "a"]);
    assert!(om.observers("door").iter().all(|o| o.seen == ["door:open"]));

    assert!(om.unregister_observer("door", &log("b")));
    assert_eq!(om.notify_observers("door", "shut"), 1);
    assert_eq!(om.notify_observers("window", "shut"), 0);
}
