//! End-to-end runtime scenarios: spawning, supervision links, selective
//! receive, the wire envelope, and kills.

use std::time::Duration;

use async_trait::async_trait;
use castor_rt::message::{decode, encode};
use castor_rt::prelude::*;

const EXCEPTION_MARKER: &str = "Child had an exception";

/// Spawn-links one child and turns its termination record into a result:
/// the exit value on a normal return, the failure message otherwise.
struct Supervisor<A> {
    child: Option<A>,
}

impl<A: Actor> Supervisor<A> {
    fn new(child: A) -> Self {
        Self { child: Some(child) }
    }
}

#[async_trait]
impl<A: Actor> Actor for Supervisor<A> {
    async fn main(&mut self, mut ctx: ActorContext) -> RtResult<Value> {
        let child = self
            .child
            .take()
            .ok_or_else(|| ActorError::failure("InvalidState", "child already started"))?;
        let address = ctx.spawn_link(child);

        let exited = Shape::map([
            ("exit", Shape::Any),
            ("address", Shape::literal(address.clone())),
        ]);
        let failed = Shape::map([("exception", Shape::Any), ("address", Shape::literal(address))]);

        let (pattern, message) = ctx.receive(&[exited.clone(), failed]).await?;
        if pattern == exited {
            Ok(message.get("exit").cloned().unwrap_or(Value::Null))
        } else {
            let detail = message
                .get("exception")
                .and_then(|report| report.get("message"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            Ok(Value::from(detail))
        }
    }
}

#[tokio::test]
async fn returned_value_reaches_wait() {
    let address = spawn(from_fn(|_ctx| async move { Ok(Value::Int(2 + 2)) }));

    assert_eq!(address.wait().await, Ok(Value::Int(4)));
}

#[tokio::test]
async fn supervisor_sees_child_exit() {
    let supervisor = spawn(Supervisor::new(from_fn(|_ctx| async move {
        Ok(Value::from("Hi There"))
    })));

    assert_eq!(supervisor.wait().await, Ok(Value::from("Hi There")));
}

#[tokio::test]
async fn supervisor_sees_child_exception() {
    let supervisor = spawn(Supervisor::new(from_fn(|_ctx| async move {
        Err(ActorError::failure("RuntimeError", EXCEPTION_MARKER))
    })));

    assert_eq!(supervisor.wait().await, Ok(Value::from(EXCEPTION_MARKER)));
}

#[tokio::test]
async fn wait_reraises_child_failure() {
    let address = spawn(from_fn(|_ctx| async move {
        Err(ActorError::failure("RuntimeError", EXCEPTION_MARKER))
    }));

    assert_eq!(
        address.wait().await,
        Err(ActorError::failure("RuntimeError", EXCEPTION_MARKER))
    );
}

#[tokio::test]
async fn casts_from_one_sender_arrive_in_order() {
    let child = spawn(from_fn(|mut ctx| async move {
        let mut seen = Vec::new();
        for _ in 0..3 {
            let (_pattern, message) = ctx.receive(&[]).await?;
            seen.push(message);
        }
        Ok(Value::List(seen))
    }));

    for n in 1..=3_i64 {
        child.cast(Value::Int(n)).unwrap();
    }

    assert_eq!(
        child.wait().await,
        Ok(Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
    );
}

#[tokio::test]
async fn selective_receive_leaves_nonmatching_entries_in_place() {
    let child = spawn(from_fn(|mut ctx| async move {
        let mut seen = Vec::new();
        // First take the string, then drain the rest in mailbox order.
        let (_pattern, message) = ctx.receive(&[Shape::Str]).await?;
        seen.push(message);
        for _ in 0..2 {
            let (_pattern, message) = ctx.receive(&[]).await?;
            seen.push(message);
        }
        Ok(Value::List(seen))
    }));

    child.cast(Value::Int(1)).unwrap();
    child.cast(Value::Int(2)).unwrap();
    child.cast(Value::from("target")).unwrap();

    assert_eq!(
        child.wait().await,
        Ok(Value::List(vec![
            Value::from("target"),
            Value::Int(1),
            Value::Int(2)
        ]))
    );
}

#[tokio::test(start_paused = true)]
async fn receive_times_out_with_empty_mailbox() {
    let address = spawn(from_fn(|mut ctx| async move {
        for _ in 0..3 {
            let outcome = ctx.receive_timeout(&[], Duration::from_millis(10)).await?;
            if outcome.is_some() {
                return Ok(Value::Bool(false));
            }
        }
        Ok(Value::Bool(true))
    }));

    assert_eq!(address.wait().await, Ok(Value::Bool(true)));
}

#[tokio::test]
async fn zero_timeout_receive_polls_without_suspending() {
    let address = spawn(from_fn(|mut ctx| async move {
        let polled = ctx
            .receive_timeout(&[call_shape()], Duration::ZERO)
            .await?;
        Ok(Value::Bool(polled.is_none()))
    }));

    assert_eq!(address.wait().await, Ok(Value::Bool(true)));
}

#[tokio::test(start_paused = true)]
async fn kill_interrupts_a_sleeping_actor() {
    let victim = spawn(from_fn(|ctx| async move {
        ctx.sleep(Duration::from_secs(5000)).await?;
        Ok(Value::Null)
    }));

    let target = victim.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let _ = target.kill();
    });

    assert_eq!(victim.wait().await, Err(ActorError::Killed));
}

#[tokio::test]
async fn binary_blobs_survive_the_mailbox() {
    let receiver = spawn(from_fn(|mut ctx| async move {
        let (_pattern, message) = ctx.receive(&[Shape::Binary]).await?;
        Ok(message)
    }));

    receiver
        .cast(Value::Binary(Binary::new(vec![0x00, 0x4d, 0x4d, 0xff])))
        .unwrap();

    let received = receiver.wait().await.unwrap();
    let blob = received.as_binary().unwrap();
    assert_eq!(blob.as_bytes(), &[0x00, 0x4d, 0x4d, 0xff]);
    assert_eq!(blob.to_base64(), "AE1N/w==");
}

#[tokio::test]
async fn addresses_survive_the_wire_round_trip() {
    let parked = spawn(from_fn(|mut ctx| async move {
        ctx.receive(&[]).await.map(|(_pattern, message)| message)
    }));

    let message = Value::map([("reply_to", Value::Address(parked.clone()))]);
    let text = encode(&message).unwrap();
    let decoded = decode(&text).unwrap();

    assert_eq!(
        decoded.get("reply_to").and_then(Value::as_address),
        Some(&parked)
    );

    parked.cast(Value::Null).unwrap();
    parked.wait().await.unwrap();
}

#[tokio::test]
async fn cast_after_termination_fails_dead_actor() {
    let child = spawn(from_fn(|_ctx| async move { Ok(Value::Int(1)) }));
    child.wait().await.unwrap();

    assert_eq!(child.cast(Value::from("hello")), Err(ActorError::DeadActor));
    assert_eq!(child.kill(), Err(ActorError::DeadActor));
}

#[tokio::test]
async fn manual_link_delivers_exit_notice() {
    let parent = spawn(from_fn(|mut ctx| async move {
        let child = spawn(from_fn(|_ctx| async move { Ok(Value::Int(7)) }));
        child.link(&ctx, true)?;

        let notice = Shape::map([("exit", Shape::Any), ("address", Shape::Address)]);
        let (_pattern, message) = ctx.receive(&[notice]).await?;
        Ok(message.get("exit").cloned().unwrap_or(Value::Null))
    }));

    assert_eq!(parent.wait().await, Ok(Value::Int(7)));
}

#[tokio::test]
async fn wait_all_returns_records_in_input_order() {
    let children: Vec<Box<dyn Actor>> = vec![
        Box::new(from_fn(|_ctx| async move { Ok(Value::Int(1)) })),
        Box::new(from_fn(|_ctx| async move { Ok(Value::Int(2)) })),
        Box::new(from_fn(|_ctx| async move { Ok(Value::Int(3)) })),
    ];

    let records = wait_all(children).await.unwrap();

    let exits: Vec<Value> = records
        .iter()
        .map(|record| record.get("exit").cloned().unwrap())
        .collect();
    assert_eq!(exits, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[tokio::test]
async fn wait_all_keeps_order_with_mixed_outcomes() {
    let children: Vec<Box<dyn Actor>> = vec![
        Box::new(from_fn(|ctx| async move {
            // Finishes last despite being first in the input.
            ctx.cooperate().await?;
            ctx.cooperate().await?;
            Ok(Value::from("slow"))
        })),
        Box::new(from_fn(|_ctx| async move {
            Err(ActorError::failure("RuntimeError", "second failed"))
        })),
        Box::new(from_fn(|_ctx| async move { Ok(Value::from("fast")) })),
    ];

    let records = wait_all(children).await.unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].get("exit"), Some(&Value::from("slow")));
    let report = records[1].get("exception").unwrap();
    assert_eq!(report.get("kind").and_then(Value::as_str), Some("RuntimeError"));
    assert_eq!(records[2].get("exit"), Some(&Value::from("fast")));
}

#[tokio::test]
async fn matched_receive_consumes_exactly_one_entry() {
    let child = spawn(from_fn(|mut ctx| async move {
        let (_pattern, first) = ctx.receive(&[Shape::Int]).await?;
        let leftover = ctx.receive_timeout(&[], Duration::ZERO).await?;
        Ok(Value::tuple([
            first,
            Value::Bool(leftover.is_none()),
        ]))
    }));

    child.cast(Value::Int(41)).unwrap();

    assert_eq!(
        child.wait().await,
        Ok(Value::tuple([Value::Int(41), Value::Bool(true)]))
    );
}
