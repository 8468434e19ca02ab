//! Fan out a batch of actors and collect their termination records.
//!
//! [`wait_all`] spawns one linked child per input and returns each child's
//! `{address, exit}` or `{address, exception}` record, in input order no
//! matter how completion interleaves.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::actor::context::ActorContext;
use crate::actor::error::{ActorError, RtResult};
use crate::actor::lifecycle::spawn;
use crate::actor::traits::Actor;
use crate::message::Value;
use crate::shape::Shape;

/// Collector actor behind [`wait_all`].
pub struct Gather {
    children: Vec<Box<dyn Actor>>,
}

impl Gather {
    pub fn new(children: Vec<Box<dyn Actor>>) -> Self {
        Self { children }
    }
}

#[async_trait]
impl Actor for Gather {
    async fn main(&mut self, mut ctx: ActorContext) -> RtResult<Value> {
        let mut addresses = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            addresses.push(ctx.spawn_link_boxed(child));
        }

        let patterns = [
            Shape::map([("address", Shape::Address), ("exit", Shape::Any)]),
            Shape::map([("address", Shape::Address), ("exception", Shape::Any)]),
        ];

        let mut records: Vec<Option<Value>> = addresses.iter().map(|_| None).collect();
        let mut remaining = addresses.len();
        while remaining > 0 {
            let (_pattern, record) = ctx.receive(&patterns).await?;
            let sender = record
                .get("address")
                .and_then(Value::as_address)
                .cloned()
                .ok_or_else(|| {
                    ActorError::failure("InternalError", format!("malformed link record {record:?}"))
                })?;
            if let Some(position) = addresses.iter().position(|address| *address == sender) {
                if records[position].is_none() {
                    records[position] = Some(record);
                    remaining -= 1;
                }
            }
        }
        Ok(Value::List(records.into_iter().flatten().collect()))
    }
}

/// Run every actor to completion and return one termination record per
/// input, in input order.
///
/// Each record is the link message the child produced: `{address, exit}`
/// for a normal return, `{address, exception}` for a failure.
pub async fn wait_all(children: Vec<Box<dyn Actor>>) -> RtResult<Vec<Value>> {
    let collector = spawn(Gather::new(children));
    match collector.wait().await? {
        Value::List(records) => Ok(records),
        other => Err(ActorError::failure(
            "InternalError",
            format!("gather produced {other:?}"),
        )),
    }
}
