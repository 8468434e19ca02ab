//! Spawn, run protocol, and exit propagation.
//!
//! Spawning registers a fresh cell, installs any requested link, and hands
//! the body to the scheduler as a new task. The parent finishes its
//! post-spawn statements before the child's first poll (current-thread
//! scheduling), so links and recorded addresses are always in place when
//! child code runs.
//!
//! When the body returns, the runner propagates the outcome:
//!
//! - normal return `Ok(v)`: every exit link receives `{address, exit: v}`,
//!   in registration order;
//! - failure `Err(e)`: every alink receives `{address, exception: report}`,
//!   in registration order, where the report is the transport-safe
//!   formatting of `e`.
//!
//! Only then does the exit slot complete (a `wait` return happens-after
//! the link notifications are enqueued), and only then is the actor
//! deregistered, so the notifications themselves can still encode its
//! address.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tracing::{debug, error};

// Layer 3: Internal module imports
use super::address::Address;
use super::cell::ActorCell;
use super::context::ActorContext;
use super::error::{FailureReport, RtResult};
use super::registry;
use super::traits::Actor;
use crate::message::Value;

/// When set, every actor failure is logged at ERROR level, whether or not
/// a supervisor handles it. Off by default; failures then log at DEBUG.
static VERBOSE_FAILURES: AtomicBool = AtomicBool::new(false);

/// Toggle verbose failure logging for the whole process.
pub fn set_verbose_failures(enabled: bool) {
    VERBOSE_FAILURES.store(enabled, Ordering::SeqCst);
}

fn verbose_failures() -> bool {
    VERBOSE_FAILURES.load(Ordering::SeqCst)
}

/// Start a new actor and return its address.
///
/// The body is queued on the scheduler and runs after the caller next
/// yields; use the returned address to link, cast, call, or wait.
pub fn spawn<A: Actor>(actor: A) -> Address {
    spawn_boxed(Box::new(actor), None)
}

pub(crate) fn spawn_boxed(actor: Box<dyn Actor>, link_to: Option<Address>) -> Address {
    let cell = ActorCell::create();
    registry::register(&cell);
    if let Some(parent) = link_to {
        cell.add_link(parent, true);
    }
    let address = Address::from_cell(&cell);
    debug!(actor_id = %cell.actor_id(), "spawn");
    tokio::spawn(run(cell, actor));
    address
}

async fn run(cell: Arc<ActorCell>, mut actor: Box<dyn Actor>) {
    let ctx = ActorContext::new(Arc::clone(&cell));
    let outcome = actor.main(ctx).await;
    finish(&cell, outcome);
}

fn finish(cell: &Arc<ActorCell>, outcome: RtResult<Value>) {
    let address = Address::from_cell(cell);
    let id = cell.actor_id();
    match &outcome {
        Ok(result) => {
            debug!(actor_id = %id, "actor exited");
            for link in cell.exit_links() {
                let notice = Value::map([
                    ("address", Value::Address(address.clone())),
                    ("exit", result.clone()),
                ]);
                if let Err(cast_error) = link.cast(notice) {
                    debug!(actor_id = %id, %cast_error, "dropping exit notice");
                }
            }
        }
        Err(failure) => {
            if verbose_failures() {
                error!(actor_id = %id, %failure, "actor failed");
            } else {
                debug!(actor_id = %id, %failure, "actor failed");
            }
            let report = FailureReport::from_error(failure).to_value();
            for link in cell.alinks() {
                let notice = Value::map([
                    ("address", Value::Address(address.clone())),
                    ("exception", report.clone()),
                ]);
                if let Err(cast_error) = link.cast(notice) {
                    debug!(actor_id = %id, %cast_error, "dropping exception notice");
                }
            }
        }
    }
    cell.exit().complete(outcome);
    cell.mark_dead();
    registry::deregister(&cell.actor_id());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::error::ActorError;
    use crate::actor::traits::from_fn;

    #[tokio::test]
    async fn test_spawn_and_wait_for_result() {
        let address = spawn(from_fn(|_ctx| async move { Ok(Value::Int(2 + 2)) }));

        assert_eq!(address.wait().await, Ok(Value::Int(4)));
    }

    #[tokio::test]
    async fn test_wait_reraises_failure() {
        let address = spawn(from_fn(|_ctx| async move {
            Err(ActorError::failure("RuntimeError", "boom"))
        }));

        assert_eq!(
            address.wait().await,
            Err(ActorError::failure("RuntimeError", "boom"))
        );
    }

    #[tokio::test]
    async fn test_terminated_actor_goes_dead() {
        let address = spawn(from_fn(|_ctx| async move { Ok(Value::Null) }));
        let id = address.actor_id().unwrap();

        address.wait().await.unwrap();
        // The registry entry and the address die together.
        assert_eq!(Address::lookup(id.as_str()), Err(ActorError::DeadActor));
        assert_eq!(address.cast(Value::Null), Err(ActorError::DeadActor));
    }

    #[tokio::test]
    async fn test_parent_statements_run_before_child() {
        // The child reads a message the parent casts after spawning;
        // deferred start means the cast always lands first.
        let child = spawn(from_fn(|mut ctx| async move {
            let (_pattern, message) = ctx.receive(&[]).await?;
            Ok(message)
        }));

        child.cast(Value::from("after-spawn")).unwrap();
        assert_eq!(child.wait().await, Ok(Value::from("after-spawn")));
    }

    #[tokio::test]
    async fn test_rename_rekeys_registry() {
        let address = spawn(from_fn(|mut ctx| async move {
            ctx.rename("well-known-name");
            let (_pattern, message) = ctx.receive(&[]).await?;
            Ok(message)
        }));

        // Let the child run its rename.
        tokio::task::yield_now().await;

        let by_name = Address::lookup("well-known-name").unwrap();
        assert_eq!(by_name, address);
        by_name.cast(Value::Int(1)).unwrap();
        assert_eq!(address.wait().await, Ok(Value::Int(1)));
    }
}
