//! Synchronous call/response layered over asynchronous casts.
//!
//! A call casts `{call, method, address, message}` to the callee and
//! selective-receives the response, correlated by a fresh id:
//!
//! - `{response: id, message}`: the result;
//! - `{response: id, invalid_method: name}`: no such method;
//! - `{response: id, exception: report}`: the method failed.
//!
//! The caller's timeout is independent of the callee: expiry surfaces as
//! [`ActorError::CallTimeout`] on the caller, the callee keeps running, and
//! a late response simply stays in the caller's mailbox.
//!
//! The respond helpers validate the original message against the call shape
//! before replying; handing them anything else is a programmer error and
//! fails with [`ActorError::InvalidCallMessage`].

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use tracing::trace;
use uuid::Uuid;

// Layer 3: Internal module imports
use crate::actor::address::Address;
use crate::actor::context::ActorContext;
use crate::actor::error::{ActorError, RtResult};
use crate::message::Value;
use crate::shape::{is_shaped, Shape};

/// The shape of every call message.
pub fn call_shape() -> Shape {
    Shape::map([
        ("call", Shape::Str),
        ("method", Shape::Str),
        ("address", Shape::Address),
        ("message", Shape::Any),
    ])
}

/// The call shape narrowed to one method name and a payload shape.
pub fn call_shape_for(method: &str, message: Shape) -> Shape {
    Shape::map([
        ("call", Shape::Str),
        ("method", Shape::literal(method)),
        ("address", Shape::Address),
        ("message", message),
    ])
}

fn response_shape(correlation: &str) -> Shape {
    Shape::map([
        ("response", Shape::literal(correlation)),
        ("message", Shape::Any),
    ])
}

fn exception_shape(correlation: &str) -> Shape {
    Shape::map([
        ("response", Shape::literal(correlation)),
        ("exception", Shape::Any),
    ])
}

fn invalid_method_shape(correlation: &str) -> Shape {
    Shape::map([
        ("response", Shape::literal(correlation)),
        ("invalid_method", Shape::Str),
    ])
}

pub(crate) async fn call(
    ctx: &mut ActorContext,
    target: &Address,
    method: &str,
    message: Value,
    timeout: Option<Duration>,
) -> RtResult<Value> {
    let correlation = Uuid::new_v4().to_string();
    trace!(%correlation, method, "call");
    target.cast(Value::map([
        ("call", Value::from(correlation.clone())),
        ("method", Value::from(method)),
        ("address", Value::Address(ctx.address())),
        ("message", message),
    ]))?;

    let exception = exception_shape(&correlation);
    let invalid = invalid_method_shape(&correlation);
    let patterns = [
        response_shape(&correlation),
        exception.clone(),
        invalid.clone(),
    ];

    let (pattern, mut reply) = match timeout {
        Some(duration) => ctx
            .receive_timeout(&patterns, duration)
            .await?
            .ok_or(ActorError::CallTimeout(duration))?,
        None => ctx.receive(&patterns).await?,
    };

    if pattern == invalid {
        let name = reply
            .get("invalid_method")
            .and_then(Value::as_str)
            .unwrap_or(method)
            .to_owned();
        return Err(ActorError::InvalidMethod(name));
    }
    if pattern == exception {
        let payload = reply.take("exception").unwrap_or(Value::Null);
        return Err(ActorError::RemoteFailure(payload));
    }
    Ok(reply.take("message").unwrap_or(Value::Null))
}

/// A call being assembled; built by [`Address::request`].
///
/// # Example
///
/// ```rust,ignore
/// let cycle = worker
///     .request("get_cycle")
///     .timeout(Duration::from_secs(1))
///     .send(&mut ctx)
///     .await?;
/// ```
#[must_use = "a call request does nothing until sent"]
pub struct CallRequest<'a> {
    target: &'a Address,
    method: String,
    message: Value,
    timeout: Option<Duration>,
}

impl<'a> CallRequest<'a> {
    pub(crate) fn new(target: &'a Address, method: impl Into<String>) -> Self {
        Self {
            target,
            method: method.into(),
            message: Value::Null,
            timeout: None,
        }
    }

    /// Attach a payload (default: null).
    pub fn message(mut self, message: impl Into<Value>) -> Self {
        self.message = message.into();
        self
    }

    /// Bound the wait for the response.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Perform the call.
    pub async fn send(self, ctx: &mut ActorContext) -> RtResult<Value> {
        call(ctx, self.target, &self.method, self.message, self.timeout).await
    }
}

/// Reply to `origin` with a result.
pub fn respond(origin: &Value, response: Value) -> RtResult<()> {
    let (caller, correlation) = validate(origin)?;
    caller.cast(Value::map([
        ("response", Value::from(correlation)),
        ("message", response),
    ]))
}

/// Reply to `origin` that `method` is not exposed.
pub fn respond_invalid_method(origin: &Value, method: &str) -> RtResult<()> {
    let (caller, correlation) = validate(origin)?;
    caller.cast(Value::map([
        ("response", Value::from(correlation)),
        ("invalid_method", Value::from(method)),
    ]))
}

/// Reply to `origin` with a formatted failure.
pub fn respond_exception(origin: &Value, report: Value) -> RtResult<()> {
    let (caller, correlation) = validate(origin)?;
    caller.cast(Value::map([
        ("response", Value::from(correlation)),
        ("exception", report),
    ]))
}

fn validate(origin: &Value) -> RtResult<(Address, String)> {
    if !is_shaped(origin, &call_shape()) {
        return Err(ActorError::InvalidCallMessage(format!("{origin:?}")));
    }
    let caller = origin
        .get("address")
        .and_then(Value::as_address)
        .cloned()
        .ok_or_else(|| ActorError::InvalidCallMessage(format!("{origin:?}")))?;
    let correlation = origin
        .get("call")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ActorError::InvalidCallMessage(format!("{origin:?}")))?;
    Ok((caller, correlation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::lifecycle::spawn;
    use crate::actor::traits::from_fn;

    #[test]
    fn test_respond_rejects_non_call_messages() {
        assert!(matches!(
            respond(&Value::Int(1), Value::Null),
            Err(ActorError::InvalidCallMessage(_))
        ));
        // A map missing the correlation id is not a call either.
        let not_a_call = Value::map([("method", Value::from("foo"))]);
        assert!(matches!(
            respond_invalid_method(&not_a_call, "foo"),
            Err(ActorError::InvalidCallMessage(_))
        ));
        assert!(matches!(
            respond_exception(&not_a_call, Value::Null),
            Err(ActorError::InvalidCallMessage(_))
        ));
    }

    #[tokio::test]
    async fn test_call_shapes_match_call_messages() {
        // Park an actor so its address can appear inside a message.
        let parked = spawn(from_fn(|mut ctx| async move {
            let (_pattern, message) = ctx.receive(&[]).await?;
            Ok(message)
        }));

        let message = Value::map([
            ("call", Value::from("corr-1")),
            ("method", Value::from("meth1")),
            ("address", Value::Address(parked.clone())),
            ("message", Value::Null),
        ]);

        assert!(is_shaped(&message, &call_shape()));
        assert!(is_shaped(&message, &call_shape_for("meth1", Shape::Any)));
        assert!(!is_shaped(&message, &call_shape_for("meth2", Shape::Any)));
        assert!(is_shaped(
            &message,
            &call_shape_for("meth1", Shape::literal(Value::Null))
        ));
        assert!(!is_shaped(&message, &call_shape_for("meth1", Shape::Int)));

        // Unpark and shut down cleanly.
        parked.cast(Value::Null).unwrap();
        parked.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_response_shapes_are_keyed_by_correlation() {
        let reply = Value::map([
            ("response", Value::from("corr-7")),
            ("message", Value::from("hi")),
        ]);

        assert!(is_shaped(&reply, &response_shape("corr-7")));
        assert!(!is_shaped(&reply, &response_shape("corr-8")));
        assert!(!is_shaped(&reply, &exception_shape("corr-7")));
        assert!(!is_shaped(&reply, &invalid_method_shape("corr-7")));
    }
}
