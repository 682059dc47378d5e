//! Service construction and the typed-to-erased method bridge.
//!
//! A [`Service`] is a named group of methods built with [`ServiceBuilder`].
//! Each method is a typed closure; registration erases it behind a
//! [`MethodHandle`] that allocates fresh argument and reply instances per
//! call, so concurrent requests to the same method never share state.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::RequestContext;
use crate::error::MethodError;

/// Outcome of invoking an erased method handle.
pub(crate) enum MethodOutcome {
    /// Handler succeeded; the serialized reply.
    Reply(Value),
    /// The argument payload did not decode into the declared argument type.
    InvalidParams(String),
    /// Handler returned an error. The zero-valued reply travels with it for
    /// codecs whose error envelope carries result fields.
    Fault {
        error: MethodError,
        zero_reply: Value,
    },
    /// The reply failed to serialize.
    ReplyEncode(String),
}

type ErasedMethod = Box<dyn Fn(&RequestContext, Option<&Value>) -> MethodOutcome + Send + Sync>;

/// Type-erased, invocable handle to one registered method.
pub struct MethodHandle {
    invoke: ErasedMethod,
}

impl MethodHandle {
    pub(crate) fn call(&self, ctx: &RequestContext, params: Option<&Value>) -> MethodOutcome {
        (self.invoke)(ctx, params)
    }
}

/// A named group of methods, registered with the server as a unit.
pub struct Service {
    name: String,
    methods: HashMap<String, MethodHandle>,
}

impl Service {
    /// Start building a service registered under `name`.
    pub fn builder(name: impl Into<String>) -> ServiceBuilder {
        ServiceBuilder {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn method(&self, name: &str) -> Option<&MethodHandle> {
        self.methods.get(name)
    }

    pub(crate) fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub(crate) fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

/// Builder collecting typed method closures for one service.
pub struct ServiceBuilder {
    name: String,
    methods: HashMap<String, MethodHandle>,
}

impl ServiceBuilder {
    /// Bind `handler` as `<service>.<name>`.
    ///
    /// The closure receives the request context and a freshly decoded
    /// argument instance, and returns either the reply or an application
    /// error. The reply type's `Default` supplies the zero-valued result
    /// written into error envelopes. Binding the same method name twice
    /// keeps the later handler.
    pub fn method<A, R, F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        A: DeserializeOwned,
        R: Serialize + Default,
        F: Fn(&RequestContext, A) -> Result<R, MethodError> + Send + Sync + 'static,
    {
        let erased: ErasedMethod = Box::new(move |ctx, params| {
            let Some(params) = params else {
                return MethodOutcome::InvalidParams("missing argument payload".to_string());
            };
            let args: A = match serde_json::from_value(params.clone()) {
                Ok(args) => args,
                Err(e) => return MethodOutcome::InvalidParams(e.to_string()),
            };
            match handler(ctx, args) {
                Ok(reply) => match serde_json::to_value(&reply) {
                    Ok(value) => MethodOutcome::Reply(value),
                    Err(e) => MethodOutcome::ReplyEncode(e.to_string()),
                },
                Err(error) => MethodOutcome::Fault {
                    error,
                    zero_reply: serde_json::to_value(R::default()).unwrap_or(Value::Null),
                },
            }
        });
        self.methods.insert(name.into(), MethodHandle { invoke: erased });
        self
    }

    /// Finish the service. Emptiness and name collisions are checked at
    /// registration time, not here.
    pub fn build(self) -> Service {
        Service {
            name: self.name,
            methods: self.methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Method};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct MultiplyArgs {
        a: i64,
        b: i64,
    }

    #[derive(Serialize, Default)]
    struct MultiplyReply {
        product: i64,
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Method::POST, "/rpc".parse().unwrap(), HeaderMap::new())
    }

    fn multiply_service() -> Service {
        Service::builder("Arith")
            .method("Multiply", |_ctx: &RequestContext, args: MultiplyArgs| {
                Ok::<_, MethodError>(MultiplyReply {
                    product: args.a * args.b,
                })
            })
            .build()
    }

    #[test]
    fn test_builder_records_methods() {
        let service = multiply_service();
        assert_eq!(service.name(), "Arith");
        assert_eq!(service.method_count(), 1);
        assert!(service.method("Multiply").is_some());
        assert!(service.method("Divide").is_none());
    }

    #[test]
    fn test_invoke_decodes_and_replies() {
        let service = multiply_service();
        let handle = service.method("Multiply").unwrap();

        let outcome = handle.call(&ctx(), Some(&json!({"a": 4, "b": 2})));
        match outcome {
            MethodOutcome::Reply(value) => assert_eq!(value, json!({"product": 8})),
            _ => panic!("expected a reply"),
        }
    }

    #[test]
    fn test_invoke_missing_payload() {
        let service = multiply_service();
        let handle = service.method("Multiply").unwrap();

        let outcome = handle.call(&ctx(), None);
        assert!(matches!(outcome, MethodOutcome::InvalidParams(_)));
    }

    #[test]
    fn test_invoke_undecodable_payload() {
        let service = multiply_service();
        let handle = service.method("Multiply").unwrap();

        let outcome = handle.call(&ctx(), Some(&json!({"a": "four"})));
        assert!(matches!(outcome, MethodOutcome::InvalidParams(_)));
    }

    #[test]
    fn test_invoke_fault_carries_zero_reply() {
        let service = Service::builder("Arith")
            .method("Fail", |_ctx: &RequestContext, _args: MultiplyArgs| {
                Err::<MultiplyReply, _>(MethodError::new("response error"))
            })
            .build();
        let handle = service.method("Fail").unwrap();

        let outcome = handle.call(&ctx(), Some(&json!({"a": 1, "b": 2})));
        match outcome {
            MethodOutcome::Fault { error, zero_reply } => {
                assert_eq!(error.message(), "response error");
                assert_eq!(zero_reply, json!({"product": 0}));
            }
            _ => panic!("expected a fault"),
        }
    }

    #[test]
    fn test_duplicate_method_keeps_later_binding() {
        let service = Service::builder("Arith")
            .method("Answer", |_ctx: &RequestContext, _args: Value| {
                Ok::<_, MethodError>(json!(1))
            })
            .method("Answer", |_ctx: &RequestContext, _args: Value| {
                Ok::<_, MethodError>(json!(2))
            })
            .build();
        assert_eq!(service.method_count(), 1);

        let outcome = service
            .method("Answer")
            .unwrap()
            .call(&ctx(), Some(&json!({})));
        match outcome {
            MethodOutcome::Reply(value) => assert_eq!(value, json!(2)),
            _ => panic!("expected a reply"),
        }
    }

    #[test]
    fn test_each_call_gets_fresh_arguments() {
        let service = multiply_service();
        let handle = service.method("Multiply").unwrap();

        for (a, b, product) in [(2, 3, 6), (5, 5, 25), (0, 9, 0)] {
            let outcome = handle.call(&ctx(), Some(&json!({"a": a, "b": b})));
            match outcome {
                MethodOutcome::Reply(value) => assert_eq!(value, json!({"product": product})),
                _ => panic!("expected a reply"),
            }
        }
    }
}
