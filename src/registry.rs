//! Service registry: dotted method names resolved to invocable handles.

use std::collections::HashMap;

use crate::error::RegistrationError;
use crate::service::{MethodHandle, Service};

/// Separator between the service and method parts of a full method name.
const SEPARATOR: char = '.';

/// The set of registered services.
///
/// Registration borrows mutably and resolution borrows shared, so the
/// setup-then-serve ordering is enforced by the borrow system; once the map
/// sits behind a shared reference it is immutable and lock-free to read.
#[derive(Default)]
pub struct ServiceMap {
    services: HashMap<String, Service>,
}

impl ServiceMap {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `service` under its own name.
    ///
    /// Rejects services with no methods and names that are already taken.
    /// A rejected registration leaves the map untouched.
    pub fn register(&mut self, service: Service) -> Result<(), RegistrationError> {
        if service.is_empty() {
            return Err(RegistrationError::NoMethods(service.name().to_string()));
        }
        if self.services.contains_key(service.name()) {
            return Err(RegistrationError::DuplicateService(
                service.name().to_string(),
            ));
        }
        tracing::debug!(
            service = %service.name(),
            methods = service.method_count(),
            "service registered"
        );
        self.services.insert(service.name().to_string(), service);
        Ok(())
    }

    /// Whether `full` (exactly `Service.Method`) resolves to a handle.
    /// Pure lookup, usable for diagnostics without performing a call.
    pub fn has_method(&self, full: &str) -> bool {
        self.resolve(full).is_some()
    }

    /// Resolve a dotted name to its method handle.
    ///
    /// Matching is exact and case-sensitive. Anything other than exactly one
    /// separator fails, as does an unknown service or method.
    pub fn resolve(&self, full: &str) -> Option<&MethodHandle> {
        let (service, method) = full.split_once(SEPARATOR)?;
        if service.is_empty() || method.is_empty() || method.contains(SEPARATOR) {
            return None;
        }
        self.services.get(service)?.method(method)
    }

    /// Every routable `Service.Method` name, unordered.
    pub fn method_names(&self) -> Vec<String> {
        self.services
            .values()
            .flat_map(|service| {
                service
                    .method_names()
                    .map(move |method| format!("{}{}{}", service.name(), SEPARATOR, method))
            })
            .collect()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}
