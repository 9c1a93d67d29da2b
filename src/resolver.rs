//! # Resolver Module
//!
//! Turns string handler references into something the dispatcher can call.
//!
//! A route registered with `"UserController::show"` or `"health"` does not
//! hold a callable; at dispatch time the dispatcher asks its
//! [`HandlerResolver`] for one. [`Container`] is the bundled resolver: a
//! registry of services (named bundles of methods), free functions and typed
//! instances that service factories can depend on.
//!
//! ```rust
//! use switchyard::handler::{Handler, HandlerRef};
//! use switchyard::resolver::{Container, HandlerResolver, Service};
//!
//! let mut container = Container::new();
//! container.instance("greeting", String::from("hello"));
//! container.add("Greeter", |c| {
//!     let greeting = c.require::<String>("greeting")?;
//!     Ok(Service::new().method_with_params(
//!         "greet",
//!         &["name"],
//!         Handler::new(move |args| Ok(format!("{greeting} {}", args.param(0).unwrap_or("")).into())),
//!     ))
//! });
//!
//! let bound = container.resolve(&HandlerRef::parse("Greeter::greet").unwrap()).unwrap();
//! assert_eq!(bound.params().unwrap()[0].as_ref(), "name");
//! ```

use crate::error::DispatchError;
use crate::handler::{Argument, Arguments, Binding, Handler, HandlerRef, HandlerResult};
use anyhow::anyhow;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Resolves handler references to callables.
pub trait HandlerResolver: Send + Sync {
    fn resolve(&self, handler: &HandlerRef) -> Result<BoundHandler, DispatchError>;
}

/// A resolved handler, optionally with its declared parameter names.
#[derive(Debug, Clone)]
pub struct BoundHandler {
    name: String,
    handler: Handler,
    params: Option<Arc<[Arc<str>]>>,
}

impl BoundHandler {
    #[must_use]
    pub fn new(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into(),
            handler,
            params: None,
        }
    }

    /// A handler whose positional parameters have these names, in order.
    #[must_use]
    pub fn with_params(name: impl Into<String>, handler: Handler, params: Arc<[Arc<str>]>) -> Self {
        Self {
            name: name.into(),
            handler,
            params: Some(params),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> Option<&[Arc<str>]> {
        self.params.as_deref()
    }

    /// Apply by-name binding.
    ///
    /// When the arguments ask for by-name binding and the handler declares
    /// parameter names, the named values are laid out positionally in
    /// declaration order. A declared name with no value is a resolution error.
    /// Everything else passes through unchanged.
    pub fn bind(&self, args: Arguments) -> Result<Arguments, DispatchError> {
        let Some(params) = &self.params else {
            return Ok(args);
        };
        if args.binding() != Binding::ByName {
            return Ok(args);
        }

        let mut positional = Vec::with_capacity(params.len());
        for name in params.iter() {
            let value = args.named(name).ok_or_else(|| {
                DispatchError::resolution(&self.name, format!("missing value for parameter `{name}`"))
            })?;
            positional.push(Argument::Param(value.to_string()));
        }
        Ok(Arguments::bound(positional, args.named_params().clone()))
    }

    pub fn call(&self, args: Arguments) -> HandlerResult {
        self.handler.call(args)
    }
}

#[derive(Clone)]
struct MethodEntry {
    handler: Handler,
    params: Option<Arc<[Arc<str>]>>,
}

/// A named bundle of methods, the unit a [`Container`] resolves
/// `Class::method` references against.
#[derive(Clone, Default)]
pub struct Service {
    methods: HashMap<String, MethodEntry>,
}

impl Service {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method that takes its arguments as the strategy lays them out.
    #[must_use]
    pub fn method(mut self, name: &str, handler: Handler) -> Self {
        self.methods.insert(
            name.to_string(),
            MethodEntry {
                handler,
                params: None,
            },
        );
        self
    }

    /// Add a method with declared parameter names, used for by-name binding.
    #[must_use]
    pub fn method_with_params(mut self, name: &str, params: &[&str], handler: Handler) -> Self {
        let params: Arc<[Arc<str>]> = params.iter().map(|p| Arc::from(*p)).collect();
        self.methods.insert(
            name.to_string(),
            MethodEntry {
                handler,
                params: Some(params),
            },
        );
        self
    }

    fn bind(&self, class: &str, method: &str) -> Option<BoundHandler> {
        self.methods.get(method).map(|entry| BoundHandler {
            name: format!("{class}::{method}"),
            handler: entry.handler.clone(),
            params: entry.params.clone(),
        })
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&String> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("Service").field("methods", &methods).finish()
    }
}

type Factory = Arc<dyn Fn(&Container) -> anyhow::Result<Service> + Send + Sync>;

/// Dependency container and default [`HandlerResolver`].
///
/// - [`add`](Container::add) registers a factory, called on every resolution
/// - [`share`](Container::share) registers one service reused for every resolution
/// - [`add_function`](Container::add_function) registers a free function for bare references
/// - [`instance`](Container::instance) stores a typed value factories can look up
#[derive(Clone, Default)]
pub struct Container {
    factories: HashMap<String, Factory>,
    shared: HashMap<String, Service>,
    functions: HashMap<String, Handler>,
    instances: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `class`. Replaces any shared service of the same name.
    pub fn add<F>(&mut self, class: &str, factory: F) -> &mut Self
    where
        F: Fn(&Container) -> anyhow::Result<Service> + Send + Sync + 'static,
    {
        self.shared.remove(class);
        self.factories.insert(class.to_string(), Arc::new(factory));
        self
    }

    /// Register a shared service for `class`. Replaces any factory of the same name.
    pub fn share(&mut self, class: &str, service: Service) -> &mut Self {
        self.factories.remove(class);
        self.shared.insert(class.to_string(), service);
        self
    }

    /// Register a free function reachable through a bare reference.
    pub fn add_function(&mut self, name: &str, handler: Handler) -> &mut Self {
        self.functions.insert(name.to_string(), handler);
        self
    }

    /// Store a dependency for factories.
    pub fn instance<T: Any + Send + Sync>(&mut self, name: &str, value: T) -> &mut Self {
        self.instances.insert(name.to_string(), Arc::new(value));
        self
    }

    /// Look up a dependency stored with [`instance`](Container::instance).
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.instances
            .get(name)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    /// Like [`get`](Container::get), failing with a descriptive error.
    pub fn require<T: Any + Send + Sync>(&self, name: &str) -> anyhow::Result<Arc<T>> {
        self.get(name).ok_or_else(|| {
            anyhow!(
                "dependency `{name}` of type `{}` is not registered",
                std::any::type_name::<T>()
            )
        })
    }

    /// Whether `class` has a factory or a shared service.
    #[must_use]
    pub fn has(&self, class: &str) -> bool {
        self.factories.contains_key(class) || self.shared.contains_key(class)
    }

    fn service(&self, class: &str) -> Result<Service, DispatchError> {
        if let Some(service) = self.shared.get(class) {
            return Ok(service.clone());
        }
        let factory = self
            .factories
            .get(class)
            .ok_or_else(|| DispatchError::resolution(class, format!("class `{class}` is not registered")))?;
        factory(self).map_err(|e| {
            DispatchError::resolution(class, format!("failed to construct `{class}`: {e:#}"))
        })
    }
}

impl HandlerResolver for Container {
    fn resolve(&self, handler: &HandlerRef) -> Result<BoundHandler, DispatchError> {
        let bound = match handler {
            HandlerRef::Invocable(h) => BoundHandler::new(handler.to_string(), h.clone()),
            HandlerRef::Function(name) => match self.functions.get(name) {
                Some(h) => BoundHandler::new(name.as_str(), h.clone()),
                None if self.has(name) => {
                    return Err(DispatchError::resolution(
                        name.as_str(),
                        format!("`{name}` is a class, not a callable; reference a method as `{name}::method`"),
                    ))
                }
                None => {
                    return Err(DispatchError::resolution(
                        name.as_str(),
                        format!("no function named `{name}` is registered"),
                    ))
                }
            },
            HandlerRef::Method { class, method } => {
                let service = self.service(class)?;
                service.bind(class, method).ok_or_else(|| {
                    DispatchError::resolution(
                        handler.to_string(),
                        format!("class `{class}` has no method `{method}`"),
                    )
                })?
            }
        };

        debug!(
            handler = %handler,
            declared_params = ?bound.params(),
            "Handler resolved"
        );
        Ok(bound)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn sorted<'a>(mut keys: Vec<&'a String>) -> Vec<&'a String> {
            keys.sort();
            keys
        }
        f.debug_struct("Container")
            .field("factories", &sorted(self.factories.keys().collect()))
            .field("shared", &sorted(self.shared.keys().collect()))
            .field("functions", &sorted(self.functions.keys().collect()))
            .field("instances", &sorted(self.instances.keys().collect()))
            .finish()
    }
}
