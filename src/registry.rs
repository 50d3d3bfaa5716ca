/*!
# Component Registry

Symbolic names used by definitions (action processors, block services,
renderer implementations, connection factories, translators) are bound to
implementations here at startup. Implementations are stored type-erased and
handed back by concrete type.

```rust,ignore
let mut registry = ComponentRegistry::new();
registry.register(ComponentKind::ActionProcessor, "orders", OrdersProcessor::default());
let processor: Arc<OrdersProcessor> = registry.resolve(ComponentKind::ActionProcessor, "orders").unwrap();
```
*/

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{FormError, FormResult, MessageKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    ActionProcessor,
    BlockService,
    Renderer,
    ConnectionFactory,
    Translator,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentKind::ActionProcessor => "action processor",
            ComponentKind::BlockService => "block service",
            ComponentKind::Renderer => "renderer implementation",
            ComponentKind::ConnectionFactory => "connection factory",
            ComponentKind::Translator => "translator",
        };
        write!(f, "{}", s)
    }
}

type Component = Arc<dyn Any + Send + Sync>;

#[derive(Default, Clone)]
pub struct ComponentRegistry {
    components: HashMap<(ComponentKind, String), Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to an implementation; a second registration replaces the first.
    pub fn register<T: Any + Send + Sync>(&mut self, kind: ComponentKind, name: impl Into<String>, component: T) {
        self.components.insert((kind, name.into()), Arc::new(component));
    }

    /// Declares a name without an implementation (validation only).
    pub fn register_name(&mut self, kind: ComponentKind, name: impl Into<String>) {
        self.register(kind, name, ());
    }

    pub fn contains(&self, kind: ComponentKind, name: &str) -> bool {
        self.components.contains_key(&(kind, name.to_string()))
    }

    /// The implementation registered under `name`, if it is a `T`.
    pub fn resolve<T: Any + Send + Sync>(&self, kind: ComponentKind, name: &str) -> Option<Arc<T>> {
        let component = self.components.get(&(kind, name.to_string()))?;
        Arc::clone(component).downcast::<T>().ok()
    }

    pub fn require(&self, kind: ComponentKind, name: &str) -> FormResult<()> {
        if self.contains(kind, name) {
            Ok(())
        } else {
            Err(FormError::new(MessageKey::ComponentNotRegistered, [kind.to_string(), name.to_string()]))
        }
    }

    pub fn names(&self, kind: ComponentKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .components
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, n)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .finish()
    }
}
