//! Named, lazily created services.
//!
//! Services are registered as factories and built on first [`ServiceContainer::get`].
//! Instances are shared: every `get` of a name returns the same `Arc`.
//! Factories receive the container, so a service can depend on another one.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::EncoreConfig;
use crate::core::ContainerError;
use crate::templating::{NoopTimeline, Timeline};

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&ServiceContainer) -> anyhow::Result<Instance> + Send + Sync>;

/// Configuration plus the services built from it.
pub struct ServiceContainer {
    config: EncoreConfig,
    base_dir: PathBuf,
    timeline: Arc<dyn Timeline>,
    factories: HashMap<String, Factory>,
    instances: Mutex<HashMap<String, Instance>>,
}

impl ServiceContainer {
    /// A container without services.
    ///
    /// Relative paths of `config` resolve against `base_dir`.
    pub fn new(config: EncoreConfig, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
            timeline: Arc::new(NoopTimeline),
            factories: HashMap::new(),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the timeline handed to services.
    #[must_use]
    pub fn with_timeline(mut self, timeline: Arc<dyn Timeline>) -> Self {
        self.timeline = timeline;
        self
    }

    pub fn config(&self) -> &EncoreConfig {
        &self.config
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn timeline(&self) -> &Arc<dyn Timeline> {
        &self.timeline
    }

    /// Register `factory` under `name`.
    ///
    /// Replaces a previous registration; an instance already built is dropped.
    pub fn add_service<T, F>(&mut self, name: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&ServiceContainer) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!("Registering service \"{}\"", name);
        self.instances.get_mut().unwrap_or_else(PoisonError::into_inner).remove(&name);
        self.factories.insert(
            name,
            Arc::new(move |container: &ServiceContainer| -> anyhow::Result<Instance> {
                Ok(Arc::new(factory(container)?))
            }),
        );
    }

    /// Register an already built service.
    pub fn add_instance<T: Any + Send + Sync>(&mut self, name: impl Into<String>, instance: Arc<T>) {
        let name = name.into();
        self.factories.remove(&name);
        self.instances.get_mut().unwrap_or_else(PoisonError::into_inner).insert(name, instance);
    }

    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name) || self.lock_instances().contains_key(name)
    }

    /// The service registered under `name`, built on first access.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ContainerError> {
        let existing = self.lock_instances().get(name).cloned();
        let instance = match existing {
            Some(instance) => instance,
            None => {
                let factory = self.factories.get(name).ok_or_else(|| ContainerError::NotFound {
                    name: name.to_string(),
                })?;

                tracing::debug!("Creating service \"{}\"", name);
                // The lock is released while the factory runs so it can `get` other services.
                let created = factory(self).map_err(|source| ContainerError::Factory {
                    name: name.to_string(),
                    source,
                })?;
                self.lock_instances().entry(name.to_string()).or_insert(created).clone()
            }
        };

        instance.downcast::<T>().map_err(|_| ContainerError::TypeMismatch {
            name: name.to_string(),
            expected: type_name::<T>(),
        })
    }

    fn lock_instances(&self) -> std::sync::MutexGuard<'_, HashMap<String, Instance>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut services: Vec<_> = self.factories.keys().collect();
        services.sort();
        f.debug_struct("ServiceContainer")
            .field("base_dir", &self.base_dir)
            .field("services", &services)
            .finish_non_exhaustive()
    }
}
